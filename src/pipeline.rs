//! End-to-end reel generation: prompt and script in, narrated MP4 out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use image::RgbaImage;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{AudioFit, fit_to_duration, write_f32le};
use crate::config::ReelConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink};
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::{AudioPcm, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::narration::{NarrationRequest, SpeechSynthesizer, create_synthesizer};
use crate::provider::{ImageProvider, StableDiffusionClient, Txt2ImgRequest};
use crate::render::{ClipRenderer, KenBurns, RenderOpts, RenderStats, render_timeline};
use crate::timeline::TimelinePlan;

/// File name of the preview image written next to the video.
pub const PREVIEW_FILE_NAME: &str = "preview.png";

/// User input for one reel.
#[derive(Clone, Debug, Default)]
pub struct ReelRequest {
    /// Narration script.
    pub script: String,
    /// Background image prompt.
    pub prompt: String,
    /// Negative prompt; the configured default is used when `None`.
    pub negative_prompt: Option<String>,
}

/// Output location options for [`Pipeline::run`].
#[derive(Clone, Debug)]
pub struct RunOpts {
    /// Directory receiving the video and the preview image.
    pub out_dir: PathBuf,
    /// Video file name; falls back to `video.file_name` from the config.
    pub file_name: Option<String>,
    /// Replace an existing video file.
    pub overwrite: bool,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            file_name: None,
            overwrite: true,
        }
    }
}

/// What a successful run produced.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ReelOutput {
    pub video_path: PathBuf,
    pub preview_path: PathBuf,
    pub image_count: usize,
    /// Nominal seconds each image stays on screen.
    pub segment_secs: f64,
    pub audio_fit: AudioFit,
    pub stats: RenderStats,
}

/// Wires an image provider, a speech synthesizer and the renderer together.
pub struct Pipeline {
    config: ReelConfig,
    images: Box<dyn ImageProvider>,
    voice: Box<dyn SpeechSynthesizer>,
}

impl Pipeline {
    pub fn new(
        config: ReelConfig,
        images: Box<dyn ImageProvider>,
        voice: Box<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            config,
            images,
            voice,
        }
    }

    /// Build the HTTP-backed providers named by `config`.
    pub fn from_config(config: ReelConfig) -> ReelResult<Self> {
        config.validate()?;
        let images = StableDiffusionClient::from_config(&config.sd)?;
        let voice = create_synthesizer(&config.voice)?;
        Ok(Self::new(config, Box::new(images), voice))
    }

    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    /// Generate the reel described by `req` and encode it under `opts.out_dir`.
    #[tracing::instrument(skip_all, fields(out_dir = %opts.out_dir.display()))]
    pub fn run(&self, req: &ReelRequest, opts: &RunOpts) -> ReelResult<ReelOutput> {
        validate_request(req)?;
        self.config.validate()?;

        let file_name = opts
            .file_name
            .as_deref()
            .unwrap_or(&self.config.video.file_name);
        let video_path = opts.out_dir.join(file_name);
        let preview_path = opts.out_dir.join(PREVIEW_FILE_NAME);
        if !opts.overwrite && video_path.exists() {
            return Err(ReelError::validation(format!(
                "output '{}' already exists",
                video_path.display()
            )));
        }

        let images = self.fetch_images(req)?;

        let work = tempfile::Builder::new()
            .prefix("reelgen-")
            .tempdir()
            .context("create scratch directory")?;
        let (pcm, audio_fit) = self.narrate(&req.script, work.path())?;
        let audio = stage_audio(&pcm, work.path())?;

        let fps = self.config.fps()?;
        let plan = TimelinePlan::new(images.len(), self.config.video.total_secs, fps)?;
        let clips = self.clips(&images)?;

        std::fs::create_dir_all(&opts.out_dir)
            .with_context(|| format!("create output directory '{}'", opts.out_dir.display()))?;
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: video_path.clone(),
            overwrite: opts.overwrite,
            threads: self.config.video.encoder_threads,
        });
        let stats = self.render(&clips, &plan, Some(audio), &mut sink)?;

        images[0]
            .save(&preview_path)
            .with_context(|| format!("write preview '{}'", preview_path.display()))?;

        tracing::info!(video = %video_path.display(), "reel written");
        Ok(ReelOutput {
            video_path,
            preview_path,
            image_count: images.len(),
            segment_secs: plan.nominal_segment_secs(),
            audio_fit,
            stats,
        })
    }

    /// Request the background images and check them against the canvas.
    pub fn fetch_images(&self, req: &ReelRequest) -> ReelResult<Vec<RgbaImage>> {
        let negative = req
            .negative_prompt
            .as_deref()
            .unwrap_or(&self.config.sd.negative_prompt);
        let t2i = Txt2ImgRequest::from_config(&self.config.sd, req.prompt.trim(), negative);
        tracing::info!(count = t2i.n_iter, "generating background images");

        let images = self.images.txt2img(&t2i)?;
        if images.is_empty() {
            return Err(ReelError::provider("image API returned no images"));
        }
        let canvas = self.config.canvas();
        for (i, img) in images.iter().enumerate() {
            if img.dimensions() != (canvas.width, canvas.height) {
                tracing::warn!(
                    index = i,
                    width = img.width(),
                    height = img.height(),
                    "image size differs from the output canvas"
                );
            }
        }
        Ok(images)
    }

    fn narrate(&self, script: &str, work_dir: &Path) -> ReelResult<(AudioPcm, AudioFit)> {
        tracing::info!("synthesizing narration");
        let req = NarrationRequest::new(script.trim(), &self.config.voice);
        let encoded = self.voice.synthesize(&req)?;
        let path = work_dir.join(format!("narration.{}", self.voice.file_extension()));
        std::fs::write(&path, &encoded)
            .with_context(|| format!("write narration '{}'", path.display()))?;

        let pcm = decode_audio_f32_stereo(&path, MIX_SAMPLE_RATE)?;
        tracing::info!(secs = pcm.duration_secs(), "narration decoded");
        fit_to_duration(pcm, self.config.video.total_secs)
    }

    fn clips(&self, images: &[RgbaImage]) -> ReelResult<Vec<ClipRenderer>> {
        let mut rng = match self.config.video.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        images
            .iter()
            .map(|img| {
                let motion = KenBurns::randomized(&mut rng, &self.config.video)?;
                Ok(ClipRenderer::new(Arc::new(img.clone()), motion))
            })
            .collect()
    }

    fn render(
        &self,
        clips: &[ClipRenderer],
        plan: &TimelinePlan,
        audio: Option<AudioInputConfig>,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderStats> {
        tracing::info!(
            frames = plan.total_frames(),
            segments = plan.segments().len(),
            "rendering"
        );
        let opts = RenderOpts::from(&self.config.render);
        render_timeline(clips, plan, self.config.canvas(), &opts, audio, sink)
    }
}

/// Reject empty scripts and prompts before any network call.
pub fn validate_request(req: &ReelRequest) -> ReelResult<()> {
    if req.script.trim().is_empty() {
        return Err(ReelError::validation("Please enter a narration script"));
    }
    if req.prompt.trim().is_empty() {
        return Err(ReelError::validation("Please enter a background prompt"));
    }
    Ok(())
}

fn stage_audio(pcm: &AudioPcm, work_dir: &Path) -> ReelResult<AudioInputConfig> {
    let path = work_dir.join("narration.f32le");
    write_f32le(&pcm.interleaved_f32, &path)?;
    Ok(AudioInputConfig {
        path,
        sample_rate: pcm.sample_rate,
        channels: pcm.channels,
    })
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
