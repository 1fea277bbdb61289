use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::kenburns::ResizeFilter;

/// Default Stable Diffusion WebUI address.
pub const DEFAULT_SD_URL: &str = "http://127.0.0.1:7860";
/// Environment variable that overrides [`DEFAULT_SD_URL`].
pub const SD_URL_ENV: &str = "SD_API_URL";
/// Negative prompt used when the request does not carry one.
pub const DEFAULT_NEGATIVE_PROMPT: &str = "nsfw, lowres, blurry, deformed, watermark, text, logo";
/// Image widths accepted by the txt2img settings.
pub const ALLOWED_WIDTHS: [u32; 5] = [512, 576, 640, 704, 720];
/// Image heights accepted by the txt2img settings.
pub const ALLOWED_HEIGHTS: [u32; 5] = [768, 960, 1024, 1152, 1280];
/// Longest accepted timeline (4 hours).
pub const MAX_TOTAL_SECS: f64 = 4.0 * 3600.0;

/// Pick the SD URL from an optional environment value.
pub fn sd_url_or_default(env_value: Option<String>) -> String {
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_SD_URL.to_string())
}

/// Complete configuration for one generation run.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReelConfig {
    /// Stable Diffusion backend settings.
    pub sd: SdConfig,
    /// Narration settings.
    pub voice: VoiceConfig,
    /// Timeline and motion settings.
    pub video: VideoConfig,
    /// Frame rendering settings.
    pub render: RenderConfig,
}

/// Stable Diffusion WebUI `txt2img` settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SdConfig {
    /// WebUI base URL, e.g. `http://127.0.0.1:7860`.
    pub url: String,
    /// Sampling steps.
    pub steps: u32,
    /// Classifier-free guidance scale.
    pub cfg_scale: f64,
    /// Image width; also the output video width.
    pub width: u32,
    /// Image height; also the output video height.
    pub height: u32,
    /// Number of background images (each gets an equal slice of the timeline).
    pub num_images: u32,
    /// Sampler name; empty leaves the backend default.
    pub sampler: String,
    /// Negative prompt used when a request does not provide one.
    pub negative_prompt: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SdConfig {
    fn default() -> Self {
        Self {
            url: sd_url_or_default(std::env::var(SD_URL_ENV).ok()),
            steps: 25,
            cfg_scale: 7.0,
            width: 720,
            height: 1280,
            num_images: 4,
            sampler: "Euler a".to_string(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            timeout_secs: 600,
        }
    }
}

/// Which text-to-speech service narrates the script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceProvider {
    /// Google Translate speech endpoint.
    #[default]
    Google,
    /// OpenAI-compatible `/v1/audio/speech`.
    Openai,
}

/// Narration settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoiceConfig {
    /// Speech backend.
    pub provider: VoiceProvider,
    /// Language code (`en`, `hi`, `ta`, ...).
    pub lang: String,
    /// Slower speech.
    pub slow: bool,
    /// Top-level domain of the Google host (`com`, `co.uk`, ...).
    pub tld: String,
    /// OpenAI-compatible backend settings.
    pub openai: OpenAiVoiceConfig,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            provider: VoiceProvider::Google,
            lang: "en".to_string(),
            slow: false,
            tld: "com".to_string(),
            openai: OpenAiVoiceConfig::default(),
        }
    }
}

/// OpenAI-compatible speech backend settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenAiVoiceConfig {
    /// API base URL (without `/v1`).
    pub base_url: String,
    /// Speech model.
    pub model: String,
    /// Voice name.
    pub voice: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for OpenAiVoiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "tts-1".to_string(),
            voice: "nova".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Timeline, motion and encoder settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    /// Total video length in seconds; narration is fitted to exactly this.
    pub total_secs: f64,
    /// Output frame rate.
    pub fps: u32,
    /// Zoom factor at the start of every clip.
    pub zoom_start: f64,
    /// Lower bound of the randomized end zoom.
    pub zoom_end_min: f64,
    /// Width of the randomized end zoom interval.
    pub zoom_end_span: f64,
    /// Seed for the end-zoom RNG; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Encoder threads passed to ffmpeg.
    pub encoder_threads: u32,
    /// Output file name.
    pub file_name: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            total_secs: 60.0,
            fps: 24,
            zoom_start: 1.0,
            zoom_end_min: 1.08,
            zoom_end_span: 0.06,
            seed: None,
            encoder_threads: 4,
            file_name: "ai_video_60s.mp4".to_string(),
        }
    }
}

/// Frame rendering settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Render frames of a chunk in parallel.
    pub parallel: bool,
    /// Frames per chunk.
    pub chunk_size: usize,
    /// Worker threads; `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Resampling filter for the zoom.
    pub filter: ResizeFilter,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 48,
            threads: None,
            filter: ResizeFilter::Lanczos3,
        }
    }
}

impl ReelConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ReelError::validation(format!("parse config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Output canvas; the video keeps the generated image size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.sd.width,
            height: self.sd.height,
        }
    }

    /// Output frame rate.
    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::new(self.video.fps, 1)
    }

    /// Check every setting against its allowed range.
    pub fn validate(&self) -> ReelResult<()> {
        let sd = &self.sd;
        if sd.url.trim().is_empty() {
            return Err(ReelError::validation("sd.url must not be empty"));
        }
        if !(10..=50).contains(&sd.steps) {
            return Err(ReelError::validation(format!(
                "sd.steps must be in 10..=50, got {}",
                sd.steps
            )));
        }
        if !(1.0..=15.0).contains(&sd.cfg_scale) {
            return Err(ReelError::validation(format!(
                "sd.cfg_scale must be in 1.0..=15.0, got {}",
                sd.cfg_scale
            )));
        }
        if !ALLOWED_WIDTHS.contains(&sd.width) {
            return Err(ReelError::validation(format!(
                "sd.width must be one of {ALLOWED_WIDTHS:?}, got {}",
                sd.width
            )));
        }
        if !ALLOWED_HEIGHTS.contains(&sd.height) {
            return Err(ReelError::validation(format!(
                "sd.height must be one of {ALLOWED_HEIGHTS:?}, got {}",
                sd.height
            )));
        }
        if !(1..=8).contains(&sd.num_images) {
            return Err(ReelError::validation(format!(
                "sd.num_images must be in 1..=8, got {}",
                sd.num_images
            )));
        }
        if sd.timeout_secs == 0 {
            return Err(ReelError::validation("sd.timeout_secs must be >= 1"));
        }

        let voice = &self.voice;
        if voice.lang.trim().is_empty() {
            return Err(ReelError::validation("voice.lang must not be empty"));
        }
        if voice.provider == VoiceProvider::Google && voice.tld.trim().is_empty() {
            return Err(ReelError::validation("voice.tld must not be empty"));
        }

        let video = &self.video;
        if !video.total_secs.is_finite() || video.total_secs <= 0.0 {
            return Err(ReelError::validation("video.total_secs must be > 0"));
        }
        if video.total_secs > MAX_TOTAL_SECS {
            return Err(ReelError::validation(format!(
                "video.total_secs must be <= {MAX_TOTAL_SECS}, got {}",
                video.total_secs
            )));
        }
        if video.fps == 0 {
            return Err(ReelError::validation("video.fps must be > 0"));
        }
        if !video.zoom_start.is_finite() || video.zoom_start <= 0.0 {
            return Err(ReelError::validation("video.zoom_start must be > 0"));
        }
        if !video.zoom_end_min.is_finite() || video.zoom_end_min <= 0.0 {
            return Err(ReelError::validation("video.zoom_end_min must be > 0"));
        }
        if !video.zoom_end_span.is_finite() || video.zoom_end_span < 0.0 {
            return Err(ReelError::validation("video.zoom_end_span must be >= 0"));
        }
        if video.file_name.trim().is_empty() {
            return Err(ReelError::validation("video.file_name must not be empty"));
        }

        if let Some(n) = self.render.threads
            && n == 0
        {
            return Err(ReelError::validation(
                "render.threads must be >= 1 when set",
            ));
        }

        self.canvas().validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
