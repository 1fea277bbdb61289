use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use reelgen::config::{ReelConfig, VoiceProvider};
use reelgen::render::ResizeFilter;
use reelgen::{Canvas, ClipRenderer, Fps, KenBurns, Pipeline, ReelRequest, RunOpts, TimelinePlan};

#[derive(Parser, Debug)]
#[command(name = "reelgen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a narrated video (requires `ffmpeg` on PATH and a reachable WebUI).
    Generate(GenerateArgs),
    /// Render a single Ken Burns frame from a local image as a PNG.
    Frame(FrameArgs),
    /// Print how the timeline is split across images.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Narration script text.
    #[arg(long, conflicts_with = "script_file", required_unless_present = "script_file")]
    script: Option<String>,

    /// Read the narration script from a file.
    #[arg(long)]
    script_file: Option<PathBuf>,

    /// Background image prompt.
    #[arg(long)]
    prompt: String,

    /// Negative prompt (defaults to the configured one).
    #[arg(long)]
    negative_prompt: Option<String>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for the video and the preview image.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Output video file name.
    #[arg(long)]
    file_name: Option<String>,

    /// Stable Diffusion WebUI base URL.
    #[arg(long)]
    sd_url: Option<String>,

    /// Number of images to generate (1-8).
    #[arg(long)]
    images: Option<u32>,

    /// Narration language code.
    #[arg(long)]
    lang: Option<String>,

    /// Slower narration.
    #[arg(long, default_value_t = false)]
    slow: bool,

    /// Speech backend.
    #[arg(long, value_enum)]
    voice: Option<VoiceChoice>,

    /// Seed for the zoom randomization.
    #[arg(long)]
    seed: Option<u64>,

    /// Render frames on a single thread.
    #[arg(long, default_value_t = false)]
    no_parallel: bool,

    /// Keep an existing output file instead of replacing it.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum VoiceChoice {
    Google,
    Openai,
}

impl From<VoiceChoice> for VoiceProvider {
    fn from(v: VoiceChoice) -> Self {
        match v {
            VoiceChoice::Google => VoiceProvider::Google,
            VoiceChoice::Openai => VoiceProvider::Openai,
        }
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input image.
    #[arg(long)]
    image: PathBuf,

    /// Position within the clip, 0 to 1.
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Zoom factor at progress 0.
    #[arg(long, default_value_t = 1.0)]
    zoom_start: f64,

    /// Zoom factor at progress 1.
    #[arg(long, default_value_t = 1.1)]
    zoom_end: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width (defaults to the image width, rounded down to even).
    #[arg(long)]
    width: Option<u32>,

    /// Output height (defaults to the image height, rounded down to even).
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Number of images.
    #[arg(long)]
    images: usize,

    /// Timeline length in seconds.
    #[arg(long, default_value_t = 60.0)]
    secs: f64,

    /// Frames per second.
    #[arg(long, default_value_t = 24)]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("reelgen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ReelConfig::from_path(path)?,
        None => ReelConfig::default(),
    };
    if let Some(url) = args.sd_url {
        config.sd.url = url;
    }
    if let Some(n) = args.images {
        config.sd.num_images = n;
    }
    if let Some(lang) = args.lang {
        config.voice.lang = lang;
    }
    if args.slow {
        config.voice.slow = true;
    }
    if let Some(voice) = args.voice {
        config.voice.provider = voice.into();
    }
    if args.seed.is_some() {
        config.video.seed = args.seed;
    }
    if args.no_parallel {
        config.render.parallel = false;
    }

    let script = match (&args.script, &args.script_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?,
        (None, None) => String::new(),
    };
    let request = ReelRequest {
        script,
        prompt: args.prompt,
        negative_prompt: args.negative_prompt,
    };
    let opts = RunOpts {
        out_dir: args.out_dir,
        file_name: args.file_name,
        overwrite: !args.no_overwrite,
    };

    reelgen::pipeline::validate_request(&request)?;
    let pipeline = Pipeline::from_config(config)?;
    let out = pipeline.run(&request, &opts)?;

    eprintln!(
        "{} images, {:.2}s each, audio {:?}",
        out.image_count, out.segment_secs, out.audio_fit
    );
    println!("{}", out.video_path.display());
    println!("{}", out.preview_path.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let img = image::open(&args.image)
        .with_context(|| format!("open image '{}'", args.image.display()))?
        .to_rgba8();
    let canvas = Canvas {
        width: args.width.unwrap_or(img.width() & !1),
        height: args.height.unwrap_or(img.height() & !1),
    };
    canvas.validate()?;

    let clip = ClipRenderer::new(
        Arc::new(img),
        KenBurns::new(args.zoom_start, args.zoom_end)?,
    );
    let frame = clip.frame_at(args.progress, canvas, ResizeFilter::default())?;

    reelgen::media::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let plan = TimelinePlan::new(args.images, args.secs, Fps::new(args.fps, 1)?)?;
    println!(
        "{} frames, {:.3}s per image",
        plan.total_frames(),
        plan.nominal_segment_secs()
    );
    for seg in plan.segments() {
        println!(
            "image {}: frames {}..{} ({:.3}s)",
            seg.image_index, seg.frames.start.0, seg.frames.end.0, seg.duration_secs
        );
    }
    Ok(())
}
