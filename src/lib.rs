//! reelgen turns a narration script and an image prompt into a fixed-length narrated video.
//!
//! A run goes through these stages:
//!
//! - Generate background images through a Stable Diffusion WebUI ([`ImageProvider`])
//! - Synthesize the narration ([`SpeechSynthesizer`]) and fit it to the timeline length
//! - Split the timeline evenly across the images ([`TimelinePlan`])
//! - Render a Ken Burns zoom per image and stream the frames into a [`FrameSink`]
//!
//! [`Pipeline`] wires the stages together; [`FfmpegSink`] encodes the MP4 with the system
//! `ffmpeg`.
#![forbid(unsafe_code)]

mod foundation;

pub mod audio;
pub mod config;
/// Encoding sinks.
pub mod encode;
pub mod media;
pub mod narration;
pub mod pipeline;
pub mod provider;
/// Ken Burns rendering.
pub mod render;
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRGBA, FrameRange};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::audio::AudioFit;
pub use crate::config::ReelConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::narration::{NarrationRequest, SpeechSynthesizer};
pub use crate::pipeline::{Pipeline, ReelOutput, ReelRequest, RunOpts};
pub use crate::provider::{ImageProvider, Txt2ImgRequest};
pub use crate::render::{ClipRenderer, KenBurns, RenderOpts, RenderStats, render_timeline};
pub use crate::timeline::TimelinePlan;
