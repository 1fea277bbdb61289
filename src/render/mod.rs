//! Ken Burns frame rendering and timeline playback into a sink.

pub(crate) mod kenburns;
pub(crate) mod pipeline;

pub use kenburns::{ClipRenderer, KenBurns, ResizeFilter, render_zoomed_frame};
pub use pipeline::{RenderOpts, RenderStats, render_timeline};
