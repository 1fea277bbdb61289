//! Thin wrappers over the system `ffmpeg` binary.

pub(crate) mod audio;
pub(crate) mod tools;

pub use audio::{AudioPcm, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
pub use tools::{ensure_parent_dir, is_ffmpeg_on_path};
