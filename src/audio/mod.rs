//! Narration length reconciliation against the fixed timeline.

pub(crate) mod fit;

pub use fit::{AudioFit, fit_to_duration, target_frames, write_f32le};
