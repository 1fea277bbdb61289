use crate::config::MAX_TOTAL_SECS;
use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::scaled_round;

/// One image's slice of the timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Segment {
    /// Index of the image shown in this segment.
    pub image_index: usize,
    /// Frames covered by the segment.
    pub frames: FrameRange,
    /// Segment length in seconds.
    pub duration_secs: f64,
}

/// Equal-length segmentation of a fixed timeline.
///
/// Segment boundaries are rounded to whole frames, so segments are contiguous, cover every frame
/// and differ in length by at most one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelinePlan {
    fps: Fps,
    total_secs: f64,
    total_frames: u64,
    segments: Vec<Segment>,
}

impl TimelinePlan {
    /// Split `total_secs` at `fps` into `image_count` equal segments.
    pub fn new(image_count: usize, total_secs: f64, fps: Fps) -> ReelResult<Self> {
        if image_count == 0 {
            return Err(ReelError::validation("timeline needs at least one image"));
        }
        if !total_secs.is_finite() || total_secs <= 0.0 {
            return Err(ReelError::validation("timeline duration must be > 0"));
        }
        if total_secs > MAX_TOTAL_SECS {
            return Err(ReelError::validation(format!(
                "timeline duration must be <= {MAX_TOTAL_SECS}s, got {total_secs}s"
            )));
        }
        let total_frames = fps.secs_to_frames_round(total_secs);
        let n = image_count as u64;
        if total_frames < n {
            return Err(ReelError::validation(format!(
                "{image_count} images do not fit into {total_frames} frames"
            )));
        }

        let segments = (0..n)
            .map(|k| {
                let start = scaled_round(k, total_frames, n);
                let end = scaled_round(k + 1, total_frames, n);
                let frames = FrameRange::new(FrameIndex(start), FrameIndex(end))?;
                Ok(Segment {
                    image_index: k as usize,
                    frames,
                    duration_secs: fps.frames_to_secs(frames.len_frames()),
                })
            })
            .collect::<ReelResult<Vec<_>>>()?;

        Ok(Self {
            fps,
            total_secs,
            total_frames,
            segments,
        })
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Requested timeline length in seconds.
    pub fn total_secs(&self) -> f64 {
        self.total_secs
    }

    /// Number of frames in the whole timeline.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Whole-timeline frame range.
    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.total_frames),
        }
    }

    /// Segments in timeline order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Nominal per-image duration (`total_secs / image_count`).
    pub fn nominal_segment_secs(&self) -> f64 {
        self.total_secs / self.segments.len() as f64
    }

    /// Find the segment showing `frame` and the animation progress within it, in `[0, 1)`.
    pub fn locate(&self, frame: FrameIndex) -> Option<(usize, f64)> {
        if frame.0 >= self.total_frames {
            return None;
        }
        let idx = self
            .segments
            .partition_point(|s| s.frames.end.0 <= frame.0);
        let seg = self.segments.get(idx)?;
        let local_secs = self.fps.frames_to_secs(frame.0 - seg.frames.start.0);
        Some((idx, local_secs / seg.duration_secs))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/plan.rs"]
mod tests;
