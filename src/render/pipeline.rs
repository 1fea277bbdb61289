use std::sync::Arc;

use rayon::prelude::*;

use crate::config::RenderConfig;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::kenburns::{ClipRenderer, ResizeFilter};
use crate::timeline::TimelinePlan;

/// Threading and chunking controls for timeline rendering.
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Render the frames of a chunk in parallel.
    pub parallel: bool,
    /// Chunk size in frames.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Resampling filter for the zoom.
    pub filter: ResizeFilter,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderOpts {
    fn from(cfg: &RenderConfig) -> Self {
        Self {
            parallel: cfg.parallel,
            chunk_size: cfg.chunk_size,
            threads: cfg.threads,
            filter: cfg.filter,
        }
    }
}

/// Aggregated rendering counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames that were actually rasterized.
    pub frames_rendered: u64,
    /// Frames reused because the zoomed size did not change.
    pub frames_elided: u64,
}

/// Identifies frames that rasterize to identical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrameKey {
    segment: usize,
    scaled: (u32, u32),
}

struct FrameJob {
    idx: FrameIndex,
    key: FrameKey,
    progress: f64,
}

/// Render every frame of `plan` and stream it into `sink`, in order.
///
/// `clips[k]` animates segment `k`. The sink receives the plan's duration as a hard cap so audio
/// and video end together.
#[tracing::instrument(skip_all, fields(frames = plan.total_frames(), parallel = opts.parallel))]
pub fn render_timeline(
    clips: &[ClipRenderer],
    plan: &TimelinePlan,
    canvas: Canvas,
    opts: &RenderOpts,
    audio: Option<AudioInputConfig>,
    sink: &mut dyn FrameSink,
) -> ReelResult<RenderStats> {
    if clips.len() != plan.segments().len() {
        return Err(ReelError::validation(format!(
            "timeline has {} segments but {} clips were provided",
            plan.segments().len(),
            clips.len()
        )));
    }
    canvas.validate()?;
    let pool = build_thread_pool(opts.threads, opts.parallel)?;

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: plan.fps(),
        audio,
        duration_secs: Some(plan.total_secs()),
    })?;

    let mut stats = RenderStats::default();
    let chunk_size = normalized_chunk_size(opts.chunk_size);
    let range = plan.range();
    let mut prev: Option<(FrameKey, Arc<FrameRGBA>)> = None;

    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let jobs = (chunk_start..chunk_end)
            .map(|f| frame_job(clips, plan, FrameIndex(f)))
            .collect::<ReelResult<Vec<_>>>()?;

        // Consecutive frames with the same key share one rasterization.
        let mut unique: Vec<&FrameJob> = Vec::new();
        let mut slot_of = Vec::with_capacity(jobs.len());
        for job in &jobs {
            let carried = prev.as_ref().is_some_and(|(k, _)| *k == job.key) && unique.is_empty();
            if carried {
                slot_of.push(None);
                continue;
            }
            if unique.last().is_none_or(|u| u.key != job.key) {
                unique.push(job);
            }
            slot_of.push(Some(unique.len() - 1));
        }

        let render = |job: &&FrameJob| {
            clips[job.key.segment]
                .frame_at(job.progress, canvas, opts.filter)
                .map(Arc::new)
        };
        let rendered: Vec<Arc<FrameRGBA>> = match pool.as_ref() {
            Some(pool) => pool.install(|| {
                unique
                    .par_iter()
                    .map(render)
                    .collect::<ReelResult<Vec<_>>>()
            })?,
            None => unique.iter().map(render).collect::<ReelResult<Vec<_>>>()?,
        };

        for (job, slot) in jobs.iter().zip(&slot_of) {
            let frame = match slot {
                Some(i) => Arc::clone(&rendered[*i]),
                None => match prev.as_ref() {
                    Some((_, f)) => Arc::clone(f),
                    None => {
                        return Err(ReelError::encode("frame reuse without a previous frame"));
                    }
                },
            };
            sink.push_frame(job.idx, &frame)?;
            prev = Some((job.key, frame));
        }

        stats.frames_total += jobs.len() as u64;
        stats.frames_rendered += rendered.len() as u64;
        chunk_start = chunk_end;
    }
    stats.frames_elided = stats.frames_total - stats.frames_rendered;

    sink.end()?;
    tracing::info!(
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "timeline rendered"
    );
    Ok(stats)
}

fn frame_job(clips: &[ClipRenderer], plan: &TimelinePlan, idx: FrameIndex) -> ReelResult<FrameJob> {
    let (segment, progress) = plan.locate(idx).ok_or_else(|| {
        ReelError::validation(format!("frame {} is outside the timeline", idx.0))
    })?;
    Ok(FrameJob {
        idx,
        key: FrameKey {
            segment,
            scaled: clips[segment].scaled_size_at(progress),
        },
        progress,
    })
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

fn build_thread_pool(
    threads: Option<usize>,
    parallel: bool,
) -> ReelResult<Option<rayon::ThreadPool>> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "render 'threads' must be >= 1 when set",
        ));
    }
    if !parallel {
        return Ok(None);
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| ReelError::encode(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
