use std::sync::Arc;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use rand::Rng;

use crate::config::VideoConfig;
use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::lerp;

/// Resampling filter used when zooming a source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Nearest neighbour (fast, blocky).
    Nearest,
    /// Bilinear.
    Triangle,
    /// Catmull-Rom cubic.
    CatmullRom,
    /// Lanczos with window 3.
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(f: ResizeFilter) -> Self {
        match f {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Linear zoom from `start_zoom` to `end_zoom` over a clip.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct KenBurns {
    /// Zoom factor at progress 0.
    pub start_zoom: f64,
    /// Zoom factor at progress 1.
    pub end_zoom: f64,
}

impl KenBurns {
    pub fn new(start_zoom: f64, end_zoom: f64) -> ReelResult<Self> {
        if !(start_zoom.is_finite() && end_zoom.is_finite()) || start_zoom <= 0.0 || end_zoom <= 0.0
        {
            return Err(ReelError::validation("zoom factors must be positive"));
        }
        Ok(Self {
            start_zoom,
            end_zoom,
        })
    }

    /// Fixed start zoom, end zoom drawn uniformly from `[zoom_end_min, zoom_end_min + span)`.
    pub fn randomized<R: Rng + ?Sized>(rng: &mut R, video: &VideoConfig) -> ReelResult<Self> {
        let jitter = if video.zoom_end_span > 0.0 {
            rng.gen_range(0.0..1.0) * video.zoom_end_span
        } else {
            0.0
        };
        Self::new(video.zoom_start, video.zoom_end_min + jitter)
    }

    /// Zoom factor at `progress` (clamped to `[0, 1]`).
    pub fn zoom_at(&self, progress: f64) -> f64 {
        lerp(self.start_zoom, self.end_zoom, progress.clamp(0.0, 1.0))
    }
}

/// Scale the whole `src` by `zoom`, then center-crop a `canvas` sized window.
///
/// The scaled size truncates to whole pixels. When the scaled image is smaller than the canvas
/// on an axis, the window starts at 0 on that axis and the uncovered area stays black.
pub fn render_zoomed_frame(
    src: &RgbaImage,
    zoom: f64,
    canvas: Canvas,
    filter: ResizeFilter,
) -> ReelResult<FrameRGBA> {
    let (w, h) = src.dimensions();
    let (zw, zh) = scaled_size(w, h, zoom);
    if zw == 0 || zh == 0 {
        return Err(ReelError::validation(format!(
            "zoom {zoom} collapses a {w}x{h} image to nothing"
        )));
    }

    let resized;
    let scaled = if (zw, zh) == (w, h) {
        src
    } else {
        resized = imageops::resize(src, zw, zh, filter.into());
        &resized
    };

    let left = zw.saturating_sub(canvas.width) / 2;
    let top = zh.saturating_sub(canvas.height) / 2;
    let copy_w = (zw - left).min(canvas.width) as usize;
    let copy_h = (zh - top).min(canvas.height);

    let mut frame = FrameRGBA::black(canvas);
    let src_stride = zw as usize * 4;
    let dst_stride = canvas.width as usize * 4;
    let raw = scaled.as_raw();
    for y in 0..copy_h {
        let s = (top + y) as usize * src_stride + left as usize * 4;
        let d = y as usize * dst_stride;
        frame.data[d..d + copy_w * 4].copy_from_slice(&raw[s..s + copy_w * 4]);
    }
    // Generated images are opaque, but a caller-provided source may not be.
    for px in frame.data.chunks_exact_mut(4) {
        px[3] = 255;
    }
    Ok(frame)
}

/// Pixel size of a `w`x`h` image scaled by `zoom`, truncated like an integer cast.
pub(crate) fn scaled_size(w: u32, h: u32, zoom: f64) -> (u32, u32) {
    (
        (f64::from(w) * zoom).floor() as u32,
        (f64::from(h) * zoom).floor() as u32,
    )
}

/// One image animated with a [`KenBurns`] motion.
#[derive(Clone, Debug)]
pub struct ClipRenderer {
    image: Arc<RgbaImage>,
    motion: KenBurns,
}

impl ClipRenderer {
    pub fn new(image: Arc<RgbaImage>, motion: KenBurns) -> Self {
        Self { image, motion }
    }

    pub fn motion(&self) -> KenBurns {
        self.motion
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Scaled source size at `progress`; equal sizes render identical frames.
    pub(crate) fn scaled_size_at(&self, progress: f64) -> (u32, u32) {
        let (w, h) = self.image.dimensions();
        scaled_size(w, h, self.motion.zoom_at(progress))
    }

    /// Render the clip at `progress` in `[0, 1]`.
    pub fn frame_at(
        &self,
        progress: f64,
        canvas: Canvas,
        filter: ResizeFilter,
    ) -> ReelResult<FrameRGBA> {
        render_zoomed_frame(&self.image, self.motion.zoom_at(progress), canvas, filter)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/kenburns.rs"]
mod tests;
