use base64::Engine as _;
use image::{DynamicImage, RgbaImage};

use crate::config::SdConfig;
use crate::foundation::error::{ReelError, ReelResult};

/// JSON payload of the WebUI `/sdapi/v1/txt2img` endpoint.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Txt2ImgRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub steps: u32,
    pub cfg_scale: f64,
    pub width: u32,
    pub height: u32,
    pub batch_size: u32,
    /// Number of sequential batches; with `batch_size = 1` this is the image count.
    pub n_iter: u32,
    pub restore_faces: bool,
    pub tiling: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampler_name: Option<String>,
}

impl Txt2ImgRequest {
    /// Build a request from the configured backend settings.
    pub fn from_config(cfg: &SdConfig, prompt: &str, negative_prompt: &str) -> Self {
        let sampler = cfg.sampler.trim();
        Self {
            prompt: prompt.to_string(),
            negative_prompt: negative_prompt.to_string(),
            steps: cfg.steps,
            cfg_scale: cfg.cfg_scale,
            width: cfg.width,
            height: cfg.height,
            batch_size: 1,
            n_iter: cfg.num_images,
            restore_faces: false,
            tiling: false,
            sampler_name: (!sampler.is_empty()).then(|| sampler.to_string()),
        }
    }
}

/// Relevant part of the txt2img response body.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Txt2ImgResponse {
    /// Base64 encoded images, optionally carrying a `data:` URL prefix.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Decode one base64 image (with or without a `data:...;base64,` prefix) into opaque RGBA8.
pub fn decode_b64_image(b64: &str) -> ReelResult<RgbaImage> {
    let payload = match b64.split_once(',') {
        Some((_, rest)) => rest,
        None => b64,
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ReelError::provider(format!("invalid base64 image payload: {e}")))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| ReelError::provider(format!("decode generated image: {e}")))?;
    // Drop any alpha channel the backend sent.
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()).to_rgba8())
}

/// Decode every image of a response, preserving order.
pub fn decode_images(resp: &Txt2ImgResponse) -> ReelResult<Vec<RgbaImage>> {
    resp.images
        .iter()
        .enumerate()
        .map(|(i, b64)| {
            decode_b64_image(b64).map_err(|e| match e {
                ReelError::Provider(msg) => ReelError::provider(format!("image #{i}: {msg}")),
                other => other,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/provider/txt2img.rs"]
mod tests;
