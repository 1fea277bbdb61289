//! Background image generation through a Stable Diffusion WebUI.

pub(crate) mod sd_client;
pub(crate) mod txt2img;

use image::RgbaImage;

use crate::foundation::error::ReelResult;

pub use sd_client::StableDiffusionClient;
pub use txt2img::{Txt2ImgRequest, Txt2ImgResponse, decode_b64_image, decode_images};

/// A service that turns a prompt into background images.
pub trait ImageProvider: Send + Sync {
    /// Generate `req.n_iter` images. Images are returned opaque, in response order.
    fn txt2img(&self, req: &Txt2ImgRequest) -> ReelResult<Vec<RgbaImage>>;
}
