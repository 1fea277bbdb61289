use std::time::Duration;

use image::RgbaImage;
use reqwest::blocking::Client;

use crate::config::SdConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::provider::ImageProvider;
use crate::provider::txt2img::{Txt2ImgRequest, Txt2ImgResponse, decode_images};

const TXT2IMG_PATH: &str = "/sdapi/v1/txt2img";

/// Blocking client for the Automatic1111 WebUI API.
pub struct StableDiffusionClient {
    base_url: String,
    client: Client,
}

impl StableDiffusionClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ReelResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReelError::provider(format!("build http client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Create a client from the configured URL and timeout.
    pub fn from_config(cfg: &SdConfig) -> ReelResult<Self> {
        Self::new(cfg.url.clone(), Duration::from_secs(cfg.timeout_secs))
    }

    /// Full txt2img endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}{TXT2IMG_PATH}", self.base_url.trim_end_matches('/'))
    }
}

impl ImageProvider for StableDiffusionClient {
    #[tracing::instrument(skip(self, req), fields(n_iter = req.n_iter, width = req.width, height = req.height))]
    fn txt2img(&self, req: &Txt2ImgRequest) -> ReelResult<Vec<RgbaImage>> {
        let url = self.endpoint();
        tracing::debug!(%url, steps = req.steps, sampler = ?req.sampler_name, "posting txt2img");

        let resp = self
            .client
            .post(&url)
            .json(req)
            .send()
            .map_err(|e| ReelError::provider(format!("request to '{url}' failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ReelError::provider(format!(
                "txt2img returned {status}: {}",
                body.trim()
            )));
        }

        let body: Txt2ImgResponse = resp
            .json()
            .map_err(|e| ReelError::provider(format!("parse txt2img response: {e}")))?;
        let images = decode_images(&body)?;
        tracing::info!(count = images.len(), "received generated images");
        Ok(images)
    }
}
