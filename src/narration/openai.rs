use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::OpenAiVoiceConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::narration::{NarrationRequest, SpeechSynthesizer};

/// Speech through an OpenAI-compatible `/v1/audio/speech` endpoint.
pub struct OpenAiTts {
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
    client: Client,
}

#[derive(Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    speed: f32,
}

impl OpenAiTts {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
    ) -> ReelResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ReelError::narration(format!("build http client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            voice: voice.into(),
            client,
        })
    }

    /// Build from settings, reading the key from the configured environment variable.
    pub fn from_config(cfg: &OpenAiVoiceConfig) -> ReelResult<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ReelError::validation(format!(
                    "{} is not set (needed for the openai voice provider)",
                    cfg.api_key_env
                ))
            })?;
        Self::new(&cfg.base_url, api_key, &cfg.model, &cfg.voice)
    }
}

impl SpeechSynthesizer for OpenAiTts {
    #[tracing::instrument(skip(self, req), fields(model = %self.model, voice = %self.voice))]
    fn synthesize(&self, req: &NarrationRequest) -> ReelResult<Vec<u8>> {
        req.ensure_text()?;
        let url = format!("{}/v1/audio/speech", self.base_url.trim_end_matches('/'));
        let body = SpeechBody {
            model: &self.model,
            input: req.text.trim(),
            voice: &self.voice,
            response_format: "mp3",
            speed: if req.slow { 0.75 } else { 1.0 },
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ReelError::narration(format!("speech request to '{url}' failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(ReelError::narration(format!(
                "speech endpoint returned {status}: {}",
                text.trim()
            )));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| ReelError::narration(format!("read speech response: {e}")))?;
        if bytes.is_empty() {
            return Err(ReelError::narration("speech endpoint returned empty audio"));
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/openai.rs"]
mod tests;
