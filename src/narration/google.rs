use std::time::Duration;

use base64::Engine as _;
use reqwest::blocking::Client;
use serde_json::{Value, json};

use crate::foundation::error::{ReelError, ReelResult};
use crate::narration::chunk::{MAX_CHUNK_CHARS, split_text};
use crate::narration::{NarrationRequest, SpeechSynthesizer};

const RPC_ID: &str = "jQ1olc";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Speech through the Google Translate `batchexecute` endpoint (MP3 output).
pub struct GoogleTts {
    endpoint: String,
    client: Client,
}

impl GoogleTts {
    /// Client for `translate.google.<tld>`.
    pub fn new(tld: &str) -> ReelResult<Self> {
        Self::with_endpoint(format!(
            "https://translate.google.{}/_/TranslateWebserverUi/data/batchexecute",
            tld.trim_matches('.')
        ))
    }

    /// Client for an explicit endpoint URL.
    pub fn with_endpoint(endpoint: impl Into<String>) -> ReelResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ReelError::narration(format!("build http client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    fn synthesize_chunk(&self, text: &str, lang: &str, slow: bool) -> ReelResult<Vec<u8>> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Referer", "http://translate.google.com/")
            .form(&[("f.req", package_rpc(text, lang, slow))])
            .send()
            .map_err(|e| ReelError::narration(format!("speech request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| ReelError::narration(format!("read speech response: {e}")))?;
        if !status.is_success() {
            return Err(ReelError::narration(format!(
                "speech endpoint returned {status} (is '{lang}' a supported language?)"
            )));
        }

        extract_audio(&body)?.ok_or_else(|| {
            ReelError::narration(format!(
                "speech response carried no audio for language '{lang}'"
            ))
        })
    }
}

impl SpeechSynthesizer for GoogleTts {
    #[tracing::instrument(skip(self, req), fields(lang = %req.lang, slow = req.slow))]
    fn synthesize(&self, req: &NarrationRequest) -> ReelResult<Vec<u8>> {
        req.ensure_text()?;
        let chunks = split_text(&req.text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ReelError::validation(
                "narration text has nothing speakable",
            ));
        }
        tracing::debug!(chunks = chunks.len(), "synthesizing narration");

        // MP3 frames are self-delimiting, so per-chunk files concatenate into one stream.
        let mut mp3 = Vec::new();
        for chunk in &chunks {
            mp3.extend(self.synthesize_chunk(chunk, &req.lang, req.slow)?);
        }
        Ok(mp3)
    }
}

/// Build the `f.req` form value for one chunk.
pub(crate) fn package_rpc(text: &str, lang: &str, slow: bool) -> String {
    let speed = if slow { Value::Bool(true) } else { Value::Null };
    let parameter = json!([text, lang, speed, "null"]).to_string();
    json!([[[RPC_ID, parameter, Value::Null, "generic"]]]).to_string()
}

/// Pull the base64 audio out of a `batchexecute` response.
pub(crate) fn extract_audio(body: &str) -> ReelResult<Option<Vec<u8>>> {
    const START: &str = r#"jQ1olc","[\""#;
    const END: &str = r#"\"]"#;

    for line in body.lines() {
        let Some(start) = line.find(START).map(|i| i + START.len()) else {
            continue;
        };
        let Some(len) = line[start..].rfind(END) else {
            continue;
        };
        let b64 = line[start..start + len].replace("\\u003d", "=");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64.as_bytes())
            .map_err(|e| ReelError::narration(format!("invalid base64 audio: {e}")))?;
        return Ok(Some(bytes));
    }
    Ok(None)
}

#[cfg(test)]
#[path = "../../tests/unit/narration/google.rs"]
mod tests;
