//! Narration synthesis: script text in, encoded speech audio out.

pub(crate) mod chunk;
pub(crate) mod google;
pub(crate) mod openai;

use crate::config::{VoiceConfig, VoiceProvider};
use crate::foundation::error::{ReelError, ReelResult};

pub use chunk::{MAX_CHUNK_CHARS, split_text};
pub use google::GoogleTts;
pub use openai::OpenAiTts;

/// One narration to synthesize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrationRequest {
    /// Script text.
    pub text: String,
    /// Language code.
    pub lang: String,
    /// Slower speech.
    pub slow: bool,
}

impl NarrationRequest {
    /// Build a request using the voice settings.
    pub fn new(text: impl Into<String>, voice: &VoiceConfig) -> Self {
        Self {
            text: text.into(),
            lang: voice.lang.clone(),
            slow: voice.slow,
        }
    }

    pub(crate) fn ensure_text(&self) -> ReelResult<()> {
        if self.text.trim().is_empty() {
            return Err(ReelError::validation("narration text must not be empty"));
        }
        Ok(())
    }
}

/// A text-to-speech backend returning an encoded audio file.
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `req` and return the encoded audio bytes.
    fn synthesize(&self, req: &NarrationRequest) -> ReelResult<Vec<u8>>;

    /// File extension matching the returned encoding.
    fn file_extension(&self) -> &'static str {
        "mp3"
    }
}

/// Build the configured speech backend.
pub fn create_synthesizer(cfg: &VoiceConfig) -> ReelResult<Box<dyn SpeechSynthesizer>> {
    match cfg.provider {
        VoiceProvider::Google => Ok(Box::new(GoogleTts::new(&cfg.tld)?)),
        VoiceProvider::Openai => Ok(Box::new(OpenAiTts::from_config(&cfg.openai)?)),
    }
}
