//! Run configuration: image backend, voice, timeline and render settings.

mod model;

pub use model::{
    ALLOWED_HEIGHTS, ALLOWED_WIDTHS, DEFAULT_NEGATIVE_PROMPT, DEFAULT_SD_URL, MAX_TOTAL_SECS,
    OpenAiVoiceConfig, ReelConfig, RenderConfig, SD_URL_ENV, SdConfig, VideoConfig, VoiceConfig,
    VoiceProvider, sd_url_or_default,
};
