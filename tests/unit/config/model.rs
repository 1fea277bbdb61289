use super::*;

#[test]
fn defaults_match_ui_defaults() {
    let cfg = ReelConfig::default();
    assert_eq!(cfg.sd.steps, 25);
    assert_eq!(cfg.sd.cfg_scale, 7.0);
    assert_eq!((cfg.sd.width, cfg.sd.height), (720, 1280));
    assert_eq!(cfg.sd.num_images, 4);
    assert_eq!(cfg.sd.sampler, "Euler a");
    assert_eq!(cfg.voice.lang, "en");
    assert_eq!(cfg.video.total_secs, 60.0);
    assert_eq!(cfg.video.fps, 24);
    assert!(cfg.validate().is_ok());
}

#[test]
fn sd_url_env_override() {
    assert_eq!(sd_url_or_default(None), DEFAULT_SD_URL);
    assert_eq!(sd_url_or_default(Some("  ".to_string())), DEFAULT_SD_URL);
    assert_eq!(
        sd_url_or_default(Some("http://gpu-box:7860".to_string())),
        "http://gpu-box:7860"
    );
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{ "sd": { "num_images": 6, "url": "http://x:1" }, "video": { "seed": 7 } }"#;
    let cfg = ReelConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.sd.num_images, 6);
    assert_eq!(cfg.sd.url, "http://x:1");
    assert_eq!(cfg.sd.steps, 25);
    assert_eq!(cfg.video.seed, Some(7));
    assert_eq!(cfg.render.filter, ResizeFilter::Lanczos3);
}

#[test]
fn unknown_fields_are_rejected() {
    let json = r#"{ "sd": { "stepz": 3 } }"#;
    let err = ReelConfig::from_reader(json.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn out_of_range_settings_fail_validation() {
    let mut cfg = ReelConfig::default();
    cfg.sd.steps = 5;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.sd.width = 700;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.sd.num_images = 9;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.video.total_secs = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = ReelConfig::default();
    cfg.render.threads = Some(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn provider_names_are_snake_case() {
    let cfg: VoiceConfig = serde_json::from_str(r#"{ "provider": "openai" }"#).unwrap();
    assert_eq!(cfg.provider, VoiceProvider::Openai);
}

#[test]
fn absurd_timeline_length_fails_validation() {
    let mut cfg = ReelConfig::default();
    cfg.video.total_secs = 1e30;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("video.total_secs must be <="));

    cfg.video.total_secs = MAX_TOTAL_SECS;
    assert!(cfg.validate().is_ok());
}
