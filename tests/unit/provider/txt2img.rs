use super::*;
use image::{ImageFormat, Rgba};
use std::io::Cursor;

fn png_b64(w: u32, h: u32, px: [u8; 4]) -> String {
    let img = RgbaImage::from_pixel(w, h, Rgba(px));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[test]
fn request_payload_matches_webui_fields() {
    let cfg = SdConfig {
        url: "http://sd".to_string(),
        ..SdConfig::default()
    };
    let req = Txt2ImgRequest::from_config(&cfg, "forest at dawn", "blurry");
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["prompt"], "forest at dawn");
    assert_eq!(v["negative_prompt"], "blurry");
    assert_eq!(v["batch_size"], 1);
    assert_eq!(v["n_iter"], 4);
    assert_eq!(v["restore_faces"], false);
    assert_eq!(v["tiling"], false);
    assert_eq!(v["sampler_name"], "Euler a");
}

#[test]
fn empty_sampler_is_omitted() {
    let cfg = SdConfig {
        sampler: "  ".to_string(),
        ..SdConfig::default()
    };
    let req = Txt2ImgRequest::from_config(&cfg, "p", "");
    let v = serde_json::to_value(&req).unwrap();
    assert!(v.get("sampler_name").is_none());
}

#[test]
fn decode_strips_data_url_prefix_and_drops_alpha() {
    let b64 = format!("data:image/png;base64,{}", png_b64(3, 2, [10, 20, 30, 0]));
    let img = decode_b64_image(&b64).unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
}

#[test]
fn decode_plain_base64() {
    let img = decode_b64_image(&png_b64(1, 1, [1, 2, 3, 255])).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [1, 2, 3, 255]);
}

#[test]
fn invalid_payload_is_provider_error() {
    let err = decode_b64_image("!!!not-base64").unwrap_err();
    assert!(matches!(err, ReelError::Provider(_)));

    let not_an_image = base64::engine::general_purpose::STANDARD.encode(b"hello");
    assert!(decode_b64_image(&not_an_image).is_err());
}

#[test]
fn missing_images_field_means_no_images() {
    let resp: Txt2ImgResponse = serde_json::from_str(r#"{ "info": "{}" }"#).unwrap();
    assert!(decode_images(&resp).unwrap().is_empty());
}

#[test]
fn bad_entry_is_reported_by_index_once() {
    let resp = Txt2ImgResponse {
        images: vec![png_b64(2, 2, [1, 2, 3, 255]), "@@@".to_string()],
    };
    let msg = decode_images(&resp).unwrap_err().to_string();
    assert!(
        msg.starts_with("image provider error: image #1: invalid base64"),
        "{msg}"
    );
    assert_eq!(msg.matches("image provider error").count(), 1, "{msg}");
}
