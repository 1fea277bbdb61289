use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(
        FrameRange::new(FrameIndex(3), FrameIndex(3))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn fps_frames_secs_roundtrip() {
    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(60.0), 1440);
    assert!((fps.frames_to_secs(1440) - 60.0).abs() < 1e-9);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
}

#[test]
fn canvas_requires_even_non_zero_dims() {
    assert!(
        Canvas {
            width: 720,
            height: 1280
        }
        .validate()
        .is_ok()
    );
    assert!(
        Canvas {
            width: 721,
            height: 1280
        }
        .validate()
        .is_err()
    );
    assert!(
        Canvas {
            width: 0,
            height: 2
        }
        .validate()
        .is_err()
    );
}

#[test]
fn black_frame_is_opaque() {
    let f = FrameRGBA::black(Canvas {
        width: 4,
        height: 2,
    });
    assert_eq!(f.data.len(), 32);
    assert_eq!(f.pixel(3, 1), [0, 0, 0, 255]);
}
