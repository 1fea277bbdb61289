use super::*;

fn pcm(frames: usize, value: f32) -> AudioPcm {
    AudioPcm {
        sample_rate: 100,
        channels: 2,
        interleaved_f32: vec![value; frames * 2],
    }
}

#[test]
fn long_narration_is_clipped_to_target() {
    let (out, fit) = fit_to_duration(pcm(7_500, 0.5), 60.0).unwrap();
    assert_eq!(out.frames(), 6_000);
    assert_eq!(out.interleaved_f32.len(), 12_000);
    assert!((out.duration_secs() - 60.0).abs() < 1e-9);
    assert_eq!(fit, AudioFit::Truncated { dropped_secs: 15.0 });
    assert!(out.interleaved_f32.iter().all(|&s| s == 0.5));
}

#[test]
fn short_narration_is_padded_with_trailing_silence() {
    let (out, fit) = fit_to_duration(pcm(2_000, 0.25), 60.0).unwrap();
    assert_eq!(out.frames(), 6_000);
    assert_eq!(fit, AudioFit::Padded { silence_secs: 40.0 });
    // Narration stays at the start, silence after it.
    assert!(out.interleaved_f32[..4_000].iter().all(|&s| s == 0.25));
    assert!(out.interleaved_f32[4_000..].iter().all(|&s| s == 0.0));
}

#[test]
fn exact_length_is_untouched() {
    let input = pcm(6_000, 0.1);
    let (out, fit) = fit_to_duration(input.clone(), 60.0).unwrap();
    assert_eq!(fit, AudioFit::Exact);
    assert_eq!(out, input);
}

#[test]
fn empty_narration_becomes_pure_silence() {
    let (out, fit) = fit_to_duration(pcm(0, 0.0), 60.0).unwrap();
    assert_eq!(out.frames(), 6_000);
    assert_eq!(fit, AudioFit::Padded { silence_secs: 60.0 });
}

#[test]
fn dangling_partial_frame_is_dropped() {
    let mut input = pcm(6_000, 0.1);
    input.interleaved_f32.push(0.9);
    let (out, fit) = fit_to_duration(input, 60.0).unwrap();
    assert_eq!(fit, AudioFit::Exact);
    assert_eq!(out.interleaved_f32.len(), 12_000);
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(fit_to_duration(pcm(10, 0.0), 0.0).is_err());
    assert!(fit_to_duration(pcm(10, 0.0), f64::NAN).is_err());
    let mut bad = pcm(10, 0.0);
    bad.channels = 0;
    assert!(fit_to_duration(bad, 1.0).is_err());
}

#[test]
fn target_frames_at_44k1() {
    assert_eq!(target_frames(60.0, 44_100), 2_646_000);
}

#[test]
fn f32le_file_has_four_bytes_per_sample() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("a.f32le");
    write_f32le(&[0.5, -2.0], &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8);
    assert_eq!(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0.5);
    // Out-of-range samples are clamped.
    assert_eq!(f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), -1.0);
}

#[test]
fn unbufferable_target_is_rejected() {
    let err = fit_to_duration(pcm(10, 0.1), 1e30).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(err.to_string().contains("too long"));
}
