use super::*;

#[test]
fn frames_and_duration_follow_channel_count() {
    let pcm = AudioPcm {
        sample_rate: MIX_SAMPLE_RATE,
        channels: 2,
        interleaved_f32: vec![0.0; 44_100 * 2 * 3],
    };
    assert_eq!(pcm.frames(), 132_300);
    assert!((pcm.duration_secs() - 3.0).abs() < 1e-12);
}

#[test]
fn degenerate_layouts_report_nothing() {
    let pcm = AudioPcm {
        sample_rate: 0,
        channels: 0,
        interleaved_f32: vec![0.5; 10],
    };
    assert_eq!(pcm.frames(), 0);
    assert_eq!(pcm.duration_secs(), 0.0);
}

#[test]
fn decoding_a_missing_file_is_a_media_error() {
    if !crate::media::is_ffmpeg_on_path() {
        return;
    }
    let err = decode_audio_f32_stereo(Path::new("definitely/not/here.mp3"), MIX_SAMPLE_RATE)
        .unwrap_err();
    assert!(matches!(err, ReelError::Media(_)));
}
