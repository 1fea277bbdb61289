use super::*;
use crate::encode::sink::AudioInputConfig;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(24, 1).unwrap(),
        audio: None,
        duration_secs: None,
    }
}

fn args_of(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn video_only_command_disables_audio() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("out/v.mp4"));
    let args = args_of(&sink.build_command(&cfg(720, 1280)).unwrap());
    assert!(args.contains(&"-an".to_string()));
    assert!(args.contains(&"720x1280".to_string()));
    assert!(args.contains(&"24/1".to_string()));
    assert!(args.contains(&"libx264".to_string()));
    assert_eq!(args.last().unwrap(), "out/v.mp4");
}

#[test]
fn audio_and_duration_are_wired_in() {
    let mut c = cfg(720, 1280);
    c.audio = Some(AudioInputConfig {
        path: PathBuf::from("/tmp/n.f32le"),
        sample_rate: 44_100,
        channels: 2,
    });
    c.duration_secs = Some(60.0);
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("v.mp4"));
    let args = args_of(&sink.build_command(&c).unwrap());
    let pos = |s: &str| args.iter().position(|a| a == s).unwrap();
    assert_eq!(args[pos("-ar") + 1], "44100");
    assert_eq!(args[pos("-ac") + 1], "2");
    assert_eq!(args[pos("-c:a") + 1], "aac");
    assert_eq!(args[pos("-t") + 1], "60.000000");
    assert_eq!(args[pos("-threads") + 1], "4");
    assert!(!args.contains(&"-an".to_string()));
}

#[test]
fn bad_audio_config_is_rejected() {
    let mut c = cfg(8, 8);
    c.audio = Some(AudioInputConfig {
        path: PathBuf::from("a.f32le"),
        sample_rate: 0,
        channels: 2,
    });
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("v.mp4"));
    assert!(sink.build_command(&c).is_err());
}

#[test]
fn begin_rejects_odd_dimensions() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("v.mp4"));
    assert!(matches!(
        sink.begin(cfg(721, 1280)),
        Err(ReelError::Validation(_))
    ));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("v.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn dropping_an_unfinished_sink_stops_ffmpeg_and_removes_output() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("partial.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out.clone()));
    sink.begin(cfg(16, 16)).unwrap();
    let frame = FrameRGBA {
        width: 16,
        height: 16,
        data: vec![255; 16 * 16 * 4],
    };
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    drop(sink);
    assert!(!out.exists());
}

#[test]
fn finished_sink_keeps_its_output() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("done.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out.clone()));
    sink.begin(cfg(16, 16)).unwrap();
    let frame = FrameRGBA {
        width: 16,
        height: 16,
        data: vec![0; 16 * 16 * 4],
    };
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &frame).unwrap();
    }
    sink.end().unwrap();
    drop(sink);
    assert!(out.exists());
}
