use super::*;

fn fps24() -> Fps {
    Fps::new(24, 1).unwrap()
}

#[test]
fn four_images_get_fifteen_seconds_each() {
    let plan = TimelinePlan::new(4, 60.0, fps24()).unwrap();
    assert_eq!(plan.total_frames(), 1440);
    assert_eq!(plan.nominal_segment_secs(), 15.0);
    for (k, seg) in plan.segments().iter().enumerate() {
        assert_eq!(seg.image_index, k);
        assert_eq!(seg.frames.len_frames(), 360);
        assert_eq!(seg.frames.start.0, 360 * k as u64);
        assert!((seg.duration_secs - 15.0).abs() < 1e-9);
    }
}

#[test]
fn uneven_split_is_contiguous_and_balanced() {
    let plan = TimelinePlan::new(7, 60.0, fps24()).unwrap();
    let segs = plan.segments();
    assert_eq!(segs.first().unwrap().frames.start.0, 0);
    assert_eq!(segs.last().unwrap().frames.end.0, 1440);
    for w in segs.windows(2) {
        assert_eq!(w[0].frames.end, w[1].frames.start);
    }
    let lens: Vec<u64> = segs.iter().map(|s| s.frames.len_frames()).collect();
    let min = *lens.iter().min().unwrap();
    let max = *lens.iter().max().unwrap();
    assert!(max - min <= 1);
    assert_eq!(lens.iter().sum::<u64>(), 1440);
}

#[test]
fn single_image_covers_everything() {
    let plan = TimelinePlan::new(1, 60.0, fps24()).unwrap();
    assert_eq!(plan.segments().len(), 1);
    assert_eq!(plan.segments()[0].frames, plan.range());
}

#[test]
fn locate_reports_segment_and_linear_progress() {
    let plan = TimelinePlan::new(4, 60.0, fps24()).unwrap();
    assert_eq!(plan.locate(FrameIndex(0)), Some((0, 0.0)));
    let (seg, p) = plan.locate(FrameIndex(180)).unwrap();
    assert_eq!(seg, 0);
    assert!((p - 0.5).abs() < 1e-9);
    let (seg, p) = plan.locate(FrameIndex(360)).unwrap();
    assert_eq!((seg, p), (1, 0.0));
    let (seg, p) = plan.locate(FrameIndex(1439)).unwrap();
    assert_eq!(seg, 3);
    assert!(p < 1.0 && p > 0.99);
    assert_eq!(plan.locate(FrameIndex(1440)), None);
}

#[test]
fn invalid_plans_are_rejected() {
    assert!(TimelinePlan::new(0, 60.0, fps24()).is_err());
    assert!(TimelinePlan::new(2, 0.0, fps24()).is_err());
    assert!(TimelinePlan::new(2, -1.0, fps24()).is_err());
    // 0.1 s at 24 fps is 2 frames.
    assert!(TimelinePlan::new(3, 0.1, fps24()).is_err());
}

#[test]
fn overlong_timeline_is_rejected() {
    assert!(TimelinePlan::new(4, 1e30, fps24()).is_err());
    assert!(TimelinePlan::new(4, crate::config::MAX_TOTAL_SECS + 1.0, fps24()).is_err());
}
