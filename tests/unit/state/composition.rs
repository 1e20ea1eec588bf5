use super::*;
use crate::state::logo::LogoPhase;
use crate::state::style::{DotStyle, EyeStyle};

fn shaped(shape: LogoShape) -> ShapedLogo {
    ShapedLogo::from_png(shape, 300, 300, vec![0x89, b'P', b'N', b'G'])
}

#[test]
fn switching_kind_keeps_every_payload() {
    let mut s = CompositionState::new();
    assert!(s.set_payload(ContentKind::Text, "hello"));
    assert!(s.set_content_kind(ContentKind::Image));
    assert_eq!(s.content().active_payload(), "");
    assert!(s.set_content_kind(ContentKind::Text));
    assert_eq!(s.content().active_payload(), "hello");
    assert!(!s.set_content_kind(ContentKind::Text));
}

#[test]
fn empty_payload_is_a_no_op() {
    let mut s = CompositionState::new();
    s.set_payload(ContentKind::Text, "keep me");
    assert!(!s.set_payload(ContentKind::Text, ""));
    assert_eq!(s.content().payload(ContentKind::Text), "keep me");
}

#[test]
fn logo_size_is_clamped() {
    let mut s = CompositionState::new();
    assert_eq!(s.logo().size_ratio(), 0.3);
    assert_eq!(s.set_logo_size(0.9), 0.5);
    assert_eq!(s.set_logo_size(0.01), 0.15);
    assert_eq!(s.set_logo_size(f64::NAN), 0.15);
    assert_eq!(s.set_logo_size(0.42), 0.42);
    assert_eq!(s.logo().size_ratio(), 0.42);
}

#[test]
fn reshape_reuses_the_original_raw_bytes() {
    let mut s = CompositionState::new();
    let job = s.set_logo(vec![1u8, 2, 3]);
    assert_eq!(s.logo().phase(), LogoPhase::Decoding);
    assert!(s.commit_logo(job.ticket, shaped(LogoShape::Square)));
    assert_eq!(s.logo().phase(), LogoPhase::Shaped);

    let reshape = s.set_logo_shape(LogoShape::Circle).unwrap();
    assert!(Arc::ptr_eq(&reshape.raw, &job.raw));
    assert_eq!(reshape.shape, LogoShape::Circle);
    assert!(s.commit_logo(reshape.ticket, shaped(LogoShape::Circle)));
    assert_eq!(
        s.logo().processed_image().map(|p| p.shape()),
        Some(LogoShape::Circle)
    );
}

#[test]
fn shape_change_without_logo_only_records_shape() {
    let mut s = CompositionState::new();
    assert!(s.set_logo_shape(LogoShape::Rectangle).is_none());
    assert_eq!(s.logo().shape(), LogoShape::Rectangle);
    assert_eq!(s.logo().phase(), LogoPhase::Empty);
}

#[test]
fn latest_upload_wins() {
    let mut s = CompositionState::new();
    let t1 = s.begin_upload(ContentKind::Image).unwrap();
    let t2 = s.begin_upload(ContentKind::Image).unwrap();
    assert!(s.commit_payload(t2, "https://cdn/images/b.png"));
    assert!(!s.commit_payload(t1, "https://cdn/images/a.png"));
    assert_eq!(
        s.content().payload(ContentKind::Image),
        "https://cdn/images/b.png"
    );
}

#[test]
fn uploads_for_different_kinds_do_not_interfere() {
    let mut s = CompositionState::new();
    let img = s.begin_upload(ContentKind::Image).unwrap();
    let pdf = s.begin_upload(ContentKind::Document).unwrap();
    assert!(s.commit_payload(pdf, "https://cdn/pdfs/x.pdf"));
    assert!(s.commit_payload(img, "https://cdn/images/x.png"));
}

#[test]
fn text_is_not_uploadable() {
    let mut s = CompositionState::new();
    assert!(matches!(
        s.begin_upload(ContentKind::Text),
        Err(QrCraftError::Validation(_))
    ));
}

#[test]
fn direct_payload_and_clear_retire_in_flight_uploads() {
    let mut s = CompositionState::new();
    let t = s.begin_upload(ContentKind::Audio).unwrap();
    s.set_payload(ContentKind::Audio, "https://elsewhere/a.mp3");
    assert!(!s.commit_payload(t, "https://cdn/audio/late.mp3"));

    let t = s.begin_upload(ContentKind::Audio).unwrap();
    assert!(s.clear_payload(ContentKind::Audio));
    assert!(!s.is_current(t));
    assert!(!s.commit_payload(t, "https://cdn/audio/late.mp3"));
    assert_eq!(s.content().payload(ContentKind::Audio), "");
}

#[test]
fn clear_logo_retires_shaping() {
    let mut s = CompositionState::new();
    let job = s.set_logo(vec![9u8; 4]);
    assert!(s.clear_logo());
    assert!(!s.commit_logo(job.ticket, shaped(LogoShape::Square)));
    assert!(s.logo().processed_image().is_none());
    assert_eq!(s.logo().phase(), LogoPhase::Empty);
    assert!(!s.clear_logo());
}

#[test]
fn stale_logo_job_is_discarded() {
    let mut s = CompositionState::new();
    let first = s.set_logo(vec![1u8]);
    let second = s.set_logo(vec![2u8]);
    assert!(!s.commit_logo(first.ticket, shaped(LogoShape::Square)));
    assert!(s.commit_logo(second.ticket, shaped(LogoShape::Square)));
}

#[test]
fn failed_reshape_keeps_previous_processed_image() {
    let mut s = CompositionState::new();
    let job = s.set_logo(vec![1u8]);
    s.commit_logo(job.ticket, shaped(LogoShape::Square));
    let reshape = s.set_logo_shape(LogoShape::Circle).unwrap();
    assert!(s.fail_logo(reshape.ticket));
    assert_eq!(s.logo().phase(), LogoPhase::Shaped);
    assert_eq!(s.logo().shape(), LogoShape::Square);
    assert_eq!(
        s.logo().processed_image().map(|p| p.shape()),
        Some(LogoShape::Square)
    );
}

#[test]
fn failed_first_shaping_empties_the_slot() {
    let mut s = CompositionState::new();
    let job = s.set_logo(vec![1u8]);
    assert!(s.fail_logo(job.ticket));
    assert!(s.logo().raw_image().is_none());
    assert_eq!(s.logo().phase(), LogoPhase::Empty);
}

#[test]
fn invalid_style_patch_changes_nothing() {
    let mut s = CompositionState::new();
    let patch = StylePatch {
        foreground_color: Some("#ff0000".into()),
        dot_style: Some("hexagon".into()),
        ..StylePatch::default()
    };
    assert!(s.set_style(&patch).is_err());
    assert_eq!(s.style(), &StyleSpec::default());

    assert!(s.set_style(&StylePatch::default().eyes(EyeStyle::Square)).unwrap());
    assert!(!s.set_style(&StylePatch::default().eyes(EyeStyle::Square)).unwrap());
}

#[test]
fn snapshot_round_trips_and_clamps_size() {
    let mut s = CompositionState::new();
    s.set_payload(ContentKind::Video, "https://cdn/videos/v.mp4");
    s.set_content_kind(ContentKind::Video);
    s.set_style(&StylePatch::default().dots(DotStyle::Dots)).unwrap();
    s.set_logo_shape(LogoShape::Circle);

    let mut snap = s.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"logoShape\":\"circle\""));
    let back: StateSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);

    snap.logo_size = Some(2.0);
    let restored = CompositionState::from_snapshot(snap).unwrap();
    assert_eq!(restored.logo().size_ratio(), 0.5);
    assert_eq!(restored.content().kind(), ContentKind::Video);
    assert_eq!(restored.style().dot_style, DotStyle::Dots);
    assert_eq!(restored.logo().shape(), LogoShape::Circle);
}

#[test]
fn snapshot_with_bad_color_is_rejected() {
    let mut snap = CompositionState::new().snapshot();
    snap.style.background_color = "nope".into();
    assert!(CompositionState::from_snapshot(snap).is_err());
}
