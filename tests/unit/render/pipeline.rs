use super::*;
use crate::logo::shaper::ShapedLogo;
use crate::render::recording::RecordingRenderer;
use crate::state::content::ContentKind;
use crate::state::logo::LogoShape;
use crate::state::style::{DotStyle, EyeStyle, StylePatch};

#[test]
fn fresh_state_renders_empty_text() {
    let state = CompositionState::new();
    let req = build_request(&state);
    assert_eq!(req.data, "");
    assert!(req.image.is_none());
    assert_eq!(req.image_margin, IMAGE_MARGIN);
    assert_eq!(req.image_size_ratio, 0.3);
    assert_eq!(req.dot_style, DotStyle::Rounded);
    assert_eq!(req.eye_style, EyeStyle::Rounded);
}

#[test]
fn request_is_idempotent() {
    let mut state = CompositionState::new();
    state.set_payload(ContentKind::Text, "https://example.com");
    state
        .set_style(&StylePatch::default().foreground("#123456").dots(DotStyle::Classy))
        .unwrap();
    let job = state.set_logo(vec![1u8, 2, 3]);
    state.commit_logo(
        job.ticket,
        ShapedLogo::from_png(LogoShape::Square, 300, 300, vec![7u8; 8]),
    );

    assert_eq!(build_request(&state), build_request(&state));
}

#[test]
fn active_audio_without_upload_is_empty() {
    let mut state = CompositionState::new();
    state.set_payload(ContentKind::Text, "hello");
    state.set_content_kind(ContentKind::Audio);
    assert_eq!(build_request(&state).data, "");
}

#[test]
fn style_passes_through_unchanged() {
    let mut state = CompositionState::new();
    state
        .set_style(
            &StylePatch::default()
                .foreground("#ff0000")
                .background("rgb(0, 0, 255)")
                .eyes(EyeStyle::ExtraRounded),
        )
        .unwrap();
    let req = build_request(&state);
    assert_eq!(req.foreground_color, "#ff0000");
    assert_eq!(req.background_color, "rgb(0, 0, 255)");
    assert_eq!(req.eye_style, EyeStyle::ExtraRounded);
}

#[test]
fn submit_forwards_full_request() {
    let mut state = CompositionState::new();
    state.set_payload(ContentKind::Text, "abc");
    let mut renderer = RecordingRenderer::new();
    let (req, res) = submit(&state, &mut renderer);
    assert!(res.is_ok());
    assert_eq!(renderer.last(), Some(&req));

    let mut failing = RecordingRenderer::failing("no target");
    let (req2, res2) = submit(&state, &mut failing);
    assert!(res2.is_err());
    assert_eq!(req2, req);
}

#[test]
fn request_serializes_with_camel_case_keys() {
    let mut state = CompositionState::new();
    state.set_payload(ContentKind::Text, "abc");
    let v = serde_json::to_value(build_request(&state)).unwrap();
    assert_eq!(v["data"], "abc");
    assert_eq!(v["dotStyle"], "rounded");
    assert_eq!(v["eyeStyle"], "rounded");
    assert_eq!(v["imageMargin"], 6);
    assert!(v["image"].is_null());
}
