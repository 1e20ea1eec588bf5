use super::*;
use std::time::Duration;

use crate::assets::encode::encode_premul_rgba8;
use crate::render::recording::RecordingRenderer;
use crate::state::logo::LogoPhase;
use crate::state::style::DotStyle;
use crate::storage::memory::MemoryObjectStore;

fn editor_with(store: Arc<MemoryObjectStore>) -> QrEditor<RecordingRenderer> {
    QrEditor::new(EditorConfig::default(), RecordingRenderer::new(), store).unwrap()
}

fn editor() -> QrEditor<RecordingRenderer> {
    editor_with(Arc::new(MemoryObjectStore::default()))
}

fn png(w: u32, h: u32) -> Vec<u8> {
    let px: Vec<u8> = std::iter::repeat_n([20u8, 120, 220, 255], (w * h) as usize)
        .flatten()
        .collect();
    encode_premul_rgba8(&px, w, h, ExportFormat::Png).unwrap()
}

#[test]
fn new_session_renders_initial_text() {
    let ed = editor();
    assert_eq!(ed.renderer().requests().len(), 1);
    assert_eq!(ed.last_request().unwrap().data, "https://google.com");
    assert!(ed.notices().is_empty());
}

#[test]
fn every_mutation_rerenders() {
    let mut ed = editor();
    ed.set_payload(ContentKind::Text, "abc");
    ed.set_style(&StylePatch::default().dots(DotStyle::Square)).unwrap();
    ed.set_logo_size(0.45);
    ed.set_content_kind(ContentKind::Image);
    assert_eq!(ed.renderer().requests().len(), 5);

    let last = ed.last_request().unwrap();
    assert_eq!(last.data, "");
    assert_eq!(last.dot_style, DotStyle::Square);
    assert_eq!(last.image_size_ratio, 0.45);
}

#[test]
fn invalid_style_is_an_error_not_a_notice() {
    let mut ed = editor();
    let patch = StylePatch {
        eye_style: Some("star".into()),
        ..StylePatch::default()
    };
    assert!(ed.set_style(&patch).is_err());
    assert!(ed.notices().is_empty());
}

#[test]
fn upload_stores_file_and_sets_payload() {
    let store = Arc::new(MemoryObjectStore::new("https://cdn.example"));
    let mut ed = editor_with(store.clone());
    assert!(ed.upload(ContentKind::Document, UploadFile::new("Report.PDF", vec![1u8, 2, 3])));

    let url = ed.state().content().payload(ContentKind::Document).to_owned();
    assert!(url.starts_with("https://cdn.example/pdfs/"));
    assert!(url.ends_with(".pdf"));
    assert_eq!(store.get_by_url(&url).as_deref(), Some(&[1u8, 2, 3][..]));
}

#[test]
fn failed_upload_becomes_notice_and_keeps_slot() {
    let store = Arc::new(MemoryObjectStore::default());
    let mut ed = editor_with(store.clone());
    ed.set_payload(ContentKind::Audio, "https://old/a.mp3");
    store.set_failing(true);

    assert!(!ed.upload(ContentKind::Audio, UploadFile::new("b.mp3", vec![9u8])));
    assert_eq!(ed.state().content().payload(ContentKind::Audio), "https://old/a.mp3");
    let notices = ed.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::UploadFailed);
    assert!(ed.notices().is_empty());
}

#[test]
fn empty_file_and_text_kind_are_rejected() {
    let mut ed = editor();
    assert!(!ed.upload(ContentKind::Image, UploadFile::new("x.png", Vec::new())));
    assert!(ed.begin_upload(ContentKind::Text, UploadFile::new("x.txt", vec![1u8])).is_err());
    assert_eq!(ed.take_notices().len(), 1);
}

#[test]
fn slow_upload_times_out() {
    let store = Arc::new(MemoryObjectStore::default().with_delay(Duration::from_millis(500)));
    let cfg = EditorConfig {
        upload_timeout_ms: 20,
        ..EditorConfig::default()
    };
    let mut ed = QrEditor::new(cfg, RecordingRenderer::new(), store).unwrap();
    assert!(!ed.upload(ContentKind::Video, UploadFile::new("v.mp4", vec![0u8; 16])));
    let notices = ed.take_notices();
    assert_eq!(notices[0].kind, NoticeKind::UploadFailed);
    assert!(notices[0].message.contains("did not finish"));
    assert_eq!(ed.state().content().payload(ContentKind::Video), "");
}

#[test]
fn out_of_order_upload_results_keep_the_latest() {
    let store = Arc::new(MemoryObjectStore::default());
    let mut ed = editor_with(store.clone());
    let first = ed
        .begin_upload(ContentKind::Image, UploadFile::new("a.png", vec![1u8]))
        .unwrap();
    let second = ed
        .begin_upload(ContentKind::Image, UploadFile::new("b.png", vec![2u8]))
        .unwrap();

    let second_url = second.store_in(store.as_ref()).unwrap();
    let first_url = first.store_in(store.as_ref()).unwrap();
    assert!(ed.finish_upload(second.ticket(), Ok(second_url.clone())));
    assert!(!ed.finish_upload(first.ticket(), Ok(first_url)));
    assert_eq!(ed.state().content().payload(ContentKind::Image), second_url);

    // A stale failure is silent.
    assert!(!ed.finish_upload(first.ticket(), Err(QrCraftError::upload("late"))));
    assert!(ed.notices().is_empty());
}

#[test]
fn logo_is_shaped_and_rendered() {
    let mut ed = editor();
    assert!(ed.set_logo(png(40, 20)));
    let logo = ed.state().logo();
    assert_eq!(logo.phase(), LogoPhase::Shaped);
    let shaped = ed.last_request().unwrap().image.clone().unwrap();
    assert_eq!((shaped.width(), shaped.height()), (300, 300));

    assert!(ed.set_logo_shape(LogoShape::Rectangle));
    let shaped = ed.last_request().unwrap().image.clone().unwrap();
    assert_eq!((shaped.width(), shaped.height()), (420, 300));
}

#[test]
fn undecodable_logo_becomes_notice() {
    let mut ed = editor();
    assert!(!ed.set_logo(vec![1u8, 2, 3, 4]));
    let notices = ed.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::LogoFailed);
    assert_eq!(ed.state().logo().phase(), LogoPhase::Empty);
    assert!(ed.last_request().unwrap().image.is_none());
}

#[test]
fn shape_change_without_logo_does_no_work() {
    let mut ed = editor();
    assert!(!ed.set_logo_shape(LogoShape::Circle));
    assert_eq!(ed.state().logo().shape(), LogoShape::Circle);
    assert!(ed.notices().is_empty());
}

#[test]
fn clear_logo_removes_overlay() {
    let mut ed = editor();
    ed.set_logo(png(8, 8));
    assert!(ed.clear_logo());
    assert!(ed.last_request().unwrap().image.is_none());
}

#[test]
fn renderer_failures_become_notices() {
    let store: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::default());
    let mut ed = QrEditor::new(
        EditorConfig::default(),
        RecordingRenderer::failing("backend down"),
        store,
    )
    .unwrap();
    ed.set_payload(ContentKind::Text, "x");
    let notices = ed.take_notices();
    assert_eq!(notices.len(), 2);
    assert!(notices.iter().all(|n| n.kind == NoticeKind::RenderFailed));
    assert_eq!(ed.last_request().unwrap().data, "x");
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = EditorConfig {
        qr_size: 0,
        ..EditorConfig::default()
    };
    let store: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::default());
    assert!(QrEditor::new(cfg, RecordingRenderer::new(), store).is_err());
}

#[test]
fn logo_canvas_follows_configured_symbol_size() {
    let cfg = EditorConfig {
        qr_size: 600,
        ..EditorConfig::default()
    };
    let store: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::default());
    let mut ed = QrEditor::new(cfg, RecordingRenderer::new(), store).unwrap();

    ed.set_logo_shape(LogoShape::Rectangle);
    assert!(ed.set_logo(png(30, 30)));
    let shaped = ed.state().logo().processed_image().unwrap();
    assert_eq!((shaped.width(), shaped.height()), (840, 600));

    assert!(ed.set_logo_shape(LogoShape::Circle));
    let shaped = ed.state().logo().processed_image().unwrap();
    assert_eq!((shaped.width(), shaped.height()), (600, 600));
}

#[test]
fn timed_out_reshape_keeps_the_previous_overlay() {
    let mut ed = editor();
    assert!(ed.set_logo(png(12, 12)));
    let before = ed.last_request().unwrap().image.clone().unwrap();

    let job = ed.begin_logo_shape(LogoShape::Circle).unwrap();
    assert_eq!(ed.state().logo().phase(), LogoPhase::Decoding);
    let timed_out = Err(QrCraftError::timeout("logo shaping", Duration::from_millis(5)));
    assert!(!ed.finish_logo_shape(job.ticket, timed_out));

    let notices = ed.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::LogoFailed);
    assert!(notices[0].message.contains("did not finish"));

    let logo = ed.state().logo();
    assert_eq!(logo.phase(), LogoPhase::Shaped);
    assert_eq!(logo.shape(), LogoShape::Square);
    assert_eq!(logo.processed_image(), Some(&before));
    assert_eq!(ed.last_request().unwrap().image.as_ref(), Some(&before));
}

#[test]
fn configured_logo_size_is_clamped_on_start() {
    let cfg = EditorConfig {
        logo_size: 3.0,
        ..EditorConfig::default()
    };
    let store: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::default());
    let ed = QrEditor::new(cfg, RecordingRenderer::new(), store).unwrap();
    assert_eq!(ed.state().logo().size_ratio(), 0.5);
    assert_eq!(ed.last_request().unwrap().image_size_ratio, 0.5);
}
