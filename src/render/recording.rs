use crate::assets::encode::ExportFormat;
use crate::foundation::error::{QrCraftError, QrCraftResult};
use crate::render::backend::{ExportedImage, QrRenderer};
use crate::render::request::RenderRequest;

/// Renderer that only remembers what it was asked to draw.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    requests: Vec<RenderRequest>,
    fail_with: Option<String>,
}

impl RecordingRenderer {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose `configure` always fails with `msg` (after recording the request).
    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            requests: Vec::new(),
            fail_with: Some(msg.into()),
        }
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> &[RenderRequest] {
        &self.requests
    }

    /// Most recent request.
    pub fn last(&self) -> Option<&RenderRequest> {
        self.requests.last()
    }
}

impl QrRenderer for RecordingRenderer {
    fn configure(&mut self, request: &RenderRequest) -> QrCraftResult<()> {
        self.requests.push(request.clone());
        match &self.fail_with {
            Some(msg) => Err(QrCraftError::render(msg.clone())),
            None => Ok(()),
        }
    }

    fn export(&self, format: ExportFormat, _filename_hint: &str) -> QrCraftResult<ExportedImage> {
        Err(QrCraftError::render(format!(
            "recording renderer cannot export {}",
            format.extension()
        )))
    }
}
