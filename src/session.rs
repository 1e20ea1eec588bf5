//! Editor session: the composition state wired to a render target and an object store.
//!
//! Every mutation re-runs the render pipeline. Slow work (uploads, logo shaping) is split into
//! `begin_*` / `finish_*` halves so callers can run it anywhere; the blocking conveniences run
//! it on a worker thread bounded by the configured timeouts.

use std::sync::Arc;

use crate::assets::encode::ExportFormat;
use crate::config::EditorConfig;
use crate::foundation::deadline::run_with_timeout;
use crate::foundation::error::{QrCraftError, QrCraftResult};
use crate::logo::shaper::{ShapedLogo, shape_logo_bounded};
use crate::render::backend::{ExportedImage, QrRenderer};
use crate::render::pipeline::submit;
use crate::render::request::RenderRequest;
use crate::state::composition::{CompositionState, StateSnapshot};
use crate::state::content::{ContentKind, ContentSelection};
use crate::state::logo::{LogoJob, LogoShape};
use crate::state::sequence::Ticket;
use crate::state::style::StylePatch;
use crate::storage::{FolderKey, ObjectStore, UploadFile};

/// What a [`Notice`] is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// An upload failed or timed out; the payload slot is unchanged.
    UploadFailed,
    /// A logo could not be decoded or shaped.
    LogoFailed,
    /// The render target rejected a request.
    RenderFailed,
}

/// Non-fatal, user-visible notification.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Notice {
    /// Category.
    pub kind: NoticeKind,
    /// Human-readable message.
    pub message: String,
}

/// An upload that has been accepted and ticketed but not yet stored.
#[derive(Clone, Debug)]
pub struct PendingUpload {
    ticket: Ticket,
    kind: ContentKind,
    folder: FolderKey,
    file: UploadFile,
}

impl PendingUpload {
    /// Ticket to hand back to [`QrEditor::finish_upload`].
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Payload slot the upload targets.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Storage folder derived from the kind.
    pub fn folder(&self) -> FolderKey {
        self.folder
    }

    /// File to store.
    pub fn file(&self) -> &UploadFile {
        &self.file
    }

    /// Store the file in `store`, returning its public URL.
    pub fn store_in(&self, store: &dyn ObjectStore) -> QrCraftResult<String> {
        store.store(&self.file, self.folder)
    }
}

/// A QR editor session.
pub struct QrEditor<R: QrRenderer> {
    config: EditorConfig,
    state: CompositionState,
    renderer: R,
    store: Arc<dyn ObjectStore>,
    notices: Vec<Notice>,
    last_request: Option<RenderRequest>,
}

impl<R: QrRenderer> std::fmt::Debug for QrEditor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrEditor")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("notices", &self.notices)
            .finish_non_exhaustive()
    }
}

impl<R: QrRenderer> QrEditor<R> {
    /// Start a session from `config` and render the initial state once.
    pub fn new(config: EditorConfig, renderer: R, store: Arc<dyn ObjectStore>) -> QrCraftResult<Self> {
        config.validate()?;
        let mut state = CompositionState::from_snapshot(StateSnapshot {
            content: ContentSelection::default(),
            style: config.style.clone(),
            logo_shape: LogoShape::default(),
            logo_size: Some(config.initial_logo_size()),
        })?;
        state.set_payload(ContentKind::Text, config.text.clone());
        Self::with_state(config, state, renderer, store)
    }

    /// Start a session over an existing state and render it once.
    pub fn with_state(
        config: EditorConfig,
        state: CompositionState,
        renderer: R,
        store: Arc<dyn ObjectStore>,
    ) -> QrCraftResult<Self> {
        config.validate()?;
        let mut editor = Self {
            config,
            state,
            renderer,
            store,
            notices: Vec::new(),
            last_request: None,
        };
        editor.rerender();
        Ok(editor)
    }

    /// Session configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current composition state.
    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    /// The render target.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Shared handle to the object store, for running uploads off-session.
    pub fn store(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.store)
    }

    /// The request most recently handed to the renderer.
    pub fn last_request(&self) -> Option<&RenderRequest> {
        self.last_request.as_ref()
    }

    /// Notices not yet drained.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// End the session and hand back the render target.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Switch the active content kind.
    pub fn set_content_kind(&mut self, kind: ContentKind) -> bool {
        let changed = self.state.set_content_kind(kind);
        self.rerender();
        changed
    }

    /// Set a payload directly (typed text or an already-hosted URL).
    pub fn set_payload(&mut self, kind: ContentKind, value: impl Into<String>) -> bool {
        let changed = self.state.set_payload(kind, value);
        self.rerender();
        changed
    }

    /// Clear the payload for `kind`.
    pub fn clear_payload(&mut self, kind: ContentKind) -> bool {
        let changed = self.state.clear_payload(kind);
        self.rerender();
        changed
    }

    /// Merge a style patch. Invalid values are rejected and nothing changes.
    pub fn set_style(&mut self, patch: &StylePatch) -> QrCraftResult<bool> {
        let changed = self.state.set_style(patch)?;
        self.rerender();
        Ok(changed)
    }

    /// Set the logo size ratio; returns the clamped value actually stored.
    pub fn set_logo_size(&mut self, ratio: f64) -> f64 {
        let stored = self.state.set_logo_size(ratio);
        self.rerender();
        stored
    }

    /// Accept `file` for `kind` and issue its ticket. Nothing is stored yet.
    pub fn begin_upload(&mut self, kind: ContentKind, file: UploadFile) -> QrCraftResult<PendingUpload> {
        let folder = kind.folder().ok_or_else(|| {
            QrCraftError::validation(format!("content kind '{kind}' is not file-backed"))
        })?;
        file.validate()?;
        let ticket = self.state.begin_upload(kind)?;
        tracing::debug!(%kind, %folder, name = %file.name, "upload started");
        Ok(PendingUpload {
            ticket,
            kind,
            folder,
            file,
        })
    }

    /// Apply an upload outcome. Returns whether the payload changed.
    ///
    /// Stale outcomes are dropped. Failures of the latest upload become an
    /// [`NoticeKind::UploadFailed`] notice and leave the slot untouched.
    pub fn finish_upload(&mut self, ticket: Ticket, result: QrCraftResult<String>) -> bool {
        match result {
            Ok(url) => {
                let changed = self.state.commit_payload(ticket, url);
                if changed {
                    self.rerender();
                }
                changed
            }
            Err(e) => {
                if self.state.is_current(ticket) {
                    tracing::warn!(error = %e, "upload failed");
                    self.push_notice(NoticeKind::UploadFailed, format!("upload failed: {e}"));
                } else {
                    tracing::debug!(error = %e, "ignoring failure of a stale upload");
                }
                false
            }
        }
    }

    /// Upload `file` for `kind`, blocking for at most the configured upload timeout.
    #[tracing::instrument(skip(self, file), fields(name = %file.name))]
    pub fn upload(&mut self, kind: ContentKind, file: UploadFile) -> bool {
        let pending = match self.begin_upload(kind, file) {
            Ok(p) => p,
            Err(e) => {
                self.push_notice(NoticeKind::UploadFailed, format!("upload rejected: {e}"));
                return false;
            }
        };
        let ticket = pending.ticket();
        let store = self.store();
        let result = run_with_timeout("upload", self.config.upload_timeout(), move || {
            pending.store_in(store.as_ref())
        });
        self.finish_upload(ticket, result)
    }

    /// Replace the raw logo and return the shaping job to run.
    pub fn begin_logo(&mut self, raw: impl Into<Arc<[u8]>>) -> LogoJob {
        let job = self.state.set_logo(raw);
        self.rerender();
        job
    }

    /// Change the logo shape; returns a re-shape job when a raw logo exists.
    pub fn begin_logo_shape(&mut self, shape: LogoShape) -> Option<LogoJob> {
        let job = self.state.set_logo_shape(shape);
        self.rerender();
        job
    }

    /// Apply a shaping outcome. Returns whether it was committed.
    pub fn finish_logo_shape(&mut self, ticket: Ticket, result: QrCraftResult<ShapedLogo>) -> bool {
        match result {
            Ok(shaped) => {
                let committed = self.state.commit_logo(ticket, shaped);
                if committed {
                    self.rerender();
                }
                committed
            }
            Err(e) => {
                if self.state.fail_logo(ticket) {
                    tracing::warn!(error = %e, "logo shaping failed");
                    self.push_notice(NoticeKind::LogoFailed, format!("logo failed: {e}"));
                    self.rerender();
                }
                false
            }
        }
    }

    /// Set a logo from raw bytes and shape it, bounded by the decode timeout.
    pub fn set_logo(&mut self, raw: impl Into<Arc<[u8]>>) -> bool {
        let job = self.begin_logo(raw);
        self.run_logo_job(job)
    }

    /// Change the logo shape and re-shape the kept raw bytes, if any.
    pub fn set_logo_shape(&mut self, shape: LogoShape) -> bool {
        match self.begin_logo_shape(shape) {
            Some(job) => self.run_logo_job(job),
            None => false,
        }
    }

    /// Remove the logo.
    pub fn clear_logo(&mut self) -> bool {
        let changed = self.state.clear_logo();
        self.rerender();
        changed
    }

    /// Export the current symbol through the renderer.
    pub fn export(&self, format: ExportFormat, filename_hint: &str) -> QrCraftResult<ExportedImage> {
        self.renderer.export(format, filename_hint)
    }

    fn run_logo_job(&mut self, job: LogoJob) -> bool {
        let result = shape_logo_bounded(
            job.raw,
            job.shape,
            self.config.shape_options(),
            self.config.decode_timeout(),
        );
        self.finish_logo_shape(job.ticket, result)
    }

    fn rerender(&mut self) {
        let (request, res) = submit(&self.state, &mut self.renderer);
        if let Err(e) = res {
            tracing::warn!(error = %e, "renderer rejected request");
            self.push_notice(NoticeKind::RenderFailed, e.to_string());
        }
        self.last_request = Some(request);
    }

    fn push_notice(&mut self, kind: NoticeKind, message: String) {
        self.notices.push(Notice { kind, message });
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
