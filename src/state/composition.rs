use std::sync::Arc;

use crate::foundation::error::{QrCraftError, QrCraftResult};
use crate::logo::shaper::ShapedLogo;
use crate::state::content::{ContentKind, ContentSelection};
use crate::state::logo::{LogoJob, LogoShape, LogoSpec};
use crate::state::sequence::{Slot, SlotSequencer, Ticket};
use crate::state::style::{StylePatch, StyleSpec};

/// Single source of truth for content, style and logo parameters.
///
/// Every mutator reports whether anything observable changed; callers re-run the render
/// pipeline when it did.
#[derive(Clone, Debug, Default)]
pub struct CompositionState {
    content: ContentSelection,
    style: StyleSpec,
    logo: LogoSpec,
    seq: SlotSequencer,
}

/// Serializable subset of [`CompositionState`] (everything but logo bytes).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateSnapshot {
    /// Content selection with all payloads.
    pub content: ContentSelection,
    /// Style fields.
    pub style: StyleSpec,
    /// Logo shape.
    pub logo_shape: LogoShape,
    /// Logo size ratio; clamped on load.
    pub logo_size: Option<f64>,
}

impl CompositionState {
    /// Fresh state: text content, default style, no logo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild state from a snapshot, validating style and clamping logo size.
    pub fn from_snapshot(snapshot: StateSnapshot) -> QrCraftResult<Self> {
        snapshot.style.validate()?;
        let mut state = Self {
            content: snapshot.content,
            style: snapshot.style,
            ..Self::default()
        };
        state.logo.set_shape(snapshot.logo_shape);
        if let Some(size) = snapshot.logo_size {
            state.logo.set_size_ratio(size);
        }
        Ok(state)
    }

    /// Capture the serializable part of the state.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            content: self.content.clone(),
            style: self.style.clone(),
            logo_shape: self.logo.shape(),
            logo_size: Some(self.logo.size_ratio()),
        }
    }

    /// Content selection.
    pub fn content(&self) -> &ContentSelection {
        &self.content
    }

    /// Style fields.
    pub fn style(&self) -> &StyleSpec {
        &self.style
    }

    /// Logo parameters and cache.
    pub fn logo(&self) -> &LogoSpec {
        &self.logo
    }

    /// Switch the active content kind. Payloads of all kinds are kept.
    pub fn set_content_kind(&mut self, kind: ContentKind) -> bool {
        let changed = self.content.set_kind(kind);
        if changed {
            tracing::debug!(%kind, "content kind switched");
        }
        changed
    }

    /// Store a resolved payload for `kind`. Empty values are ignored.
    ///
    /// Uploads still in flight for the same slot are retired, so they cannot overwrite this value.
    pub fn set_payload(&mut self, kind: ContentKind, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            tracing::debug!(%kind, "ignoring empty payload");
            return false;
        }
        self.seq.invalidate(Slot::Payload(kind));
        self.content.set_payload(kind, value)
    }

    /// Drop the payload stored for `kind` and retire in-flight uploads for it.
    pub fn clear_payload(&mut self, kind: ContentKind) -> bool {
        self.seq.invalidate(Slot::Payload(kind));
        self.content.clear_payload(kind)
    }

    /// Merge a style patch. Out-of-domain values are rejected and nothing is applied.
    pub fn set_style(&mut self, patch: &StylePatch) -> QrCraftResult<bool> {
        let merged = self.style.merged(patch)?;
        if merged == self.style {
            return Ok(false);
        }
        self.style = merged;
        Ok(true)
    }

    /// Replace the raw logo. The processed image is cleared until the returned job commits.
    pub fn set_logo(&mut self, raw: impl Into<Arc<[u8]>>) -> LogoJob {
        let raw = raw.into();
        self.logo.replace_raw(raw.clone());
        LogoJob {
            ticket: self.seq.issue(Slot::Logo),
            raw,
            shape: self.logo.shape(),
        }
    }

    /// Change the logo shape. Returns a re-shape job over the existing raw bytes, if any.
    pub fn set_logo_shape(&mut self, shape: LogoShape) -> Option<LogoJob> {
        let raw = self.logo.set_shape(shape)?;
        Some(LogoJob {
            ticket: self.seq.issue(Slot::Logo),
            raw,
            shape,
        })
    }

    /// Set the logo size, clamped into range. Returns the stored ratio.
    pub fn set_logo_size(&mut self, ratio: f64) -> f64 {
        let stored = self.logo.set_size_ratio(ratio);
        if stored != ratio {
            tracing::debug!(requested = ratio, stored, "logo size clamped");
        }
        stored
    }

    /// Remove the logo entirely and retire in-flight shaping.
    pub fn clear_logo(&mut self) -> bool {
        self.seq.invalidate(Slot::Logo);
        self.logo.clear()
    }

    /// Start an upload for a file-backed kind.
    pub fn begin_upload(&mut self, kind: ContentKind) -> QrCraftResult<Ticket> {
        if kind.folder().is_none() {
            return Err(QrCraftError::validation(format!(
                "content kind '{kind}' is not file-backed"
            )));
        }
        Ok(self.seq.issue(Slot::Payload(kind)))
    }

    /// Commit an upload result. Stale tickets are discarded and `false` is returned.
    pub fn commit_payload(&mut self, ticket: Ticket, url: impl Into<String>) -> bool {
        let Slot::Payload(kind) = ticket.slot() else {
            return false;
        };
        if !self.seq.is_latest(ticket) {
            tracing::warn!(%kind, seq = ticket.seq(), "discarding stale upload result");
            return false;
        }
        self.content.set_payload(kind, url.into())
    }

    /// Commit a shaped logo. Stale tickets are discarded and `false` is returned.
    pub fn commit_logo(&mut self, ticket: Ticket, shaped: ShapedLogo) -> bool {
        if ticket.slot() != Slot::Logo || !self.seq.is_latest(ticket) {
            tracing::warn!(seq = ticket.seq(), "discarding stale logo result");
            return false;
        }
        self.logo.commit_processed(shaped);
        true
    }

    /// Record a failed shaping job. The previous processed image and its shape, if any, are kept.
    pub fn fail_logo(&mut self, ticket: Ticket) -> bool {
        if ticket.slot() != Slot::Logo || !self.seq.is_latest(ticket) {
            return false;
        }
        self.logo.fail_processing();
        true
    }

    /// Whether `ticket` would still be accepted by a commit.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.seq.is_latest(ticket)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/composition.rs"]
mod tests;
