use std::collections::BTreeMap;

use crate::foundation::error::QrCraftError;
use crate::storage::FolderKey;

/// Semantic category of the data encoded into the symbol.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Literal text or URL typed by the user.
    #[default]
    Text,
    /// URL of an uploaded image.
    Image,
    /// URL of an uploaded audio clip.
    Audio,
    /// URL of an uploaded video.
    Video,
    /// URL of an uploaded PDF document.
    Document,
}

impl ContentKind {
    /// Every kind, in selector order.
    pub const ALL: [ContentKind; 5] = [
        Self::Text,
        Self::Image,
        Self::Audio,
        Self::Video,
        Self::Document,
    ];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Document => "document",
        }
    }

    /// Storage folder for file-backed kinds; `None` for [`ContentKind::Text`].
    pub fn folder(self) -> Option<FolderKey> {
        match self {
            Self::Text => None,
            Self::Image => Some(FolderKey::Images),
            Self::Audio => Some(FolderKey::Audio),
            Self::Video => Some(FolderKey::Videos),
            Self::Document => Some(FolderKey::Pdfs),
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = QrCraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QrCraftError::validation(format!("unknown content kind \"{s}\"")))
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active content kind plus the last resolved payload of every kind.
///
/// Switching kinds never drops a payload, so returning to a kind restores what was uploaded
/// before without another upload.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContentSelection {
    kind: ContentKind,
    #[serde(default)]
    payloads: BTreeMap<ContentKind, String>,
}

impl ContentSelection {
    /// Selection with `kind` active and no payloads.
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            payloads: BTreeMap::new(),
        }
    }

    /// Currently active kind.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Payload stored for `kind`, or `""` when nothing was resolved yet.
    pub fn payload(&self, kind: ContentKind) -> &str {
        self.payloads.get(&kind).map(String::as_str).unwrap_or("")
    }

    /// Payload of the active kind; this is what gets encoded.
    pub fn active_payload(&self) -> &str {
        self.payload(self.kind)
    }

    /// Returns `true` if the active kind changed.
    pub(crate) fn set_kind(&mut self, kind: ContentKind) -> bool {
        std::mem::replace(&mut self.kind, kind) != kind
    }

    /// Empty values are ignored so an error path can never clobber a slot.
    pub(crate) fn set_payload(&mut self, kind: ContentKind, value: String) -> bool {
        if value.is_empty() {
            return false;
        }
        if self.payloads.get(&kind) == Some(&value) {
            return false;
        }
        self.payloads.insert(kind, value);
        true
    }

    pub(crate) fn clear_payload(&mut self, kind: ContentKind) -> bool {
        self.payloads.remove(&kind).is_some()
    }
}
