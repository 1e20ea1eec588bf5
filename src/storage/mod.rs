//! Remote object storage capability.
//!
//! Uploads land under a logical folder and resolve to a public URL that is then encoded into the
//! QR symbol.

pub(crate) mod fs;
pub(crate) mod memory;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng as _;

use crate::foundation::error::{QrCraftError, QrCraftResult};

/// Logical folder an upload is stored under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKey {
    /// Raster images.
    Images,
    /// Audio clips.
    Audio,
    /// Video clips.
    Videos,
    /// PDF documents.
    Pdfs,
}

impl FolderKey {
    /// Folder name used as the object key prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Audio => "audio",
            Self::Videos => "videos",
            Self::Pdfs => "pdfs",
        }
    }
}

impl std::fmt::Display for FolderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-selected file headed for the object store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    /// Original file name; only its extension is kept in the stored key.
    pub name: String,
    /// File contents.
    pub bytes: Arc<[u8]>,
}

impl UploadFile {
    /// Wrap a named blob.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping its file name.
    pub fn from_path(path: &std::path::Path) -> QrCraftResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            QrCraftError::upload(format!("failed to read '{}': {e}", path.display()))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    /// Lowercased extension from the file name, or `bin` when there is none.
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "bin".to_owned())
    }

    /// Reject blobs that cannot be meaningful uploads.
    pub(crate) fn validate(&self) -> QrCraftResult<()> {
        if self.bytes.is_empty() {
            return Err(QrCraftError::upload(format!(
                "refusing to upload empty file '{}'",
                self.name
            )));
        }
        Ok(())
    }
}

/// Object storage that turns a blob into a publicly resolvable URL.
///
/// Implementations must be safe to call from worker threads; uploads run bounded by a timeout
/// off the caller's thread.
pub trait ObjectStore: Send + Sync {
    /// Store `file` under `folder` and return its public URL.
    fn store(&self, file: &UploadFile, folder: FolderKey) -> QrCraftResult<String>;
}

/// Build a collision-resistant object key: `<folder>/<unix millis>-<random hex>.<ext>`.
pub fn object_key(folder: FolderKey, extension: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix: u64 = rand::thread_rng().r#gen();
    format!("{folder}/{millis}-{suffix:016x}.{extension}")
}

pub(crate) fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

#[cfg(test)]
#[path = "../../tests/unit/storage/mod.rs"]
mod tests;
