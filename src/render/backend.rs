use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::encode::ExportFormat;
use crate::foundation::error::QrCraftResult;
use crate::render::request::RenderRequest;

/// An encoded export of the current rendered symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    /// Suggested file name, extension included.
    pub file_name: String,
    /// Container format of `bytes`.
    pub format: ExportFormat,
    /// Encoded image.
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    /// Write the image into `dir` under [`ExportedImage::file_name`].
    pub fn write_to_dir(&self, dir: &Path) -> QrCraftResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write {} '{}'", self.format.extension(), path.display()))?;
        Ok(path)
    }
}

/// A live QR render target.
///
/// The caller owns the handle for its whole lifecycle: create, `configure` any number of times,
/// then drop (or call an implementation's explicit dispose).
pub trait QrRenderer {
    /// Replace the full configuration and redraw. Called on every state change.
    fn configure(&mut self, request: &RenderRequest) -> QrCraftResult<()>;

    /// Encode the most recently drawn symbol.
    fn export(&self, format: ExportFormat, filename_hint: &str) -> QrCraftResult<ExportedImage>;
}

impl<R: QrRenderer + ?Sized> QrRenderer for Box<R> {
    fn configure(&mut self, request: &RenderRequest) -> QrCraftResult<()> {
        (**self).configure(request)
    }

    fn export(&self, format: ExportFormat, filename_hint: &str) -> QrCraftResult<ExportedImage> {
        (**self).export(format, filename_hint)
    }
}

/// Turn a user-supplied hint into a safe file name with the format's extension.
pub fn export_file_name(hint: &str, format: ExportFormat) -> String {
    let stem = Path::new(hint.trim())
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let mut clean: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if clean.trim_matches('_').is_empty() {
        clean = "qr".to_owned();
    }
    format!("{clean}.{}", format.extension())
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
