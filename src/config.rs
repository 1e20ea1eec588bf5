use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::foundation::core::MAX_SURFACE_EDGE;
use crate::foundation::error::{QrCraftError, QrCraftResult};
use crate::logo::geometry::LogoFit;
use crate::logo::shaper::ShapeOptions;
use crate::render::cpu::{CpuRendererOpts, ErrorCorrection};
use crate::state::logo::{DEFAULT_LOGO_SIZE, clamp_logo_size};
use crate::state::style::StyleSpec;

/// Text payload a fresh editor starts with.
pub const DEFAULT_TEXT: &str = "https://google.com";

/// Editor session configuration.
///
/// Loaded from JSON (every field optional), then optionally overridden from `QRCRAFT_*`
/// environment variables.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Rendered symbol edge in pixels.
    pub qr_size: u32,
    /// Encoder error correction level.
    pub error_correction: ErrorCorrection,
    /// Upper bound for a single upload.
    pub upload_timeout_ms: u64,
    /// Upper bound for decoding and shaping a logo.
    pub decode_timeout_ms: u64,
    /// How the logo source maps onto the shape canvas.
    pub logo_fit: LogoFit,
    /// Style the editor starts with.
    pub style: StyleSpec,
    /// Logo size ratio the editor starts with; clamped on use.
    pub logo_size: f64,
    /// Text payload the editor starts with.
    pub text: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            qr_size: 300,
            error_correction: ErrorCorrection::H,
            upload_timeout_ms: 30_000,
            decode_timeout_ms: 5_000,
            logo_fit: LogoFit::Stretch,
            style: StyleSpec::default(),
            logo_size: DEFAULT_LOGO_SIZE,
            text: DEFAULT_TEXT.to_owned(),
        }
    }
}

impl EditorConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> QrCraftResult<Self> {
        serde_json::from_reader(r).map_err(|e| QrCraftError::serde(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> QrCraftResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            QrCraftError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Apply `QRCRAFT_QR_SIZE`, `QRCRAFT_UPLOAD_TIMEOUT_MS` and `QRCRAFT_DECODE_TIMEOUT_MS`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = env_number::<u32>(&lookup, "QRCRAFT_QR_SIZE") {
            self.qr_size = v;
        }
        if let Some(v) = env_number::<u64>(&lookup, "QRCRAFT_UPLOAD_TIMEOUT_MS") {
            self.upload_timeout_ms = v;
        }
        if let Some(v) = env_number::<u64>(&lookup, "QRCRAFT_DECODE_TIMEOUT_MS") {
            self.decode_timeout_ms = v;
        }
        self
    }

    /// Reject values no session can run with.
    pub fn validate(&self) -> QrCraftResult<()> {
        if self.qr_size == 0 || self.qr_size > MAX_SURFACE_EDGE {
            return Err(QrCraftError::validation(format!(
                "qr_size must be in 1..={MAX_SURFACE_EDGE}, got {}",
                self.qr_size
            )));
        }
        if self.upload_timeout_ms == 0 {
            return Err(QrCraftError::validation("upload_timeout_ms must be > 0"));
        }
        if self.decode_timeout_ms == 0 {
            return Err(QrCraftError::validation("decode_timeout_ms must be > 0"));
        }
        self.style.validate()
    }

    /// Upload bound as a [`Duration`].
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_millis(self.upload_timeout_ms)
    }

    /// Logo decode bound as a [`Duration`].
    pub fn decode_timeout(&self) -> Duration {
        Duration::from_millis(self.decode_timeout_ms)
    }

    /// Initial logo size, clamped into range.
    pub fn initial_logo_size(&self) -> f64 {
        clamp_logo_size(self.logo_size)
    }

    /// Options for the logo shaper. The logo base size follows the symbol size.
    pub fn shape_options(&self) -> ShapeOptions {
        ShapeOptions {
            base_size: self.qr_size,
            fit: self.logo_fit,
        }
    }

    /// Options for [`crate::CpuQrRenderer`].
    pub fn renderer_options(&self) -> CpuRendererOpts {
        CpuRendererOpts {
            size: self.qr_size,
            error_correction: self.error_correction,
        }
    }
}

fn env_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
