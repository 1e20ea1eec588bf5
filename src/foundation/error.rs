use std::time::Duration;

/// Convenience result type used across qrcraft.
pub type QrCraftResult<T> = Result<T, QrCraftError>;

/// Top-level error taxonomy used by editor, shaper and renderer APIs.
#[derive(thiserror::Error, Debug)]
pub enum QrCraftError {
    /// Invalid caller-provided configuration or input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A style field received a value outside its domain.
    #[error("invalid style value for {field}: \"{value}\"")]
    InvalidStyleValue {
        /// Style field name as exposed to callers (`dotStyle`, `eyeStyle`, ...).
        field: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// Image bytes could not be decoded or re-encoded.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// The object store rejected or failed an upload.
    #[error("upload error: {0}")]
    Upload(String),

    /// A bounded operation did not finish in time.
    #[error("timeout: {operation} did not finish within {}ms", .after.as_millis())]
    Timeout {
        /// Operation label (`upload`, `logo shaping`, ...).
        operation: &'static str,
        /// The bound that was exceeded.
        after: Duration,
    },

    /// The QR renderer failed to draw or export.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QrCraftError {
    /// Build a [`QrCraftError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QrCraftError::InvalidStyleValue`] value.
    pub fn invalid_style(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidStyleValue {
            field,
            value: value.into(),
        }
    }

    /// Build a [`QrCraftError::ImageDecode`] value.
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Build a [`QrCraftError::Upload`] value.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Build a [`QrCraftError::Timeout`] value.
    pub fn timeout(operation: &'static str, after: Duration) -> Self {
        Self::Timeout { operation, after }
    }

    /// Build a [`QrCraftError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`QrCraftError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
