use crate::logo::shaper::ShapedLogo;
use crate::state::style::{DotStyle, EyeStyle};

/// Gap in pixels kept clear of modules around the logo overlay.
pub const IMAGE_MARGIN: u32 = 6;

/// Complete configuration snapshot handed to a [`crate::QrRenderer`] on every state change.
///
/// Built fresh each time and never patched in place.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// String to encode; empty renders a degenerate symbol.
    pub data: String,
    /// Processed logo overlay, if any. Serialized as a PNG data URL.
    pub image: Option<ShapedLogo>,
    /// Module color.
    pub foreground_color: String,
    /// Background color.
    pub background_color: String,
    /// Data module shape.
    pub dot_style: DotStyle,
    /// Finder pattern shape.
    pub eye_style: EyeStyle,
    /// Clear gap around the logo, in pixels.
    pub image_margin: u32,
    /// Logo width as a fraction of the symbol.
    pub image_size_ratio: f64,
}
