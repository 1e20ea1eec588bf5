use std::io::Cursor;

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::foundation::error::{QrCraftError, QrCraftResult};

/// Output raster container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossless PNG with alpha.
    Png,
    /// Baseline JPEG; alpha is dropped.
    Jpeg,
}

impl ExportFormat {
    /// Canonical file extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = QrCraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(QrCraftError::validation(format!(
                "unsupported export format \"{other}\" (expected png or jpeg)"
            ))),
        }
    }
}

/// Encode premultiplied RGBA8 pixels into `format`.
pub(crate) fn encode_premul_rgba8(
    premul: &[u8],
    width: u32,
    height: u32,
    format: ExportFormat,
) -> QrCraftResult<Vec<u8>> {
    let mut straight = premul.to_vec();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| QrCraftError::image_decode("pixel buffer does not match dimensions"))?;

    let dyn_img = match format {
        ExportFormat::Png => image::DynamicImage::ImageRgba8(img),
        ExportFormat::Jpeg => image::DynamicImage::ImageRgb8(
            image::DynamicImage::ImageRgba8(img).to_rgb8(),
        ),
    };
    let image_format = match format {
        ExportFormat::Png => image::ImageFormat::Png,
        ExportFormat::Jpeg => image::ImageFormat::Jpeg,
    };

    let mut buf = Vec::new();
    dyn_img
        .write_to(&mut Cursor::new(&mut buf), image_format)
        .map_err(|e| QrCraftError::image_decode(format!("encode {}: {e}", format.extension())))?;
    Ok(buf)
}
