use std::sync::Arc;

use crate::foundation::core::MAX_SURFACE_EDGE;
use crate::foundation::error::{QrCraftError, QrCraftResult};

/// Decoded raster in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub(crate) struct PreparedImage {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Row-major premultiplied RGBA8.
    pub(crate) rgba8_premul: Arc<Vec<u8>>,
}

/// Largest source edge kept before drawing; bigger sources are downsampled first.
const MAX_SOURCE_EDGE: u32 = 4096;

/// Decode any raster format `image` understands into premultiplied RGBA8.
pub(crate) fn decode_image(bytes: &[u8]) -> QrCraftResult<PreparedImage> {
    if bytes.is_empty() {
        return Err(QrCraftError::image_decode("image bytes are empty"));
    }
    let mut dyn_img = image::load_from_memory(bytes)
        .map_err(|e| QrCraftError::image_decode(format!("decode image from memory: {e}")))?;
    if dyn_img.width() == 0 || dyn_img.height() == 0 {
        return Err(QrCraftError::image_decode("image has a zero-sized edge"));
    }
    if dyn_img.width() > MAX_SOURCE_EDGE || dyn_img.height() > MAX_SOURCE_EDGE {
        dyn_img = dyn_img.resize(
            MAX_SOURCE_EDGE,
            MAX_SOURCE_EDGE,
            image::imageops::FilterType::Triangle,
        );
    }
    debug_assert!(dyn_img.width() <= MAX_SURFACE_EDGE && dyn_img.height() <= MAX_SURFACE_EDGE);

    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
