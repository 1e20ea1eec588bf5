use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::assets::encode::{ExportFormat, encode_premul_rgba8};
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::deadline::run_with_timeout;
use crate::foundation::error::QrCraftResult;
use crate::logo::geometry::{
    ClipRegion, DEFAULT_BASE_SIZE, LogoFit, clip_region, image_placement, logo_canvas,
};
use crate::render::raster::{
    affine_to_cpu, bezpath_to_cpu, image_paint, mask_apply_alpha_in_place,
    pixmap_from_premul_bytes,
};
use crate::state::logo::LogoShape;

/// Logo shaper parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShapeOptions {
    /// Base canvas edge `S`.
    pub base_size: u32,
    /// Source-to-canvas mapping.
    pub fit: LogoFit,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            base_size: DEFAULT_BASE_SIZE,
            fit: LogoFit::Stretch,
        }
    }
}

/// A logo clipped to its shape and encoded as PNG, ready for center overlay.
#[derive(Clone, PartialEq, Eq)]
pub struct ShapedLogo {
    shape: LogoShape,
    width: u32,
    height: u32,
    png: Arc<[u8]>,
}

impl std::fmt::Debug for ShapedLogo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedLogo")
            .field("shape", &self.shape)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}

impl ShapedLogo {
    pub(crate) fn from_png(shape: LogoShape, width: u32, height: u32, png: Vec<u8>) -> Self {
        Self {
            shape,
            width,
            height,
            png: png.into(),
        }
    }

    /// Shape the logo was clipped to.
    pub fn shape(&self) -> LogoShape {
        self.shape
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded PNG bytes.
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub(crate) fn png_shared(&self) -> &Arc<[u8]> {
        &self.png
    }

    /// `data:image/png;base64,...` form of the PNG.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }
}

impl serde::Serialize for ShapedLogo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_data_url())
    }
}

/// Decode `bytes`, draw them onto the shape's canvas and clip to the shape outline.
///
/// Pure: every call owns its own raster context, so concurrent calls never share a canvas.
#[tracing::instrument(skip(bytes, opts), fields(len = bytes.len(), shape = shape.as_str()))]
pub fn shape_logo(bytes: &[u8], shape: LogoShape, opts: &ShapeOptions) -> QrCraftResult<ShapedLogo> {
    let src = decode_image(bytes)?;
    let canvas = logo_canvas(shape, opts.base_size)?;
    let clip = clip_region(shape, canvas, opts.base_size);
    let dest = image_placement(
        opts.fit,
        f64::from(src.width),
        f64::from(src.height),
        canvas,
        clip,
    );

    let premul = rasterize(&src, canvas, clip, dest)?;
    let png = encode_premul_rgba8(&premul, canvas.width, canvas.height, ExportFormat::Png)?;
    tracing::debug!(width = canvas.width, height = canvas.height, "logo shaped");
    Ok(ShapedLogo::from_png(shape, canvas.width, canvas.height, png))
}

/// [`shape_logo`] on a worker thread, failing with a timeout error instead of hanging.
pub fn shape_logo_bounded(
    raw: Arc<[u8]>,
    shape: LogoShape,
    opts: ShapeOptions,
    timeout: Duration,
) -> QrCraftResult<ShapedLogo> {
    run_with_timeout("logo shaping", timeout, move || {
        shape_logo(&raw, shape, &opts)
    })
}

fn rasterize(
    src: &PreparedImage,
    canvas: Canvas,
    clip: ClipRegion,
    dest: Rect,
) -> QrCraftResult<Vec<u8>> {
    let (w, h) = canvas.as_u16()?;
    let paint = image_paint(Arc::new(pixmap_from_premul_bytes(
        &src.rgba8_premul,
        src.width,
        src.height,
    )?));

    let src_w = f64::from(src.width);
    let src_h = f64::from(src.height);
    let place = Affine::translate((dest.x0, dest.y0))
        * Affine::scale_non_uniform(dest.width() / src_w, dest.height() / src_h);

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    let mut content = vello_cpu::Pixmap::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(place));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, src_w, src_h));
    ctx.flush();
    ctx.render_to_pixmap(&mut content);

    let mut out = content.data_as_u8_slice().to_vec();
    if clip.covers(canvas) {
        return Ok(out);
    }

    ctx.reset();
    let mut mask = vello_cpu::Pixmap::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    ctx.fill_path(&bezpath_to_cpu(&clip.to_path()));
    ctx.flush();
    ctx.render_to_pixmap(&mut mask);

    mask_apply_alpha_in_place(&mut out, mask.data_as_u8_slice());
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/logo/shaper.rs"]
mod tests;
