use std::sync::Arc;

use kurbo::{ParamCurve as _, PathSeg, RoundedRect, RoundedRectRadii, Shape as _};

use crate::assets::decode::decode_image;
use crate::assets::encode::{ExportFormat, encode_premul_rgba8};
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Affine, BezPath, Canvas, Circle, Rect};
use crate::foundation::error::{QrCraftError, QrCraftResult};
use crate::logo::shaper::ShapedLogo;
use crate::render::backend::{ExportedImage, QrRenderer, export_file_name};
use crate::render::raster::{affine_to_cpu, bezpath_to_cpu, cpu_color, image_paint, pixmap_from_premul_bytes};
use crate::render::request::RenderRequest;
use crate::state::style::{DotStyle, EyeStyle};

/// Side length of a finder pattern in modules.
const FINDER: usize = 7;

/// Error correction level requested from the symbol encoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery; leaves room for a center logo.
    #[default]
    H,
}

impl ErrorCorrection {
    fn ec_level(self) -> qrcode::EcLevel {
        match self {
            Self::L => qrcode::EcLevel::L,
            Self::M => qrcode::EcLevel::M,
            Self::Q => qrcode::EcLevel::Q,
            Self::H => qrcode::EcLevel::H,
        }
    }
}

impl std::str::FromStr for ErrorCorrection {
    type Err = QrCraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            other => Err(QrCraftError::validation(format!(
                "unknown error correction level \"{other}\" (expected L, M, Q or H)"
            ))),
        }
    }
}

/// Construction-time options of [`CpuQrRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CpuRendererOpts {
    /// Output edge length in pixels (the symbol is square).
    pub size: u32,
    /// Encoder error correction level.
    pub error_correction: ErrorCorrection,
}

impl Default for CpuRendererOpts {
    fn default() -> Self {
        Self {
            size: 300,
            error_correction: ErrorCorrection::H,
        }
    }
}

/// A rendered symbol as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// CPU QR renderer: `qrcode` supplies the module matrix, `vello_cpu` draws the styled symbol.
pub struct CpuQrRenderer {
    opts: CpuRendererOpts,
    logo_cache: Option<LogoPaint>,
    frame: Option<FrameRGBA>,
    module_count: Option<usize>,
}

#[derive(Clone)]
struct LogoPaint {
    png: Arc<[u8]>,
    pixmap: Arc<vello_cpu::Pixmap>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for CpuQrRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuQrRenderer")
            .field("opts", &self.opts)
            .field("module_count", &self.module_count)
            .field("has_frame", &self.frame.is_some())
            .finish()
    }
}

impl CpuQrRenderer {
    /// Create a render target. Nothing is drawn until the first `configure`.
    pub fn new(opts: CpuRendererOpts) -> QrCraftResult<Self> {
        Canvas::new(opts.size, opts.size)?.as_u16()?;
        Ok(Self {
            opts,
            logo_cache: None,
            frame: None,
            module_count: None,
        })
    }

    /// Options the renderer was created with.
    pub fn opts(&self) -> CpuRendererOpts {
        self.opts
    }

    /// Last drawn frame (premultiplied).
    pub fn frame(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    /// Modules per side of the last drawn symbol; `None` for a degenerate (empty) symbol.
    pub fn module_count(&self) -> Option<usize> {
        self.module_count
    }

    /// End the render target's lifecycle.
    pub fn dispose(self) {
        tracing::debug!(size = self.opts.size, "renderer disposed");
    }

    fn logo_paint_for(&mut self, logo: &ShapedLogo) -> QrCraftResult<LogoPaint> {
        if let Some(cached) = &self.logo_cache
            && Arc::ptr_eq(&cached.png, logo.png_shared())
        {
            return Ok(cached.clone());
        }
        let prepared = decode_image(logo.png_bytes())?;
        let pixmap =
            pixmap_from_premul_bytes(&prepared.rgba8_premul, prepared.width, prepared.height)?;
        let out = LogoPaint {
            png: logo.png_shared().clone(),
            pixmap: Arc::new(pixmap),
            width: prepared.width,
            height: prepared.height,
        };
        self.logo_cache = Some(out.clone());
        Ok(out)
    }
}

impl QrRenderer for CpuQrRenderer {
    #[tracing::instrument(skip_all, fields(data_len = request.data.len(), has_logo = request.image.is_some()))]
    fn configure(&mut self, request: &RenderRequest) -> QrCraftResult<()> {
        let fg = Rgba8::parse(&request.foreground_color)
            .map_err(|e| QrCraftError::render(format!("foreground color: {e}")))?;
        let bg = Rgba8::parse(&request.background_color)
            .map_err(|e| QrCraftError::render(format!("background color: {e}")))?;
        let matrix = ModuleMatrix::encode(&request.data, self.opts.error_correction)?;
        let logo = match &request.image {
            Some(l) => Some(self.logo_paint_for(l)?),
            None => None,
        };

        let canvas = Canvas::new(self.opts.size, self.opts.size)?;
        let (w, h) = canvas.as_u16()?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if bg.a > 0 {
            ctx.set_paint(cpu_color(bg));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(self.opts.size),
                f64::from(self.opts.size),
            ));
        }

        if let Some(matrix) = &matrix {
            let layout = SymbolLayout::new(self.opts.size, matrix.width);
            let logo_box = logo.as_ref().map(|l| {
                layout.logo_box(
                    f64::from(l.width),
                    f64::from(l.height),
                    request.image_size_ratio,
                )
            });
            let hidden = logo_box.map(|b| {
                let m = f64::from(request.image_margin);
                b.inflate(m, m)
            });

            ctx.set_paint(cpu_color(fg));
            let dots = dots_path(matrix, &layout, request.dot_style, hidden);
            ctx.fill_path(&bezpath_to_cpu(&dots));
            let eyes = eyes_path(matrix, &layout, request.eye_style);
            ctx.fill_path(&bezpath_to_cpu(&eyes));

            if let (Some(l), Some(b)) = (logo, logo_box) {
                let sw = f64::from(l.width);
                let sh = f64::from(l.height);
                let place = Affine::translate((b.x0, b.y0))
                    * Affine::scale_non_uniform(b.width() / sw, b.height() / sh);
                ctx.set_transform(affine_to_cpu(place));
                ctx.set_paint(image_paint(l.pixmap));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, sw, sh));
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        self.module_count = matrix.as_ref().map(|m| m.width);
        self.frame = Some(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        });
        Ok(())
    }

    fn export(&self, format: ExportFormat, filename_hint: &str) -> QrCraftResult<ExportedImage> {
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| QrCraftError::render("nothing has been rendered yet"))?;
        let bytes = encode_premul_rgba8(&frame.data, frame.width, frame.height, format)?;
        Ok(ExportedImage {
            file_name: export_file_name(filename_hint, format),
            format,
            bytes,
        })
    }
}

/// Dark/light module grid of an encoded symbol.
pub(crate) struct ModuleMatrix {
    pub(crate) width: usize,
    dark: Vec<bool>,
}

impl ModuleMatrix {
    /// `None` for empty data: the symbol degenerates to its background.
    pub(crate) fn encode(data: &str, ec: ErrorCorrection) -> QrCraftResult<Option<Self>> {
        if data.is_empty() {
            return Ok(None);
        }
        let code = qrcode::QrCode::with_error_correction_level(data.as_bytes(), ec.ec_level())
            .map_err(|e| QrCraftError::render(format!("encode symbol: {e}")))?;
        let width = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        Ok(Some(Self { width, dark }))
    }

    pub(crate) fn is_dark(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.width {
            return false;
        }
        self.dark[y as usize * self.width + x as usize]
    }

    pub(crate) fn in_finder(&self, x: usize, y: usize) -> bool {
        let far = self.width - FINDER;
        (x < FINDER && y < FINDER) || (x >= far && y < FINDER) || (x < FINDER && y >= far)
    }

    fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.width - FINDER;
        [(0, 0), (far, 0), (0, far)]
    }
}

/// Pixel placement of modules on the square output.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SymbolLayout {
    pub(crate) size: f64,
    pub(crate) dot: f64,
    pub(crate) offset: f64,
}

impl SymbolLayout {
    pub(crate) fn new(size: u32, count: usize) -> Self {
        let size = f64::from(size);
        let n = count as f64;
        // Whole-pixel modules when they fit, so module edges land on pixel boundaries.
        let dot = if size >= n { (size / n).floor() } else { size / n };
        Self {
            size,
            dot,
            offset: (size - dot * n) / 2.0,
        }
    }

    pub(crate) fn module_rect(&self, x: usize, y: usize) -> Rect {
        let x0 = self.offset + x as f64 * self.dot;
        let y0 = self.offset + y as f64 * self.dot;
        Rect::new(x0, y0, x0 + self.dot, y0 + self.dot)
    }

    fn span_rect(&self, x: usize, y: usize, modules: usize) -> Rect {
        let a = self.module_rect(x, y);
        let b = self.module_rect(x + modules - 1, y + modules - 1);
        Rect::new(a.x0, a.y0, b.x1, b.y1)
    }

    /// Logo rectangle: its longer edge is `ratio` of the symbol extent, centered.
    pub(crate) fn logo_box(&self, logo_w: f64, logo_h: f64, ratio: f64) -> Rect {
        let extent = self.size - 2.0 * self.offset;
        let max = extent * ratio;
        let aspect = if logo_h > 0.0 { logo_w / logo_h } else { 1.0 };
        let (w, h) = if aspect >= 1.0 {
            (max, max / aspect)
        } else {
            (max * aspect, max)
        };
        Rect::from_center_size((self.size / 2.0, self.size / 2.0), (w, h))
    }
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

fn dots_path(
    matrix: &ModuleMatrix,
    layout: &SymbolLayout,
    style: DotStyle,
    hidden: Option<Rect>,
) -> BezPath {
    let drawn = |x: isize, y: isize| -> bool {
        if !matrix.is_dark(x, y) || matrix.in_finder(x as usize, y as usize) {
            return false;
        }
        match hidden {
            Some(h) => !overlaps(layout.module_rect(x as usize, y as usize), h),
            None => true,
        }
    };

    let mut path = BezPath::new();
    let r = layout.dot / 2.0;
    for y in 0..matrix.width as isize {
        for x in 0..matrix.width as isize {
            if !drawn(x, y) {
                continue;
            }
            let rect = layout.module_rect(x as usize, y as usize);
            let left = drawn(x - 1, y);
            let right = drawn(x + 1, y);
            let top = drawn(x, y - 1);
            let bottom = drawn(x, y + 1);

            let radii = match style {
                DotStyle::Square => None,
                DotStyle::Dots => {
                    path.extend(Circle::new(rect.center(), r).path_elements(0.1));
                    continue;
                }
                DotStyle::Rounded => Some(RoundedRectRadii::new(
                    if !left && !top { r } else { 0.0 },
                    if !right && !top { r } else { 0.0 },
                    if !right && !bottom { r } else { 0.0 },
                    if !left && !bottom { r } else { 0.0 },
                )),
                DotStyle::Classy => Some(RoundedRectRadii::new(
                    if !left && !top { r } else { 0.0 },
                    0.0,
                    if !right && !bottom { r } else { 0.0 },
                    0.0,
                )),
            };
            match radii {
                Some(radii) => path.extend(RoundedRect::from_rect(rect, radii).path_elements(0.1)),
                None => path.extend(rect.path_elements(0.1)),
            }
        }
    }
    path
}

/// Corner radii, in modules, of the outer ring, the ring's hole and the core.
fn eye_radii(style: EyeStyle) -> (f64, f64, f64) {
    match style {
        EyeStyle::Square => (0.0, 0.0, 0.0),
        EyeStyle::Rounded => (1.0, 0.5, 0.5),
        EyeStyle::ExtraRounded => (2.5, 1.5, 1.0),
    }
}

fn eyes_path(matrix: &ModuleMatrix, layout: &SymbolLayout, style: EyeStyle) -> BezPath {
    let (outer_r, hole_r, core_r) = eye_radii(style);
    let d = layout.dot;
    let mut path = BezPath::new();
    for (ex, ey) in matrix.finder_origins() {
        let outer = RoundedRect::from_rect(layout.span_rect(ex, ey, 7), outer_r * d);
        let hole = RoundedRect::from_rect(layout.span_rect(ex + 1, ey + 1, 5), hole_r * d);
        let core = RoundedRect::from_rect(layout.span_rect(ex + 2, ey + 2, 3), core_r * d);

        path.extend(outer.path_elements(0.1));
        // Opposite winding punches the hole under the non-zero fill rule.
        path.extend(reversed(&hole.to_path(0.1)).elements().iter().copied());
        path.extend(core.path_elements(0.1));
    }
    path
}

/// Reverse the direction of a single closed subpath.
fn reversed(path: &BezPath) -> BezPath {
    let segs: Vec<PathSeg> = path.segments().collect();
    let mut out = BezPath::new();
    let Some(last) = segs.last() else {
        return out;
    };
    out.move_to(last.end());
    for seg in segs.iter().rev() {
        match seg.reverse() {
            PathSeg::Line(l) => out.line_to(l.p1),
            PathSeg::Quad(q) => out.quad_to(q.p1, q.p2),
            PathSeg::Cubic(c) => out.curve_to(c.p1, c.p2, c.p3),
        }
    }
    out.close_path();
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
