use kurbo::Shape as _;

use crate::foundation::core::{BezPath, Canvas, Circle, Point, Rect};
use crate::foundation::error::{QrCraftError, QrCraftResult};
use crate::state::logo::LogoShape;

/// Base logo canvas edge `S`, matching the QR render size.
pub const DEFAULT_BASE_SIZE: u32 = 300;
/// Width-to-height ratio of the rectangle logo canvas.
pub const RECTANGLE_ASPECT: f64 = 1.4;

/// Output canvas for a shape: `1.4 S x S` for rectangles, `S x S` otherwise.
pub fn logo_canvas(shape: LogoShape, base: u32) -> QrCraftResult<Canvas> {
    let width = match shape {
        LogoShape::Rectangle => (f64::from(base) * RECTANGLE_ASPECT).round() as u32,
        LogoShape::Square | LogoShape::Circle => base,
    };
    Canvas::new(width, base)
}

/// Region of the logo canvas that stays visible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipRegion {
    /// Axis-aligned rectangle.
    Bounds(Rect),
    /// Disc.
    Disc(Circle),
}

/// Clip for `shape` on `canvas`. The disc radius is derived from the base size `S`.
pub fn clip_region(shape: LogoShape, canvas: Canvas, base: u32) -> ClipRegion {
    match shape {
        LogoShape::Circle => ClipRegion::Disc(Circle::new(canvas.center(), f64::from(base) / 2.0)),
        LogoShape::Square | LogoShape::Rectangle => ClipRegion::Bounds(canvas.bounds()),
    }
}

impl ClipRegion {
    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Bounds(r) => *r,
            Self::Disc(c) => c.bounding_box(),
        }
    }

    /// Outline as a path.
    pub fn to_path(&self) -> BezPath {
        match self {
            Self::Bounds(r) => r.to_path(0.1),
            Self::Disc(c) => c.to_path(0.1),
        }
    }

    /// Whether `p` lies inside the region.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Bounds(r) => r.contains(p),
            Self::Disc(c) => c.contains(p),
        }
    }

    /// Whether the region leaves every pixel of `canvas` visible.
    pub fn covers(&self, canvas: Canvas) -> bool {
        match self {
            Self::Bounds(r) => {
                let b = canvas.bounds();
                r.x0 <= b.x0 && r.y0 <= b.y0 && r.x1 >= b.x1 && r.y1 >= b.y1
            }
            Self::Disc(_) => false,
        }
    }
}

/// How the source image is mapped into the clipped canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoFit {
    /// Scale to fill the whole canvas, ignoring the source aspect ratio.
    #[default]
    Stretch,
    /// Keep the source aspect ratio and letterbox it inside the clip region.
    Contain,
}

impl std::str::FromStr for LogoFit {
    type Err = QrCraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stretch" => Ok(Self::Stretch),
            "contain" => Ok(Self::Contain),
            other => Err(QrCraftError::validation(format!(
                "unknown logo fit \"{other}\" (expected stretch or contain)"
            ))),
        }
    }
}

/// Destination rectangle of a `src_w x src_h` source on the logo canvas.
pub fn image_placement(
    fit: LogoFit,
    src_w: f64,
    src_h: f64,
    canvas: Canvas,
    clip: ClipRegion,
) -> Rect {
    if fit == LogoFit::Stretch || src_w <= 0.0 || src_h <= 0.0 {
        return canvas.bounds();
    }

    let aspect = src_w / src_h;
    let (w, h) = match clip {
        ClipRegion::Bounds(r) => {
            let scale = (r.width() / src_w).min(r.height() / src_h);
            (src_w * scale, src_h * scale)
        }
        // Largest rectangle of this aspect inscribed in the disc.
        ClipRegion::Disc(c) => {
            let diag = (1.0 + aspect * aspect).sqrt();
            (2.0 * c.radius * aspect / diag, 2.0 * c.radius / diag)
        }
    };
    Rect::from_center_size(clip.bounds().center(), (w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/logo/geometry.rs"]
mod tests;
