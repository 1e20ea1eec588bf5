use crate::foundation::error::{QrCraftError, QrCraftResult};

pub use kurbo::{Affine, BezPath, Circle, Point, Rect};

/// Largest edge accepted for any raster surface. Raster backends address pixels with `u16`.
pub const MAX_SURFACE_EDGE: u32 = 8192;

/// Raster canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with both edges in `1..=MAX_SURFACE_EDGE`.
    pub fn new(width: u32, height: u32) -> QrCraftResult<Self> {
        if width == 0 || height == 0 {
            return Err(QrCraftError::validation("canvas edges must be > 0"));
        }
        if width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE {
            return Err(QrCraftError::validation(format!(
                "canvas edges must be <= {MAX_SURFACE_EDGE}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Full-canvas rectangle in pixel space.
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Canvas center point.
    pub fn center(self) -> Point {
        self.bounds().center()
    }

    /// Edge lengths as `u16`, the addressing width of `vello_cpu` surfaces.
    pub(crate) fn as_u16(self) -> QrCraftResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| QrCraftError::validation("canvas width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| QrCraftError::validation("canvas height exceeds u16"))?;
        Ok((w, h))
    }

    /// Byte length of a tightly packed RGBA8 buffer for this canvas.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
