use std::sync::Arc;

use crate::foundation::error::QrCraftError;
use crate::logo::shaper::ShapedLogo;
use crate::state::sequence::Ticket;

/// Smallest logo width as a fraction of the QR canvas.
pub const MIN_LOGO_SIZE: f64 = 0.15;
/// Largest logo width as a fraction of the QR canvas.
pub const MAX_LOGO_SIZE: f64 = 0.5;
/// Logo size used until the user moves the slider.
pub const DEFAULT_LOGO_SIZE: f64 = 0.3;

/// Outline the logo is clipped to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoShape {
    /// `S x S` canvas.
    #[default]
    Square,
    /// `1.4 S x S` canvas.
    Rectangle,
    /// `S x S` canvas clipped to a disc of radius `S / 2`.
    Circle,
}

impl LogoShape {
    /// Every shape, in selector order.
    pub const ALL: [LogoShape; 3] = [Self::Square, Self::Rectangle, Self::Circle];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
        }
    }
}

impl std::str::FromStr for LogoShape {
    type Err = QrCraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| QrCraftError::invalid_style("logoShape", s))
    }
}

/// Clamp a requested logo size into `[MIN_LOGO_SIZE, MAX_LOGO_SIZE]`.
///
/// NaN maps to the minimum.
pub fn clamp_logo_size(ratio: f64) -> f64 {
    if ratio.is_nan() {
        return MIN_LOGO_SIZE;
    }
    ratio.clamp(MIN_LOGO_SIZE, MAX_LOGO_SIZE)
}

/// Lifecycle of the logo slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogoPhase {
    /// No raw image.
    Empty,
    /// A shaping job for the current raw image and shape is outstanding.
    Decoding,
    /// The processed image matches the current raw image and shape.
    Shaped,
}

/// Work order for the logo shaper.
#[derive(Clone, Debug)]
pub struct LogoJob {
    /// Ticket to commit the result with.
    pub ticket: Ticket,
    /// Raw bytes as uploaded.
    pub raw: Arc<[u8]>,
    /// Target shape.
    pub shape: LogoShape,
}

/// Raw logo, its shape and size, and the derived processed image.
#[derive(Clone, Debug)]
pub struct LogoSpec {
    raw: Option<Arc<[u8]>>,
    shape: LogoShape,
    processed: Option<ShapedLogo>,
    size_ratio: f64,
    phase: LogoPhase,
}

impl Default for LogoSpec {
    fn default() -> Self {
        Self {
            raw: None,
            shape: LogoShape::Square,
            processed: None,
            size_ratio: DEFAULT_LOGO_SIZE,
            phase: LogoPhase::Empty,
        }
    }
}

impl LogoSpec {
    /// Original uploaded bytes, kept across shape changes.
    pub fn raw_image(&self) -> Option<&Arc<[u8]>> {
        self.raw.as_ref()
    }

    /// Current shape.
    pub fn shape(&self) -> LogoShape {
        self.shape
    }

    /// Cached clipped PNG; `None` until shaping completes.
    pub fn processed_image(&self) -> Option<&ShapedLogo> {
        self.processed.as_ref()
    }

    /// Logo width as a fraction of the QR canvas.
    pub fn size_ratio(&self) -> f64 {
        self.size_ratio
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> LogoPhase {
        self.phase
    }

    pub(crate) fn replace_raw(&mut self, raw: Arc<[u8]>) {
        self.raw = Some(raw);
        self.processed = None;
        self.phase = LogoPhase::Decoding;
    }

    /// Returns the raw bytes to re-shape, if any.
    pub(crate) fn set_shape(&mut self, shape: LogoShape) -> Option<Arc<[u8]>> {
        self.shape = shape;
        let raw = self.raw.clone()?;
        self.phase = LogoPhase::Decoding;
        Some(raw)
    }

    pub(crate) fn set_size_ratio(&mut self, ratio: f64) -> f64 {
        self.size_ratio = clamp_logo_size(ratio);
        self.size_ratio
    }

    pub(crate) fn commit_processed(&mut self, shaped: ShapedLogo) {
        self.processed = Some(shaped);
        self.phase = LogoPhase::Shaped;
    }

    /// The previous processed image, if any, stays in place along with its shape.
    pub(crate) fn fail_processing(&mut self) {
        if let Some(processed) = &self.processed {
            self.shape = processed.shape();
            self.phase = LogoPhase::Shaped;
        } else {
            self.raw = None;
            self.phase = LogoPhase::Empty;
        }
    }

    pub(crate) fn clear(&mut self) -> bool {
        let had = self.raw.is_some() || self.processed.is_some();
        self.raw = None;
        self.processed = None;
        self.phase = LogoPhase::Empty;
        had
    }
}
