use crate::foundation::color::Rgba8;
use crate::foundation::error::{QrCraftError, QrCraftResult};

/// Shape used for data modules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotStyle {
    /// Squares whose outer corners round off where no neighbor continues the run.
    #[default]
    Rounded,
    /// Circles.
    Dots,
    /// Squares with a rounded top-left / bottom-right at run ends.
    Classy,
    /// Plain squares.
    Square,
}

impl DotStyle {
    /// Every dot style, in selector order.
    pub const ALL: [DotStyle; 4] = [Self::Rounded, Self::Dots, Self::Classy, Self::Square];

    /// Wire name (`rounded`, `dots`, `classy`, `square`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rounded => "rounded",
            Self::Dots => "dots",
            Self::Classy => "classy",
            Self::Square => "square",
        }
    }
}

impl std::str::FromStr for DotStyle {
    type Err = QrCraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| QrCraftError::invalid_style("dotStyle", s))
    }
}

/// Shape used for the three finder "eyes".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EyeStyle {
    /// Moderately rounded corners.
    #[default]
    Rounded,
    /// Sharp corners.
    Square,
    /// Strongly rounded corners.
    ExtraRounded,
}

impl EyeStyle {
    /// Every eye style, in selector order.
    pub const ALL: [EyeStyle; 3] = [Self::Rounded, Self::Square, Self::ExtraRounded];

    /// Wire name (`rounded`, `square`, `extra-rounded`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rounded => "rounded",
            Self::Square => "square",
            Self::ExtraRounded => "extra-rounded",
        }
    }
}

impl std::str::FromStr for EyeStyle {
    type Err = QrCraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| QrCraftError::invalid_style("eyeStyle", s))
    }
}

/// Visual parameters handed to the renderer as-is.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleSpec {
    /// Module color.
    pub foreground_color: String,
    /// Background color.
    pub background_color: String,
    /// Data module shape.
    pub dot_style: DotStyle,
    /// Finder pattern shape.
    pub eye_style: EyeStyle,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            foreground_color: "#000000".to_owned(),
            background_color: "#ffffff".to_owned(),
            dot_style: DotStyle::Rounded,
            eye_style: EyeStyle::Rounded,
        }
    }
}

impl StyleSpec {
    /// Validate `patch` completely, then return `self` with the patch applied.
    ///
    /// Nothing is applied when any field is rejected.
    pub fn merged(&self, patch: &StylePatch) -> QrCraftResult<StyleSpec> {
        let foreground_color = patch
            .foreground_color
            .as_deref()
            .map(|c| checked_color("foregroundColor", c))
            .transpose()?;
        let background_color = patch
            .background_color
            .as_deref()
            .map(|c| checked_color("backgroundColor", c))
            .transpose()?;
        let dot_style = patch
            .dot_style
            .as_deref()
            .map(str::parse::<DotStyle>)
            .transpose()?;
        let eye_style = patch
            .eye_style
            .as_deref()
            .map(str::parse::<EyeStyle>)
            .transpose()?;

        Ok(StyleSpec {
            foreground_color: foreground_color.unwrap_or_else(|| self.foreground_color.clone()),
            background_color: background_color.unwrap_or_else(|| self.background_color.clone()),
            dot_style: dot_style.unwrap_or(self.dot_style),
            eye_style: eye_style.unwrap_or(self.eye_style),
        })
    }

    /// Check that both colors parse.
    pub fn validate(&self) -> QrCraftResult<()> {
        checked_color("foregroundColor", &self.foreground_color)?;
        checked_color("backgroundColor", &self.background_color)?;
        Ok(())
    }
}

fn checked_color(field: &'static str, raw: &str) -> QrCraftResult<String> {
    Rgba8::parse(raw).map_err(|_| QrCraftError::invalid_style(field, raw))?;
    Ok(raw.trim().to_owned())
}

/// Partial style update with raw, not-yet-validated values, as they arrive from a form.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylePatch {
    /// New module color.
    pub foreground_color: Option<String>,
    /// New background color.
    pub background_color: Option<String>,
    /// New dot style wire name.
    pub dot_style: Option<String>,
    /// New eye style wire name.
    pub eye_style: Option<String>,
}

impl StylePatch {
    /// Set the module color.
    pub fn foreground(mut self, color: impl Into<String>) -> Self {
        self.foreground_color = Some(color.into());
        self
    }

    /// Set the background color.
    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Set the dot style from its typed value.
    pub fn dots(mut self, style: DotStyle) -> Self {
        self.dot_style = Some(style.as_str().to_owned());
        self
    }

    /// Set the eye style from its typed value.
    pub fn eyes(mut self, style: EyeStyle) -> Self {
        self.eye_style = Some(style.as_str().to_owned());
        self
    }

    /// Whether the patch touches no field.
    pub fn is_empty(&self) -> bool {
        self.foreground_color.is_none()
            && self.background_color.is_none()
            && self.dot_style.is_none()
            && self.eye_style.is_none()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/style.rs"]
mod tests;
