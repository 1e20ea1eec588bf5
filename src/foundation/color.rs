use crate::foundation::error::{QrCraftError, QrCraftResult};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Parse a CSS-like color string.
    ///
    /// Accepted forms, case-insensitive:
    ///
    /// - `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
    /// - `rgb(r, g, b)` and `rgba(r, g, b, a)` with channels in `0..=255`
    /// - `hsl(h, s%, l%)` and `hsla(h, s%, l%, a)` with `h` in degrees (an optional `deg`
    ///   suffix) and `s`/`l` in `0%..=100%`
    /// - `transparent` plus the CSS basic color keywords: black, silver, gray/grey, white,
    ///   maroon, red, purple, fuchsia/magenta, green, lime, olive, yellow, navy, blue, teal,
    ///   aqua/cyan, and orange
    ///
    /// Alpha is always in `0..=1`. Other CSS color keywords and syntaxes (space-separated
    /// arguments, `hwb()`, `lab()`) are rejected.
    pub fn parse(s: &str) -> QrCraftResult<Self> {
        parse_color(s).map_err(QrCraftError::validation)
    }
}

impl std::str::FromStr for Rgba8 {
    type Err = QrCraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_color(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("color must be non-empty".to_owned());
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_fn(args);
    }
    if let Some(args) = lower
        .strip_prefix("hsla(")
        .or_else(|| lower.strip_prefix("hsl("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_hsl_fn(args);
    }
    named(&lower).ok_or_else(|| format!("unknown color \"{s}\""))
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }
    fn hex_nibble(c: &str) -> Result<u8, String> {
        let v = u8::from_str_radix(c, 16).map_err(|_| format!("invalid hex digit \"{c}\""))?;
        Ok(v * 17)
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }

    match s.len() {
        3 | 4 => {
            let r = hex_nibble(&s[0..1])?;
            let g = hex_nibble(&s[1..2])?;
            let b = hex_nibble(&s[2..3])?;
            let a = if s.len() == 4 {
                hex_nibble(&s[3..4])?
            } else {
                255
            };
            Ok(Rgba8 { r, g, b, a })
        }
        6 | 8 => {
            let r = hex_byte(&s[0..2])?;
            let g = hex_byte(&s[2..4])?;
            let b = hex_byte(&s[4..6])?;
            let a = if s.len() == 8 {
                hex_byte(&s[6..8])?
            } else {
                255
            };
            Ok(Rgba8 { r, g, b, a })
        }
        _ => Err("hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

fn parse_rgb_fn(args: &str) -> Result<Rgba8, String> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err("rgb()/rgba() takes 3 or 4 components".to_owned());
    }

    let channel = |p: &str| -> Result<u8, String> {
        let v: f64 = p
            .parse()
            .map_err(|_| format!("invalid color component \"{p}\""))?;
        if !(0.0..=255.0).contains(&v) {
            return Err(format!("color component out of range: {v}"));
        }
        Ok(v.round() as u8)
    };

    Ok(Rgba8 {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: parse_alpha(parts.get(3).copied())?,
    })
}

fn parse_alpha(part: Option<&str>) -> Result<u8, String> {
    let Some(p) = part else {
        return Ok(255);
    };
    let v: f64 = p.parse().map_err(|_| format!("invalid alpha \"{p}\""))?;
    if !(0.0..=1.0).contains(&v) {
        return Err(format!("alpha out of range: {v}"));
    }
    Ok((v * 255.0).round() as u8)
}

fn parse_hsl_fn(args: &str) -> Result<Rgba8, String> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err("hsl()/hsla() takes 3 or 4 components".to_owned());
    }

    let hue_str = parts[0].strip_suffix("deg").unwrap_or(parts[0]).trim();
    let hue: f64 = hue_str
        .parse()
        .map_err(|_| format!("invalid hue \"{}\"", parts[0]))?;
    if !hue.is_finite() {
        return Err(format!("invalid hue \"{}\"", parts[0]));
    }

    let percent = |p: &str| -> Result<f64, String> {
        let digits = p
            .strip_suffix('%')
            .ok_or_else(|| format!("saturation and lightness need a %: \"{p}\""))?;
        let v: f64 = digits
            .trim()
            .parse()
            .map_err(|_| format!("invalid percentage \"{p}\""))?;
        if !(0.0..=100.0).contains(&v) {
            return Err(format!("percentage out of range: {p}"));
        }
        Ok(v / 100.0)
    };
    let s = percent(parts[1])?;
    let l = percent(parts[2])?;
    let a = parse_alpha(parts.get(3).copied())?;

    let [r, g, b] = hsl_to_rgb(hue, s, l);
    Ok(Rgba8 { r, g, b, a })
}

/// `h` in degrees (any value, wrapped), `s` and `l` in `0..=1`.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}

fn named(name: &str) -> Option<Rgba8> {
    let c = match name {
        "transparent" => Rgba8::transparent(),
        "black" => Rgba8::rgb(0, 0, 0),
        "white" => Rgba8::rgb(255, 255, 255),
        "silver" => Rgba8::rgb(192, 192, 192),
        "gray" | "grey" => Rgba8::rgb(128, 128, 128),
        "red" => Rgba8::rgb(255, 0, 0),
        "maroon" => Rgba8::rgb(128, 0, 0),
        "orange" => Rgba8::rgb(255, 165, 0),
        "yellow" => Rgba8::rgb(255, 255, 0),
        "olive" => Rgba8::rgb(128, 128, 0),
        "lime" => Rgba8::rgb(0, 255, 0),
        "green" => Rgba8::rgb(0, 128, 0),
        "aqua" | "cyan" => Rgba8::rgb(0, 255, 255),
        "teal" => Rgba8::rgb(0, 128, 128),
        "blue" => Rgba8::rgb(0, 0, 255),
        "navy" => Rgba8::rgb(0, 0, 128),
        "fuchsia" | "magenta" => Rgba8::rgb(255, 0, 255),
        "purple" => Rgba8::rgb(128, 0, 128),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
