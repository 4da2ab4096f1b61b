use crate::error::ColorParseError;

/// Straight-alpha RGBA color, components in `[0, 1]`.
///
/// Brush colors are authored straight; the renderer premultiplies when it
/// composites a stamp (`alpha × color`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Clamps every channel to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn premultiplied(self) -> [f32; 4] {
        [self.r * self.a, self.g * self.a, self.b * self.a, self.a]
    }

    /// Parses `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    ///
    /// `rgb` channels are `0`–`255`; the `rgba` alpha is a `0`–`1` float, as in CSS.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex, input);
        }
        if let Some(body) = s.strip_prefix("rgba(").and_then(|b| b.strip_suffix(')')) {
            return parse_functional(body, 4, input);
        }
        if let Some(body) = s.strip_prefix("rgb(").and_then(|b| b.strip_suffix(')')) {
            return parse_functional(body, 3, input);
        }
        Err(ColorParseError::new("expected #hex, rgb(..) or rgba(..)", input))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

fn parse_hex(hex: &str, input: &str) -> Result<Rgba, ColorParseError> {
    if hex.len() != 6 && hex.len() != 8 {
        return Err(ColorParseError::new("hex colors need 6 or 8 digits", input));
    }
    let byte = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(|| ColorParseError::new("invalid hex digit", input))
    };
    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Ok(Rgba::from_u8(byte(0)?, byte(2)?, byte(4)?, a))
}

fn parse_functional(body: &str, expected: usize, input: &str) -> Result<Rgba, ColorParseError> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return Err(ColorParseError::new(
            format!("expected {expected} components, found {}", parts.len()),
            input,
        ));
    }

    let mut rgb = [0.0f32; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        let v: f32 = part
            .parse()
            .map_err(|_| ColorParseError::new(format!("bad channel {part:?}"), input))?;
        *slot = (v / 255.0).clamp(0.0, 1.0);
    }

    let a = match parts.get(3) {
        Some(part) => part
            .parse::<f32>()
            .map_err(|_| ColorParseError::new(format!("bad alpha {part:?}"), input))?
            .clamp(0.0, 1.0),
        None => 1.0,
    };

    Ok(Rgba::new(rgb[0], rgb[1], rgb[2], a))
}
