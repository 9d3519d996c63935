use serde::Serialize;

/// Normalised RGBA colour (each channel in `[0.0, 1.0]`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE:      Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK:      Self = Self::rgb(0.0, 0.0, 0.0);
    pub const GRID:       Self = Self { r: 0.8, g: 0.8, b: 0.8, a: 0.5 };
    pub const AXIS:       Self = Self::rgb(0.3, 0.3, 0.3);
    pub const BORDER:     Self = Self::rgb(0.7, 0.7, 0.7);
    pub const BLUE:       Self = Self::rgb(0.13, 0.59, 0.95); // #2196f3
    pub const GREEN:      Self = Self::rgb(0.30, 0.69, 0.31); // #4caf50
    pub const RED:        Self = Self::rgb(0.96, 0.26, 0.21); // #f44336

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let full: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return None,
        };

        let packed = u32::from_str_radix(&full, 16).ok()?;
        let (rgb, alpha) = if full.len() == 8 {
            (packed >> 8, packed & 0xff)
        } else {
            (packed, 0xff)
        };
        let channel = |v: u32| (v & 0xff) as f32 / 255.0;

        Some(Self {
            r: channel(rgb >> 16),
            g: channel(rgb >> 8),
            b: channel(rgb),
            a: channel(alpha),
        })
    }

    /// Return a copy with the alpha channel set to `alpha`.
    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }
}
