pub mod colors;
pub mod style;

pub use colors::Color;
pub use style::ChartStyle;

use tm_config::ThemeConfig;

/// Compiled chart theme derived from [`ThemeConfig`].
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA.
/// Calling [`Theme::from_config`] is infallible: invalid color strings fall
/// back to the built-in palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text:       Color,
    pub grid:       Color,
    pub axis:       Color,
    pub border:     Color,
    pub cpu:        Color,
    pub memory:     Color,
    pub disk_read:  Color,
    pub disk_write: Color,
    pub disk_used:  Color,
    pub disk_free:  Color,
    pub style:      ChartStyle,
}

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` section.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        let pick = |hex: &str, fallback: Color| Color::from_hex(hex).unwrap_or(fallback);
        Self {
            background: pick(&cfg.background, Color::WHITE),
            text:       pick(&cfg.text, Color::BLACK),
            grid:       pick(&cfg.grid, Color::GRID),
            axis:       pick(&cfg.axis, Color::AXIS),
            border:     pick(&cfg.border, Color::BORDER),
            cpu:        pick(&cfg.cpu, Color::BLUE),
            memory:     pick(&cfg.memory, Color::GREEN),
            disk_read:  pick(&cfg.disk_read, Color::BLUE),
            disk_write: pick(&cfg.disk_write, Color::RED),
            disk_used:  pick(&cfg.disk_used, Color::RED),
            disk_free:  pick(&cfg.disk_free, Color::GREEN),
            style: ChartStyle {
                font_size: f64::from(cfg.font_size),
                ..ChartStyle::default()
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_hex_falls_back() {
        let cfg = ThemeConfig { cpu: "not-a-color".into(), ..ThemeConfig::default() };
        assert_eq!(Theme::from_config(&cfg).cpu, Color::BLUE);
    }
}
