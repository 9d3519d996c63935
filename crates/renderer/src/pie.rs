use crate::primitives::{DrawOp, Point};
use crate::{has_area, Chart};
use tm_theme::Theme;

/// 12 o'clock.
const START_DEG: f64 = -90.0;
/// Radius as a share of the shorter side.
const RADIUS_FACTOR: f64 = 0.4;

pub const NO_DISK_MESSAGE: &str = "No disk selected";

/// Used/free pie for one filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    /// `None` renders the placeholder message.
    pub used_fraction: Option<f64>,
    pub placeholder:   String,
    pub theme:         Theme,
}

impl PieChart {
    pub fn new(used_fraction: Option<f64>, theme: &Theme) -> Self {
        Self {
            used_fraction,
            placeholder: NO_DISK_MESSAGE.to_string(),
            theme: theme.clone(),
        }
    }
}

impl Chart for PieChart {
    fn draw(&self, width: f64, height: f64) -> Vec<DrawOp> {
        if !has_area(width, height) {
            return Vec::new();
        }

        let theme = &self.theme;
        let center = Point::new(width / 2.0, height / 2.0);
        let mut ops = vec![DrawOp::FillRect {
            x: 0.0,
            y: 0.0,
            width,
            height,
            color: theme.background,
        }];

        let Some(raw) = self.used_fraction else {
            ops.push(DrawOp::CenteredText {
                center,
                text:  self.placeholder.clone(),
                color: theme.text,
                size:  theme.style.font_size,
            });
            return ops;
        };

        let used = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };
        let used_sweep = used * 360.0;
        let radius = width.min(height) * RADIUS_FACTOR;

        if used_sweep > 0.0 {
            ops.push(DrawOp::Wedge {
                center,
                radius,
                start_deg: START_DEG,
                sweep_deg: used_sweep,
                color: theme.disk_used,
            });
        }
        if used_sweep < 360.0 {
            ops.push(DrawOp::Wedge {
                center,
                radius,
                start_deg: START_DEG + used_sweep,
                sweep_deg: 360.0 - used_sweep,
                color: theme.disk_free,
            });
        }
        ops.push(DrawOp::Circle {
            center,
            radius,
            color: theme.border,
            line_width: theme.style.border_width,
        });

        let entries = [
            (format!("Used: {:.1}%", used * 100.0), theme.disk_used),
            (format!("Free: {:.1}%", (1.0 - used) * 100.0), theme.disk_free),
        ];
        for (i, (label, color)) in entries.into_iter().enumerate() {
            let y = 10.0 + i as f64 * 20.0;
            ops.push(DrawOp::FillRect { x: 10.0, y, width: 15.0, height: 10.0, color });
            ops.push(DrawOp::Text {
                position: Point::new(30.0, y + 10.0),
                text: label,
                color: theme.text,
                size: theme.style.font_size,
            });
        }
        ops
    }
}
