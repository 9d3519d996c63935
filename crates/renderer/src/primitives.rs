use serde::Serialize;
use tm_theme::Color;

/// A position in surface pixels; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One drawing instruction.
///
/// Angles are in degrees in screen space, so a positive sweep turns
/// clockwise and −90° points straight up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    FillRect { x: f64, y: f64, width: f64, height: f64, color: Color },
    StrokeRect { x: f64, y: f64, width: f64, height: f64, color: Color, line_width: f64 },
    Line { from: Point, to: Point, color: Color, line_width: f64 },
    Polyline { points: Vec<Point>, color: Color, line_width: f64 },
    /// Closed, filled polygon.
    FillPolygon { points: Vec<Point>, color: Color },
    /// Filled circle sector from `start_deg` sweeping `sweep_deg`.
    Wedge { center: Point, radius: f64, start_deg: f64, sweep_deg: f64, color: Color },
    /// Circle outline.
    Circle { center: Point, radius: f64, color: Color, line_width: f64 },
    /// Text whose baseline starts at `position`.
    Text { position: Point, text: String, color: Color, size: f64 },
    /// Text centred horizontally and vertically on `center`.
    CenteredText { center: Point, text: String, color: Color, size: f64 },
}

impl DrawOp {
    /// Horizontal or vertical rule.
    pub(crate) fn line(x0: f64, y0: f64, x1: f64, y1: f64, color: Color, line_width: f64) -> Self {
        DrawOp::Line {
            from: Point::new(x0, y0),
            to: Point::new(x1, y1),
            color,
            line_width,
        }
    }
}
