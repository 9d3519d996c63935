use crate::primitives::{DrawOp, Point};
use crate::{has_area, Chart};
use tm_core::SampleHistory;
use tm_theme::{Color, Theme};

/// Share of the plot height a value equal to the scale maximum reaches.
const HEADROOM: f64 = 0.9;
/// Horizontal grid rows.
const GRID_ROWS: usize = 4;
/// Sample slots between vertical grid lines.
const GRID_SLOT_STEP: usize = 10;

const LEGEND_X: f64 = 10.0;
const LEGEND_Y: f64 = 10.0;
const LEGEND_SWATCH: (f64, f64) = (15.0, 10.0);
const LEGEND_SPACING: f64 = 70.0;

/// One line on a time-series chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label:  String,
    /// Oldest first.
    pub values: Vec<f64>,
    pub color:  Color,
}

impl Series {
    pub fn new(label: impl Into<String>, values: Vec<f64>, color: Color) -> Self {
        Self { label: label.into(), values, color }
    }

    pub fn from_history(label: impl Into<String>, history: &SampleHistory, color: Color) -> Self {
        Self::new(label, history.values(), color)
    }
}

/// Line/area chart over fixed-capacity histories.
///
/// Slots are spaced `width / (capacity - 1)` apart and the newest sample sits
/// in the rightmost slot, so a filling history grows in from the right.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesChart {
    pub capacity:   usize,
    /// Value drawn at 90% of the plot height.
    pub scale_max:  f64,
    pub series:     Vec<Series>,
    /// Shade the area under the first series.
    pub fill_first: bool,
    pub theme:      Theme,
}

impl TimeSeriesChart {
    /// CPU (filled) and memory percentages on a fixed 0–100 scale.
    pub fn performance(cpu: &SampleHistory, memory: &SampleHistory, theme: &Theme) -> Self {
        Self {
            capacity:   cpu.capacity().max(memory.capacity()),
            scale_max:  100.0,
            series: vec![
                Series::from_history("CPU", cpu, theme.cpu),
                Series::from_history("Memory", memory, theme.memory),
            ],
            fill_first: true,
            theme:      theme.clone(),
        }
    }

    /// Read (filled) and write throughput scaled to the larger of the two.
    pub fn disk_io(read: &SampleHistory, write: &SampleHistory, theme: &Theme) -> Self {
        Self {
            capacity:   read.capacity().max(write.capacity()),
            scale_max:  auto_scale(&[read, write]),
            series: vec![
                Series::from_history("Read", read, theme.disk_read),
                Series::from_history("Write", write, theme.disk_write),
            ],
            fill_first: true,
            theme:      theme.clone(),
        }
    }

    /// x of a sample slot.
    fn slot_x(&self, slot: usize, width: f64) -> f64 {
        let spacing = width / self.capacity.saturating_sub(1).max(1) as f64;
        slot as f64 * spacing
    }

    fn value_y(&self, value: f64, height: f64) -> f64 {
        let scale = if self.scale_max.is_finite() && self.scale_max > 0.0 {
            self.scale_max
        } else {
            1.0
        };
        height - value / scale * height * HEADROOM
    }

    /// Polyline points of one series, right-aligned to the newest slot.
    fn points(&self, values: &[f64], width: f64, height: f64) -> Vec<Point> {
        let capacity = self.capacity.max(1);
        let visible = &values[values.len().saturating_sub(capacity)..];
        let offset = capacity - visible.len();

        visible
            .iter()
            .enumerate()
            .map(|(i, &v)| Point::new(self.slot_x(offset + i, width), self.value_y(v, height)))
            .collect()
    }

    fn grid(&self, width: f64, height: f64, ops: &mut Vec<DrawOp>) {
        let color = self.theme.grid;
        let w = self.theme.style.grid_width;

        for row in 0..=GRID_ROWS {
            let y = (height * row as f64 / GRID_ROWS as f64).trunc();
            ops.push(DrawOp::line(0.0, y, width, y, color, w));
        }

        let slots = self.capacity.max(1);
        for slot in (0..=slots).step_by(GRID_SLOT_STEP) {
            let x = (width * slot as f64 / slots as f64).trunc();
            ops.push(DrawOp::line(x, 0.0, x, height, color, w));
        }
    }

    fn axes(&self, width: f64, height: f64, ops: &mut Vec<DrawOp>) {
        let color = self.theme.axis;
        let w = self.theme.style.axis_width;
        ops.push(DrawOp::line(0.0, height - 1.0, width, height - 1.0, color, w));
        ops.push(DrawOp::line(1.0, 0.0, 1.0, height, color, w));
    }

    fn legend(&self, ops: &mut Vec<DrawOp>) {
        let (sw, sh) = LEGEND_SWATCH;
        for (i, series) in self.series.iter().enumerate() {
            let x = LEGEND_X + i as f64 * LEGEND_SPACING;
            ops.push(DrawOp::FillRect { x, y: LEGEND_Y, width: sw, height: sh, color: series.color });
            ops.push(DrawOp::Text {
                position: Point::new(x + sw + 5.0, LEGEND_Y + sh),
                text:     series.label.clone(),
                color:    self.theme.text,
                size:     self.theme.style.font_size,
            });
        }
    }
}

impl Chart for TimeSeriesChart {
    fn draw(&self, width: f64, height: f64) -> Vec<DrawOp> {
        if !has_area(width, height) {
            return Vec::new();
        }

        let mut ops = vec![DrawOp::FillRect {
            x: 0.0,
            y: 0.0,
            width,
            height,
            color: self.theme.background,
        }];
        self.grid(width, height, &mut ops);
        self.axes(width, height, &mut ops);

        for (i, series) in self.series.iter().enumerate() {
            if series.values.len() < 2 {
                continue;
            }
            let points = self.points(&series.values, width, height);

            if i == 0 && self.fill_first {
                if let (Some(first), Some(last)) = (points.first(), points.last()) {
                    let mut area = Vec::with_capacity(points.len() + 2);
                    area.push(Point::new(first.x, height));
                    area.extend_from_slice(&points);
                    area.push(Point::new(last.x, height));
                    ops.push(DrawOp::FillPolygon {
                        points: area,
                        color:  series.color.with_alpha(self.theme.style.fill_alpha),
                    });
                }
            }

            ops.push(DrawOp::Polyline {
                points,
                color:      series.color,
                line_width: self.theme.style.series_width,
            });
        }

        self.legend(&mut ops);
        ops.push(DrawOp::StrokeRect {
            x: 0.5,
            y: 0.5,
            width: width - 1.0,
            height: height - 1.0,
            color: self.theme.border,
            line_width: self.theme.style.border_width,
        });
        ops
    }
}

/// Largest sample across `histories`, floored at 1 so the scale never divides by zero.
pub fn auto_scale(histories: &[&SampleHistory]) -> f64 {
    histories
        .iter()
        .filter_map(|h| h.max())
        .fold(1.0, f64::max)
}
