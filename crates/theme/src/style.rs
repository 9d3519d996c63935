/// Stroke widths and text metrics used by the chart renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub grid_width:   f64,
    pub axis_width:   f64,
    pub series_width: f64,
    pub border_width: f64,
    /// Alpha of the filled area under the first series.
    pub fill_alpha:   f32,
    pub font_size:    f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            grid_width:   0.5,
            axis_width:   1.5,
            series_width: 2.0,
            border_width: 1.0,
            fill_alpha:   0.3,
            font_size:    12.0,
        }
    }
}
