//! Toolkit-independent chart geometry.
//!
//! Every chart turns (history buffers, pixel size) into a flat list of
//! [`DrawOp`]s. The shell replays them with whatever 2D API it has; nothing in
//! here touches a drawing context.

pub mod pie;
pub mod primitives;
pub mod timeseries;

pub use pie::PieChart;
pub use primitives::{DrawOp, Point};
pub use timeseries::{Series, TimeSeriesChart};

/// A chart the shell can ask for primitives at draw time.
pub trait Chart {
    /// Primitives for a plot area of `width` × `height` pixels, painted in order.
    ///
    /// Returns an empty list when either dimension is not positive.
    fn draw(&self, width: f64, height: f64) -> Vec<DrawOp>;
}

pub(crate) fn has_area(width: f64, height: f64) -> bool {
    width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()
}
