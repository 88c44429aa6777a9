//! Renderer seam: the pipeline pushes whole series and axis updates; the
//! window (or the PNG snapshot) only ever reads what it was given.
use crate::drivers::axis::AxisRange;
use crate::types::{AxisUnit, SeriesKind};

pub trait Renderer {
    /// Replaces the points of series `name`. `x_axis` and `y_values` have equal length.
    fn set_series(&mut self, name: &str, x_axis: &[f64], y_values: &[f64]);
    /// Relabels the x axis and sets its visible range.
    fn set_axis_label_and_range(&mut self, low: f64, high: f64, unit: AxisUnit);
}

#[derive(Clone, Debug, Default)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Renderer that keeps the latest state of every chart in memory.
/// The egui window draws from it and the PNG snapshot is rendered from it.
#[derive(Clone, Debug, Default)]
pub struct ChartBoard {
    series: Vec<ChartSeries>,
    axis: Option<AxisRange>,
}

impl ChartBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, name: &str) -> Option<&[[f64; 2]]> {
        self.series
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.points.as_slice())
    }

    pub fn kind_points(&self, kind: SeriesKind) -> &[[f64; 2]] {
        self.series(kind.name()).unwrap_or(&[])
    }

    pub fn axis(&self) -> Option<AxisRange> {
        self.axis
    }

    pub fn axis_label(&self) -> &'static str {
        self.axis.map(|a| a.unit).unwrap_or_default().label()
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// x range to show: the announced axis range, otherwise the span of the data.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        if let Some(axis) = self.axis {
            return Some((axis.low, axis.high));
        }
        let mut xs = self.series.iter().flat_map(|s| s.points.iter().map(|p| p[0]));
        let first = xs.next()?;
        Some(xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
    }

    /// y range of one series, or `None` when it has no points.
    pub fn y_bounds(&self, name: &str) -> Option<(f64, f64)> {
        let mut ys = self.series(name)?.iter().map(|p| p[1]);
        let first = ys.next()?;
        Some(ys.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

impl Renderer for ChartBoard {
    fn set_series(&mut self, name: &str, x_axis: &[f64], y_values: &[f64]) {
        let points = x_axis
            .iter()
            .zip(y_values)
            .map(|(&x, &y)| [x, y])
            .collect();
        match self.series.iter_mut().find(|s| s.name == name) {
            Some(series) => series.points = points,
            None => self.series.push(ChartSeries {
                name: name.to_owned(),
                points,
            }),
        }
    }

    fn set_axis_label_and_range(&mut self, low: f64, high: f64, unit: AxisUnit) {
        self.axis = Some(AxisRange { low, high, unit });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_series_replaces_points_by_name() {
        let mut board = ChartBoard::new();
        assert!(board.is_empty());
        board.set_series("voltage", &[0.0, 1.0], &[3.3, 3.2]);
        board.set_series("voltage", &[0.0, 50.0, 100.0], &[3.3, 3.2, 3.1]);
        assert_eq!(board.kind_points(SeriesKind::Voltage), &[[0.0, 3.3], [50.0, 3.2], [100.0, 3.1]]);
        assert!(board.kind_points(SeriesKind::Power).is_empty());
        assert_eq!(board.series("voltage").map(<[_]>::len), Some(3));
    }

    #[test]
    fn bounds_follow_axis_range_when_announced() {
        let mut board = ChartBoard::new();
        board.set_series("current", &[0.0, 1.0, 2.0], &[10.0, 30.0, 20.0]);
        assert_eq!(board.x_bounds(), Some((0.0, 2.0)));
        assert_eq!(board.y_bounds("current"), Some((10.0, 30.0)));
        assert_eq!(board.axis_label(), "Sample");
        board.set_axis_label_and_range(0.0, 534.894, AxisUnit::Milliseconds);
        assert_eq!(board.x_bounds(), Some((0.0, 534.894)));
        assert_eq!(board.axis_label(), "Time (ms)");
        assert_eq!(board.y_bounds("power"), None);
    }
}
