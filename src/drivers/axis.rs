use crate::types::AxisUnit;

/// Visible x range announced to the renderer together with its unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub low: f64,
    pub high: f64,
    pub unit: AxisUnit,
}

impl AxisRange {
    /// `[0, marker_ms]` in milliseconds.
    pub fn encryption_window(marker_ms: f64) -> Self {
        Self {
            low: 0.0,
            high: marker_ms,
            unit: AxisUnit::Milliseconds,
        }
    }
}

/// Rebuilds the time axis for `len` samples.
///
/// Without a marker the axis is the sample index. With a marker the samples
/// are spread evenly over `[0, marker_ms]`, so the last sample sits at the
/// marker value. The axis is always rebuilt whole because a new marker
/// rescales every earlier point.
pub fn rebuild_time_axis(len: usize, marker_ms: Option<f64>) -> Vec<f64> {
    match marker_ms {
        Some(ms) => {
            let step = if len > 1 {
                ms / (len - 1).max(1) as f64
            } else {
                0.0
            };
            (0..len).map(|i| i as f64 * step).collect()
        }
        None => (0..len).map(|i| i as f64).collect(),
    }
}

pub fn axis_unit(marker_ms: Option<f64>) -> AxisUnit {
    if marker_ms.is_some() {
        AxisUnit::Milliseconds
    } else {
        AxisUnit::Samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_axis_without_marker() {
        assert_eq!(rebuild_time_axis(0, None), Vec::<f64>::new());
        assert_eq!(rebuild_time_axis(1, None), vec![0.0]);
        assert_eq!(rebuild_time_axis(4, None), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn marker_spreads_samples_up_to_marker_value() {
        assert_eq!(rebuild_time_axis(2, Some(100.0)), vec![0.0, 100.0]);
        assert_eq!(rebuild_time_axis(5, Some(8.0)), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn single_sample_with_marker_sits_at_zero() {
        assert_eq!(rebuild_time_axis(1, Some(250.0)), vec![0.0]);
    }

    #[test]
    fn axis_is_non_decreasing() {
        for len in 0..50 {
            for marker in [None, Some(0.0), Some(0.5), Some(1234.5)] {
                let axis = rebuild_time_axis(len, marker);
                assert_eq!(axis.len(), len);
                assert!(axis.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}
