//! Min-max scaling of a series for sparkline-style rendering

use crate::core::series::FixedWindowSeries;
use time::OffsetDateTime;

/// Eighth-height blocks, lowest first
const SPARK_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Series values scaled into `[0, 1]`.
///
/// `min`/`max` are the extrema of the non-empty buckets. When there is no
/// visual range (no samples, or all samples equal) both are `None` and
/// `points` is empty, so renderers draw nothing instead of dividing by zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSeries {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// One entry per stored bucket; gaps map to `0.0`
    pub points: Vec<(OffsetDateTime, f64)>,
}

impl NormalizedSeries {
    /// True for the degenerate result
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `max - min`, when there is a range
    pub fn range(&self) -> Option<f64> {
        Some(self.max? - self.min?)
    }

    /// Scaled values only, without timestamps
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }

    /// Text sparkline, one block per bucket. Gaps draw as the lowest block;
    /// the degenerate result draws nothing.
    pub fn sparkline(&self) -> String {
        let top = (SPARK_BLOCKS.len() - 1) as f64;
        self.values()
            .map(|v| SPARK_BLOCKS[(v * top).round() as usize])
            .collect()
    }

    pub fn into_parts(self) -> (Option<f64>, Option<f64>, Vec<(OffsetDateTime, f64)>) {
        (self.min, self.max, self.points)
    }
}

impl FixedWindowSeries {
    /// Scale every bucket into `[0, 1]` relative to the stored extrema.
    pub fn normalized_points(&self) -> NormalizedSeries {
        let mut samples = self.data_points().iter().flatten().copied();
        let Some(first) = samples.next() else {
            return NormalizedSeries::default();
        };
        let (min, max) = samples.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if max == min {
            return NormalizedSeries::default();
        }

        let points = self
            .iter_points()
            .map(|(ts, v)| (ts, v.map_or(0.0, |v| scale(v, min, max))))
            .collect();

        NormalizedSeries {
            min: Some(min),
            max: Some(max),
            points,
        }
    }
}

/// Position of `v` within `[min, max]`, for `min < max`.
///
/// A range wider than `f64::MAX` is scaled on halved operands so that
/// neither the range nor the offset overflows.
fn scale(v: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    let scaled = if range.is_finite() {
        (v - min) / range
    } else {
        (v / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
    };
    scaled.clamp(0.0, 1.0)
}
