//! Shared bin edges for a pair of samples.

use crate::data::Sample;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How bucket boundaries are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningStrategy {
    /// Percentiles of the baseline sample only; production data never moves the bins.
    #[default]
    Quantiles,
    /// Equally spaced over the union range of both samples.
    EqualWidth,
}

/// Why no usable edges could be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinningError {
    /// Constant data, or fewer than two distinct edges after deduplication.
    #[error("degenerate range [{min}, {max}]")]
    DegenerateRange { min: f64, max: f64 },

    #[error("cannot bin an empty sample")]
    EmptySample,

    #[error("bucket count must be at least 1")]
    NoBuckets,
}

/// Strictly increasing bucket boundaries, at least two of them.
///
/// Buckets are `[e0, e1), [e1, e2), ..., [e(n-1), en]`: half-open except the
/// last, which also takes values equal to the upper edge. Values outside
/// `[e0, en]` land in no bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges(Vec<f64>);

impl BinEdges {
    /// Compute edges for `expected` vs `actual`.
    pub fn compute(
        expected: &Sample,
        actual: &Sample,
        bucket_count: usize,
        strategy: BinningStrategy,
    ) -> Result<Self, BinningError> {
        if bucket_count == 0 {
            return Err(BinningError::NoBuckets);
        }
        let points = match strategy {
            BinningStrategy::Quantiles => {
                if expected.is_empty() {
                    return Err(BinningError::EmptySample);
                }
                (0..=bucket_count)
                    .filter_map(|i| expected.percentile(i as f64 * 100.0 / bucket_count as f64))
                    .collect()
            }
            BinningStrategy::EqualWidth => {
                let (min, max) = union_range(expected, actual).ok_or(BinningError::EmptySample)?;
                if min == max {
                    return Err(BinningError::DegenerateRange { min, max });
                }
                linspace(min, max, bucket_count)
            }
        };
        Self::from_points(points)
    }

    /// Build edges from arbitrary points: sorted, exact duplicates collapsed.
    pub fn from_points(mut points: Vec<f64>) -> Result<Self, BinningError> {
        points.retain(|p| p.is_finite());
        points.sort_by(f64::total_cmp);
        points.dedup();
        if points.len() < 2 {
            let v = points.first().copied().unwrap_or(f64::NAN);
            return Err(BinningError::DegenerateRange { min: v, max: v });
        }
        Ok(Self(points))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn bucket_count(&self) -> usize {
        self.0.len() - 1
    }

    pub fn lower(&self) -> f64 {
        self.0[0]
    }

    pub fn upper(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Bucket index of `value`, or `None` when it falls outside the edges.
    pub fn bucket_of(&self, value: f64) -> Option<usize> {
        if !(value >= self.lower() && value <= self.upper()) {
            return None;
        }
        if value == self.upper() {
            return Some(self.bucket_count() - 1);
        }
        // value >= e0, so at least one edge is <= value
        Some(self.0.partition_point(|e| *e <= value) - 1)
    }

    /// Count of `values` per bucket.
    pub fn counts(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0; self.bucket_count()];
        for &v in values {
            if let Some(i) = self.bucket_of(v) {
                counts[i] += 1;
            }
        }
        counts
    }

    /// Share of the whole sample per bucket, with empty buckets raised to `zero_floor`.
    ///
    /// The denominator is the full sample size, so values outside the edges still
    /// dilute every bucket.
    pub fn proportions(&self, sample: &Sample, zero_floor: f64) -> Vec<f64> {
        let n = sample.len() as f64;
        self.counts(sample.values())
            .into_iter()
            .map(|c| if c == 0 { zero_floor } else { c as f64 / n })
            .collect()
    }
}

fn union_range(a: &Sample, b: &Sample) -> Option<(f64, f64)> {
    let min = match (a.min(), b.min()) {
        (Some(x), Some(y)) => x.min(y),
        (x, y) => x.or(y)?,
    };
    let max = match (a.max(), b.max()) {
        (Some(x), Some(y)) => x.max(y),
        (x, y) => x.or(y)?,
    };
    Some((min, max))
}

/// `buckets + 1` evenly spaced points from `min` to exactly `max`.
fn linspace(min: f64, max: f64, buckets: usize) -> Vec<f64> {
    let step = (max - min) / buckets as f64;
    (0..=buckets)
        .map(|i| {
            if i == buckets {
                max
            } else if step.is_finite() {
                min + step * i as f64
            } else {
                let t = i as f64 / buckets as f64;
                min * (1.0 - t) + max * t
            }
        })
        .collect()
}

/// Union range of two samples, widened to `[min - 1, max + 1]` when constant.
/// Used by the detail histogram, which always needs at least one bucket.
pub(crate) fn display_edges(a: &Sample, b: &Sample, buckets: usize) -> Option<BinEdges> {
    let (min, max) = union_range(a, b)?;
    if min == max {
        // Past 2^53 a step of 1 is lost to rounding; fall back to the next float.
        let lo = if min - 1.0 < min { min - 1.0 } else { min.next_down() };
        let hi = if max + 1.0 > max { max + 1.0 } else { max.next_up() };
        return Some(BinEdges(vec![lo, hi]));
    }
    BinEdges::from_points(linspace(min, max, buckets.max(1))).ok()
}
