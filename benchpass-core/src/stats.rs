//! Aggregate statistics over speedup ratios.

use serde::{Deserialize, Serialize};

/// Geometric mean of a slice of positive values: the nth root of the
/// product of n values. Returns `None` for an empty slice.
#[must_use]
pub fn geometric_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let product: f64 = values.iter().product();
    Some(product.powf(1.0 / values.len() as f64))
}

/// Arithmetic mean of a slice of values. Returns `None` for an empty slice.
#[must_use]
pub fn arithmetic_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Overall effect of a pass on performance, judged by the geometric mean
/// speedup across all compared benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Improved,
    Degraded,
    NoEffect,
}

impl Verdict {
    /// Classify a geometric mean speedup relative to 1.0.
    #[must_use]
    pub fn from_geometric_mean(geomean: f64) -> Self {
        if geomean > 1.0 {
            Self::Improved
        } else if geomean < 1.0 {
            Self::Degraded
        } else {
            Self::NoEffect
        }
    }
}
