//! Distance metrics for dense similarity search.
//!
//! A metric is fixed per index instance at construction so every entry
//! is ranked against the same notion of distance.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vector::ops::{dot, norm_squared};

/// The distance metric used by an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// L2 distance. Smaller is closer.
    #[default]
    Euclidean,
    /// Cosine distance: `1 - cos(a, b)`. Smaller is closer.
    Cosine,
    /// Negated dot product, so that smaller is closer like the other
    /// metrics and one ascending sort order serves all three.
    DotProduct,
}

impl DistanceMetric {
    /// Distance between two equal-dimension vectors. Smaller is closer
    /// for every variant.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        debug_assert_eq!(a.len(), b.len());
        let d = match self {
            DistanceMetric::Euclidean => {
                let mut sum = 0.0;
                for (x, y) in a.iter().zip(b.iter()) {
                    let diff = x - y;
                    sum += diff * diff;
                }
                sum.sqrt()
            }
            DistanceMetric::Cosine => {
                let denom = (norm_squared(a) * norm_squared(b)).sqrt();
                if denom == 0.0 {
                    // A zero vector has no direction; treat it as maximally far.
                    1.0
                } else {
                    1.0 - dot(a, b) / denom
                }
            }
            DistanceMetric::DotProduct => -dot(a, b),
        };
        Ok(d)
    }
}
