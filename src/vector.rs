//! Dense and sparse vector types plus the numeric utilities that power
//! embedding fusion and distance computation.
//!
//! # Module Structure
//!
//! - [`ops`]: pure numeric utilities (L2 normalization, weighted combine)
//! - [`distance`]: distance metrics (Euclidean, cosine, dot product)
//! - [`sparse`]: sparse vector representation for hybrid queries

pub mod distance;
pub mod ops;
pub mod sparse;

use serde::{Deserialize, Serialize};

use crate::error::{CallaError, Result};

/// A dense embedding vector.
///
/// Fixed dimensionality per index; components are IEEE-754 doubles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    /// Vector components.
    pub data: Vec<f64>,
}

impl Vector {
    /// Create a new vector from raw components.
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Create a zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            data: vec![0.0; dimension],
        }
    }

    /// Number of components.
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// True if every component is finite.
    pub fn is_valid(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Fail with [`CallaError::DimensionMismatch`] unless this vector
    /// has exactly `expected` components.
    pub fn check_dimension(&self, expected: usize) -> Result<()> {
        if self.data.len() != expected {
            return Err(CallaError::DimensionMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

impl AsRef<[f64]> for Vector {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}
