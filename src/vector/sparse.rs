//! Sparse vector representation for hybrid queries.
//!
//! A sparse vector stores explicit `(dimension, value)` pairs. The
//! dimension domain is unbounded and independent of the dense
//! dimensionality of the index.

use serde::{Deserialize, Serialize};

use crate::error::{CallaError, Result};

/// A sparse embedding: unique dimension indices with float values,
/// kept sorted by dimension so dot products are a single merge walk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseVector {
    dimensions: Vec<u32>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build a sparse vector from parallel dimension/value slices.
    ///
    /// Fails with [`CallaError::InvalidQuery`] if the slices differ in
    /// length or a dimension index repeats.
    pub fn new(dimensions: Vec<u32>, values: Vec<f64>) -> Result<Self> {
        if dimensions.len() != values.len() {
            return Err(CallaError::invalid_query(format!(
                "sparse vector has {} dimensions but {} values",
                dimensions.len(),
                values.len()
            )));
        }

        let mut pairs: Vec<(u32, f64)> = dimensions.into_iter().zip(values).collect();
        pairs.sort_by_key(|(dim, _)| *dim);
        for window in pairs.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(CallaError::invalid_query(format!(
                    "sparse vector dimension {} appears more than once",
                    window[0].0
                )));
            }
        }

        let (dimensions, values) = pairs.into_iter().unzip();
        Ok(Self { dimensions, values })
    }

    /// Number of stored (non-zero) entries.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// True if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Sorted dimension indices.
    pub fn dimensions(&self) -> &[u32] {
        &self.dimensions
    }

    /// Values aligned with [`Self::dimensions`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sparse dot product via merge walk over the sorted dimensions.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let mut sum = 0.0;
        let mut i = 0;
        let mut j = 0;
        while i < self.dimensions.len() && j < other.dimensions.len() {
            match self.dimensions[i].cmp(&other.dimensions[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_sorts_by_dimension() {
        let sv = SparseVector::new(vec![7, 2, 5], vec![0.7, 0.2, 0.5]).unwrap();
        assert_eq!(sv.dimensions(), &[2, 5, 7]);
        assert_eq!(sv.values(), &[0.2, 0.5, 0.7]);
    }

    #[test]
    fn duplicate_dimension_is_rejected() {
        assert!(SparseVector::new(vec![1, 1], vec![0.5, 0.5]).is_err());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(SparseVector::new(vec![1, 2], vec![0.5]).is_err());
    }

    #[test]
    fn dot_product_only_counts_shared_dimensions() {
        let a = SparseVector::new(vec![1, 3, 9], vec![1.0, 2.0, 3.0]).unwrap();
        let b = SparseVector::new(vec![3, 9, 20], vec![10.0, 0.5, 4.0]).unwrap();
        assert!((a.dot(&b) - (2.0 * 10.0 + 3.0 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn dot_product_with_disjoint_dimensions_is_zero() {
        let a = SparseVector::new(vec![1, 2], vec![1.0, 1.0]).unwrap();
        let b = SparseVector::new(vec![3, 4], vec![1.0, 1.0]).unwrap();
        assert_eq!(a.dot(&b), 0.0);
    }
}
