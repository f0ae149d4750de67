//! Pure numeric utilities for embedding vectors.
//!
//! These functions are stateless and deterministic. The inner loops
//! process components in chunks of four so the compiler can vectorize
//! the hot paths.

use crate::error::{CallaError, Result};
use crate::vector::Vector;

/// Dot product over two equal-length slices.
///
/// Callers are responsible for the length check; the index and fusion
/// paths validate dimensions before reaching this loop.
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut sum = [0.0f64; 4];
    let chunks = a.chunks_exact(4);
    let remainder = chunks.remainder();
    let b_chunks = b.chunks_exact(4);

    for (ac, bc) in chunks.zip(b_chunks) {
        for i in 0..4 {
            sum[i] += ac[i] * bc[i];
        }
    }

    let b_remainder = &b[b.len() - remainder.len()..];
    let mut total = sum[0] + sum[1] + sum[2] + sum[3];
    for (x, y) in remainder.iter().zip(b_remainder.iter()) {
        total += x * y;
    }
    total
}

/// Squared L2 norm of a slice.
pub(crate) fn norm_squared(v: &[f64]) -> f64 {
    dot(v, v)
}

/// L2-normalize a vector: `v / ||v||2`.
///
/// The zero vector is returned unchanged; it is a valid degenerate
/// embedding, not an error.
pub fn normalize(v: &Vector) -> Vector {
    let norm = norm_squared(&v.data).sqrt();
    if norm == 0.0 {
        return v.clone();
    }
    let inv = 1.0 / norm;
    Vector::new(v.data.iter().map(|x| x * inv).collect())
}

/// Elementwise weighted sum `Σ w_i * v_i` over an ordered sequence of
/// `(vector, weight)` pairs.
///
/// All vectors must share the same dimension; weights are not required
/// to sum to 1, and the result is not renormalized. Callers normalize
/// again when a unit-length fused vector is required.
pub fn weighted_combine(vectors: &[(Vector, f64)]) -> Result<Vector> {
    let (first, _) = vectors.first().ok_or_else(|| {
        CallaError::invalid_query("weighted_combine requires at least one vector")
    })?;
    let dimension = first.dimension();

    let mut out = vec![0.0f64; dimension];
    for (vector, weight) in vectors {
        vector.check_dimension(dimension)?;
        for (acc, x) in out.iter_mut().zip(vector.data.iter()) {
            *acc += weight * x;
        }
    }
    Ok(Vector::new(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn normalize_produces_unit_length() {
        let v = Vector::new(vec![3.0, 4.0]);
        let n = normalize(&v);
        let len = norm_squared(&n.data).sqrt();
        assert!((len - 1.0).abs() < TOLERANCE);
        assert!((n.data[0] - 0.6).abs() < TOLERANCE);
        assert!((n.data[1] - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn normalize_zero_vector_is_identity() {
        let v = Vector::zeros(5);
        let n = normalize(&v);
        assert_eq!(n, v);
    }

    #[test]
    fn normalize_long_vector_unit_length() {
        let v = Vector::new((1..=1000).map(|i| i as f64 * 0.01).collect());
        let n = normalize(&v);
        let len = norm_squared(&n.data).sqrt();
        assert!((len - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn weighted_combine_sums_elementwise() {
        let a = Vector::new(vec![1.0, 2.0]);
        let b = Vector::new(vec![10.0, 20.0]);
        let combined = weighted_combine(&[(a, 0.5), (b, 0.25)]).unwrap();
        assert_eq!(combined.data, vec![3.0, 6.0]);
    }

    #[test]
    fn weighted_combine_rejects_mismatched_dimensions() {
        let a = Vector::new(vec![1.0, 2.0]);
        let b = Vector::new(vec![1.0, 2.0, 3.0]);
        let err = weighted_combine(&[(a, 1.0), (b, 1.0)]).unwrap_err();
        match err {
            crate::error::CallaError::DimensionMismatch { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn weighted_combine_empty_input_is_invalid() {
        assert!(weighted_combine(&[]).is_err());
    }

    #[test]
    fn dot_matches_naive_loop() {
        let a: Vec<f64> = (0..37).map(|i| i as f64 * 0.5).collect();
        let b: Vec<f64> = (0..37).map(|i| (36 - i) as f64 * 0.25).collect();
        let naive: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        assert!((dot(&a, &b) - naive).abs() < TOLERANCE);
    }
}
