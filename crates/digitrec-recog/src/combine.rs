//! Fusion of two classifiers' probability vectors
//!
//! Given per-sample probability vectors from two independent strategies
//! (e.g. profile and zoning), the fused vector is their elementwise sum
//! or product, renormalized to sum to 1.

use crate::classify::{Probabilities, normalize};
use crate::{RecogError, RecogResult};

fn combine_with(
    a: &[Probabilities],
    b: &[Probabilities],
    op: impl Fn(f64, f64) -> f64,
) -> RecogResult<Vec<Probabilities>> {
    if a.len() != b.len() {
        return Err(RecogError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b)
        .map(|(pa, pb)| normalize(std::array::from_fn(|i| op(pa[i], pb[i]))))
        .collect())
}

/// Elementwise sum per sample, renormalized
pub fn combine_sum(a: &[Probabilities], b: &[Probabilities]) -> RecogResult<Vec<Probabilities>> {
    combine_with(a, b, |x, y| x + y)
}

/// Elementwise product per sample, renormalized.
///
/// Samples whose product is zero everywhere stay all-zero.
pub fn combine_product(
    a: &[Probabilities],
    b: &[Probabilities],
) -> RecogResult<Vec<Probabilities>> {
    combine_with(a, b, |x, y| x * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::NUM_CLASSES;

    fn probs(head: &[f64]) -> Probabilities {
        let mut p = [0.0; NUM_CLASSES];
        p[..head.len()].copy_from_slice(head);
        p
    }

    #[test]
    fn test_sum_is_mean() {
        let a = [probs(&[0.2, 0.8])];
        let b = [probs(&[0.8, 0.2])];
        let s = combine_sum(&a, &b).unwrap();
        assert!((s[0][0] - 0.5).abs() < 1e-12);
        assert!((s[0][1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_product() {
        let a = [probs(&[0.5, 0.5])];
        let b = [probs(&[0.25, 0.75])];
        let p = combine_product(&a, &b).unwrap();
        assert!((p[0][0] - 0.25).abs() < 1e-12);
        assert!((p[0][1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_product_stays_zero() {
        let a = [probs(&[1.0, 0.0])];
        let b = [probs(&[0.0, 1.0])];
        assert_eq!(combine_product(&a, &b).unwrap()[0], [0.0; NUM_CLASSES]);
    }

    #[test]
    fn test_length_mismatch() {
        let a = [probs(&[1.0])];
        assert!(matches!(
            combine_sum(&a, &[]),
            Err(RecogError::DimensionMismatch { expected: 1, actual: 0 })
        ));
    }
}
