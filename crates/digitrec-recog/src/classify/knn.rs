//! k-nearest-neighbors classification
//!
//! The query's distance to every pooled training vector is computed and
//! sorted ascending; the first `k` neighbors vote, and each class gets
//! `votes / k`.

use super::model::LabeledSample;
use super::{ClassificationResult, Classifier, NUM_CLASSES, euclidean_distance};
use crate::features::FeatureVector;
use crate::{RecogError, RecogResult};

/// One voting neighbor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub label: u8,
    pub distance: f64,
}

/// The `k` pool entries nearest to `features`, closest first.
///
/// Equal distances keep pool order.
pub fn k_nearest_neighbors(
    k: usize,
    features: &FeatureVector,
    pool: &[LabeledSample],
) -> RecogResult<Vec<Neighbor>> {
    check_k(k, pool.len())?;
    let mut neighbors = pool
        .iter()
        .map(|s| {
            Ok(Neighbor {
                label: s.label,
                distance: euclidean_distance(&s.features, features)?,
            })
        })
        .collect::<RecogResult<Vec<_>>>()?;
    // stable sort
    neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    neighbors.truncate(k);
    Ok(neighbors)
}

fn check_k(k: usize, pool_len: usize) -> RecogResult<()> {
    if pool_len == 0 {
        return Err(RecogError::EmptyModel("empty k-NN pool".to_string()));
    }
    if k == 0 || k > pool_len {
        return Err(RecogError::InvalidParameter(format!(
            "k = {} must be in 1..={}",
            k, pool_len
        )));
    }
    Ok(())
}

/// Vote fractions of a neighbor list: `count(label) / len`
pub fn vote_probabilities(neighbors: &[Neighbor]) -> [f64; NUM_CLASSES] {
    let mut probs = [0.0; NUM_CLASSES];
    if neighbors.is_empty() {
        return probs;
    }
    for n in neighbors {
        if let Some(p) = probs.get_mut(n.label as usize) {
            *p += 1.0;
        }
    }
    let k = neighbors.len() as f64;
    probs.map(|c| c / k)
}

/// k-NN classifier over a borrowed training pool
#[derive(Debug, Clone, Copy)]
pub struct KnnClassifier<'a> {
    pool: &'a [LabeledSample],
    k: usize,
}

impl<'a> KnnClassifier<'a> {
    /// # Errors
    ///
    /// `EmptyModel` for an empty pool; `InvalidParameter` unless `1 <= k <= pool.len()`.
    pub fn new(pool: &'a [LabeledSample], k: usize) -> RecogResult<Self> {
        check_k(k, pool.len())?;
        Ok(Self { pool, k })
    }
}

impl Classifier for KnnClassifier<'_> {
    fn classify(&self, features: &FeatureVector) -> RecogResult<ClassificationResult> {
        let neighbors = k_nearest_neighbors(self.k, features, self.pool)?;
        Ok(ClassificationResult::from_probabilities(
            vote_probabilities(&neighbors),
            features.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<LabeledSample> {
        [(0, 0.0), (0, 1.0), (1, 2.0), (1, 3.0), (2, 10.0)]
            .iter()
            .map(|&(l, x)| LabeledSample::new(l, FeatureVector::new(vec![x])).unwrap())
            .collect()
    }

    #[test]
    fn test_neighbors_sorted() {
        let n = k_nearest_neighbors(3, &FeatureVector::new(vec![2.2]), &pool()).unwrap();
        let labels: Vec<u8> = n.iter().map(|x| x.label).collect();
        assert_eq!(labels, vec![1, 1, 0]);
        assert!(n.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_ties_keep_pool_order() {
        // 1.5 is equidistant from 1.0 (class 0) and 2.0 (class 1)
        let n = k_nearest_neighbors(1, &FeatureVector::new(vec![1.5]), &pool()).unwrap();
        assert_eq!(n[0].label, 0);
    }

    #[test]
    fn test_vote_probabilities() {
        let r = KnnClassifier::new(&pool(), 3)
            .unwrap()
            .classify(&FeatureVector::new(vec![2.2]))
            .unwrap();
        assert!((r.probabilities[1] - 2.0 / 3.0).abs() < 1e-12);
        assert!((r.probabilities[0] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(r.label, Some(1));
    }

    #[test]
    fn test_bad_k() {
        let p = pool();
        assert!(KnnClassifier::new(&p, 0).is_err());
        assert!(KnnClassifier::new(&p, 6).is_err());
        assert!(KnnClassifier::new(&[], 1).is_err());
    }
}
