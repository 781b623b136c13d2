//! Nearest-centroid classification
//!
//! Each class is represented by the elementwise mean of its training
//! vectors. A query scores `exp(-d)` against every centroid and the
//! scores are normalized into probabilities, so an exact match only
//! dominates when the other centroids are far away.

use super::{ClassificationResult, Classifier, NUM_CLASSES, euclidean_distance, normalize};
use crate::features::FeatureVector;
use crate::{RecogError, RecogResult};
use std::collections::BTreeMap;

/// Mean vector of every class group.
///
/// # Errors
///
/// `DimensionMismatch` if a group mixes vector lengths; `EmptyModel` if a
/// group is empty.
pub fn build_centroids(
    groups: &BTreeMap<u8, Vec<FeatureVector>>,
) -> RecogResult<BTreeMap<u8, FeatureVector>> {
    groups
        .iter()
        .map(|(&label, vectors)| Ok((label, mean(label, vectors)?)))
        .collect()
}

fn mean(label: u8, vectors: &[FeatureVector]) -> RecogResult<FeatureVector> {
    let first = vectors
        .first()
        .ok_or_else(|| RecogError::EmptyModel(format!("class {} has no samples", label)))?;
    let mut sums = vec![0.0; first.len()];
    for v in vectors {
        first.check_len(v)?;
        for (acc, x) in sums.iter_mut().zip(v.as_slice()) {
            *acc += x;
        }
    }
    let n = vectors.len() as f64;
    Ok(FeatureVector::new(sums.into_iter().map(|s| s / n).collect()))
}

/// Soft nearest-centroid classifier over a borrowed centroid table
#[derive(Debug, Clone, Copy)]
pub struct CentroidClassifier<'a> {
    centroids: &'a BTreeMap<u8, FeatureVector>,
}

impl<'a> CentroidClassifier<'a> {
    pub fn new(centroids: &'a BTreeMap<u8, FeatureVector>) -> Self {
        Self { centroids }
    }
}

impl Classifier for CentroidClassifier<'_> {
    fn classify(&self, features: &FeatureVector) -> RecogResult<ClassificationResult> {
        if self.centroids.is_empty() {
            return Err(RecogError::EmptyModel("no centroids".to_string()));
        }
        let mut scores = [0.0; NUM_CLASSES];
        for (&label, centroid) in self.centroids {
            let d = euclidean_distance(centroid, features)?;
            if let Some(slot) = scores.get_mut(label as usize) {
                *slot = (-d).exp();
            }
        }
        Ok(ClassificationResult::from_probabilities(
            normalize(scores),
            features.clone(),
        ))
    }
}
