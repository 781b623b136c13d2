//! Distance-based classification
//!
//! Two classifiers share the Euclidean distance primitive and the
//! [`Classifier`] interface:
//!
//! - [`centroid`]: soft nearest-centroid, `P(c) ~ exp(-d(x, centroid_c))`
//! - [`knn`]: k-nearest-neighbors vote, `P(c) = votes_c / K`
//!
//! Both report the full probability vector over the ten digit classes
//! alongside the winning label.

pub mod centroid;
pub mod knn;
pub mod model;

pub use centroid::{CentroidClassifier, build_centroids};
pub use knn::{KnnClassifier, Neighbor, k_nearest_neighbors};
pub use model::{ClassModel, ClassifierMode, LabelMap, LabeledSample, build_model, group_by_class};

use crate::RecogResult;
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// Number of digit classes
pub const NUM_CLASSES: usize = 10;

/// Label code exported when no class wins
pub const NO_MATCH: i32 = -1;

/// Probability per digit class
pub type Probabilities = [f64; NUM_CLASSES];

/// Outcome of classifying one feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning class, or `None` when every class scored the same
    pub label: Option<u8>,
    /// Probability per class; sums to 1 unless all scores were zero
    pub probabilities: Probabilities,
    /// The classified vector
    pub features: FeatureVector,
}

impl ClassificationResult {
    /// Build a result from class probabilities, picking the label by [`argmax`]
    pub fn from_probabilities(probabilities: Probabilities, features: FeatureVector) -> Self {
        Self {
            label: argmax(&probabilities),
            probabilities,
            features,
        }
    }

    /// Label as an integer code, [`NO_MATCH`] for no winner
    pub fn label_code(&self) -> i32 {
        self.label.map_or(NO_MATCH, i32::from)
    }
}

/// Produces a probability distribution over the digit classes for a query vector
pub trait Classifier {
    /// Classify one feature vector
    fn classify(&self, features: &FeatureVector) -> RecogResult<ClassificationResult>;

    /// Classify a batch, in order
    fn classify_all(&self, vectors: &[FeatureVector]) -> RecogResult<Vec<ClassificationResult>> {
        vectors.iter().map(|v| self.classify(v)).collect()
    }
}

/// Euclidean (L2) distance between two feature vectors.
///
/// # Errors
///
/// Returns `DimensionMismatch` if the lengths differ.
pub fn euclidean_distance(a: &FeatureVector, b: &FeatureVector) -> RecogResult<f64> {
    a.check_len(b)?;
    let sum: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    Ok(sum.sqrt())
}

/// Index of the largest value; ties go to the lowest index.
///
/// Returns `None` if all values are equal (including all zero), since no
/// class is preferred.
pub fn argmax(values: &[f64]) -> Option<u8> {
    let first = *values.first()?;
    if values.iter().all(|&v| v == first) {
        return None;
    }
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    u8::try_from(best).ok()
}

/// Divide scores by their sum. An all-zero score vector is returned as is.
pub fn normalize(scores: Probabilities) -> Probabilities {
    let total: f64 = scores.iter().sum();
    if total > 0.0 {
        scores.map(|s| s / total)
    } else {
        scores
    }
}
