//! Training data and class models
//!
//! Training boxes get their class labels from a [`LabelMap`]; the labeled
//! feature vectors are then reduced to a [`ClassModel`], either one
//! centroid per class or the raw pool for k-NN. A model is built once and
//! only read afterwards.

use super::centroid::{CentroidClassifier, build_centroids};
use super::knn::KnnClassifier;
use super::{ClassificationResult, Classifier, NUM_CLASSES};
use crate::features::FeatureVector;
use crate::{RecogError, RecogResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// A feature vector with its known class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub label: u8,
    pub features: FeatureVector,
}

impl LabeledSample {
    /// Create a sample, rejecting labels above 9
    pub fn new(label: u8, features: FeatureVector) -> RecogResult<Self> {
        check_label(label)?;
        Ok(Self { label, features })
    }
}

fn check_label(label: u8) -> RecogResult<()> {
    if label as usize >= NUM_CLASSES {
        return Err(RecogError::InvalidLabel(format!(
            "class label {} is outside 0..={}",
            label,
            NUM_CLASSES - 1
        )));
    }
    Ok(())
}

/// Class label for each located box, in box order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap {
    labels: Vec<u8>,
}

impl LabelMap {
    /// Explicit labels, one per box
    pub fn new(labels: Vec<u8>) -> RecogResult<Self> {
        for &l in &labels {
            check_label(l)?;
        }
        Ok(Self { labels })
    }

    /// Labels for sheets laid out as contiguous runs of `samples_per_class`
    /// boxes per class: box `i` gets class `i / samples_per_class`.
    pub fn positional(n_boxes: usize, samples_per_class: usize) -> RecogResult<Self> {
        if samples_per_class == 0 {
            return Err(RecogError::InvalidParameter(
                "samples per class must be positive".to_string(),
            ));
        }
        if n_boxes % samples_per_class != 0 {
            return Err(RecogError::InvalidLabel(format!(
                "{} boxes do not split into runs of {} per class",
                n_boxes, samples_per_class
            )));
        }
        let labels = (0..n_boxes)
            .map(|i| u8::try_from(i / samples_per_class).unwrap_or(u8::MAX))
            .collect();
        Self::new(labels)
    }

    /// Fail unless there is exactly one label per box
    pub fn check_boxes(&self, n_boxes: usize) -> RecogResult<()> {
        if self.labels.len() != n_boxes {
            return Err(RecogError::InvalidLabel(format!(
                "{} labels for {} boxes",
                self.labels.len(),
                n_boxes
            )));
        }
        Ok(())
    }

    /// Label of box `index`
    pub fn get(&self, index: usize) -> Option<u8> {
        self.labels.get(index).copied()
    }

    /// All labels in box order
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Number of labeled boxes
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of boxes per class
    pub fn class_counts(&self) -> [usize; NUM_CLASSES] {
        let mut counts = [0; NUM_CLASSES];
        for &l in &self.labels {
            counts[l as usize] += 1;
        }
        counts
    }
}

/// Group sample vectors by class label, keeping input order within a class
pub fn group_by_class(samples: &[LabeledSample]) -> BTreeMap<u8, Vec<FeatureVector>> {
    let mut groups: BTreeMap<u8, Vec<FeatureVector>> = BTreeMap::new();
    for s in samples {
        groups.entry(s.label).or_default().push(s.features.clone());
    }
    groups
}

/// How a model classifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClassifierMode {
    /// Soft nearest-centroid
    #[default]
    Centroid,
    /// k-nearest-neighbors vote
    Knn {
        #[serde(default = "default_k")]
        k: usize,
    },
}

/// Neighbors consulted by [`ClassifierMode::knn`]
pub const DEFAULT_K: usize = 7;

fn default_k() -> usize {
    DEFAULT_K
}

impl ClassifierMode {
    /// k-NN with the default `k`
    pub fn knn() -> Self {
        ClassifierMode::Knn { k: DEFAULT_K }
    }
}

/// A trained model
#[derive(Debug, Clone, PartialEq)]
pub enum ClassModel {
    /// One mean vector per trained class
    Centroids(BTreeMap<u8, FeatureVector>),
    /// Every training sample, voted over by the `k` nearest
    Pool { samples: Vec<LabeledSample>, k: usize },
}

/// Build a model from labeled training vectors.
///
/// # Errors
///
/// `EmptyModel` without samples, `DimensionMismatch` if vector lengths
/// differ, `InvalidParameter` for `k == 0` or `k` above the pool size.
pub fn build_model(samples: &[LabeledSample], mode: ClassifierMode) -> RecogResult<ClassModel> {
    if samples.is_empty() {
        return Err(RecogError::EmptyModel("no training samples".to_string()));
    }
    let expected = samples[0].features.len();
    if let Some(bad) = samples.iter().find(|s| s.features.len() != expected) {
        return Err(RecogError::DimensionMismatch {
            expected,
            actual: bad.features.len(),
        });
    }

    let model = match mode {
        ClassifierMode::Centroid => {
            let centroids = build_centroids(&group_by_class(samples))?;
            info!(classes = centroids.len(), dims = expected, "built centroid model");
            ClassModel::Centroids(centroids)
        }
        ClassifierMode::Knn { k } => {
            if k == 0 || k > samples.len() {
                return Err(RecogError::InvalidParameter(format!(
                    "k = {} must be in 1..={}",
                    k,
                    samples.len()
                )));
            }
            info!(pool = samples.len(), k, dims = expected, "built k-NN model");
            ClassModel::Pool {
                samples: samples.to_vec(),
                k,
            }
        }
    };
    Ok(model)
}

impl ClassModel {
    /// Rebuild a centroid model from a vector list where index = label.
    ///
    /// Empty vectors mark classes without a centroid, as written by
    /// [`ClassModel::vectors`].
    pub fn centroids_from_vectors(vectors: Vec<FeatureVector>) -> RecogResult<Self> {
        if vectors.len() > NUM_CLASSES {
            return Err(RecogError::InvalidLabel(format!(
                "{} centroids for {} classes",
                vectors.len(),
                NUM_CLASSES
            )));
        }
        let Some(expected) = vectors.iter().map(FeatureVector::len).find(|&n| n > 0) else {
            return Err(RecogError::EmptyModel("no centroid vectors".to_string()));
        };
        let mut centroids = BTreeMap::new();
        for (label, v) in vectors.into_iter().enumerate() {
            if v.is_empty() {
                continue;
            }
            if v.len() != expected {
                return Err(RecogError::DimensionMismatch {
                    expected,
                    actual: v.len(),
                });
            }
            centroids.insert(label as u8, v);
        }
        Ok(ClassModel::Centroids(centroids))
    }

    /// Rebuild a k-NN model from pool vectors and their labels
    pub fn pool_from_vectors(
        vectors: Vec<FeatureVector>,
        labels: &LabelMap,
        k: usize,
    ) -> RecogResult<Self> {
        labels.check_boxes(vectors.len())?;
        let samples = labels
            .labels()
            .iter()
            .zip(vectors)
            .map(|(&label, v)| LabeledSample::new(label, v))
            .collect::<RecogResult<Vec<_>>>()?;
        build_model(&samples, ClassifierMode::Knn { k })
    }

    /// The mode this model classifies with
    pub fn mode(&self) -> ClassifierMode {
        match self {
            ClassModel::Centroids(_) => ClassifierMode::Centroid,
            ClassModel::Pool { k, .. } => ClassifierMode::Knn { k: *k },
        }
    }

    /// Stored vectors: one slot per class for centroids (empty where the
    /// class was never trained), pool order for k-NN
    pub fn vectors(&self) -> Vec<FeatureVector> {
        match self {
            ClassModel::Centroids(c) => (0..NUM_CLASSES as u8)
                .map(|label| c.get(&label).cloned().unwrap_or_default())
                .collect(),
            ClassModel::Pool { samples, .. } => samples.iter().map(|s| s.features.clone()).collect(),
        }
    }

    /// Labels of the pool vectors, in pool order; `None` for centroids
    pub fn pool_labels(&self) -> Option<LabelMap> {
        match self {
            ClassModel::Centroids(_) => None,
            ClassModel::Pool { samples, .. } => Some(LabelMap {
                labels: samples.iter().map(|s| s.label).collect(),
            }),
        }
    }

    /// Length of the vectors this model accepts
    pub fn dims(&self) -> usize {
        match self {
            ClassModel::Centroids(c) => c.values().next().map_or(0, FeatureVector::len),
            ClassModel::Pool { samples, .. } => samples.first().map_or(0, |s| s.features.len()),
        }
    }
}

impl Classifier for ClassModel {
    fn classify(&self, features: &FeatureVector) -> RecogResult<ClassificationResult> {
        match self {
            ClassModel::Centroids(centroids) => CentroidClassifier::new(centroids).classify(features),
            ClassModel::Pool { samples, k } => KnnClassifier::new(samples, *k)?.classify(features),
        }
    }
}
