//! digitrec-recog - Handwritten digit segmentation and classification
//!
//! This crate turns a scanned sheet of handwritten digits into per-digit
//! bounding boxes, reduces each digit to a feature vector, and classifies
//! unknown digits against a reference set by distance:
//!
//! - **Segmentation**: row/column projections split the sheet into digit boxes
//! - **Features**: profile (edge margins) or zoning (grid densities)
//! - **Classification**: soft nearest-centroid or k-nearest-neighbors
//! - **Fusion**: sum/product combination of two strategies' probabilities
//!
//! # Quick Start
//!
//! ```no_run
//! use digitrec_recog::{FeatureStrategy, LocateOptions, locate_digits, extract_features};
//! use digitrec_recog::classify::{ClassifierMode, LabelMap, LabeledSample, Classifier, build_model};
//!
//! let sheet = digitrec_io::read_grayscale("app.tif").unwrap();
//! let boxes = locate_digits(&sheet, &LocateOptions::default()).unwrap();
//! let labels = LabelMap::positional(boxes.len(), 20).unwrap();
//! let strategy = FeatureStrategy::Profile { rows: 20 };
//!
//! let samples: Vec<LabeledSample> = boxes
//!     .iter()
//!     .enumerate()
//!     .map(|(i, b)| {
//!         let fv = extract_features(&sheet, b, &strategy, 128).unwrap();
//!         LabeledSample::new(labels.get(i).unwrap(), fv).unwrap()
//!     })
//!     .collect();
//! let model = build_model(&samples, ClassifierMode::Centroid).unwrap();
//! let result = model.classify(&samples[0].features).unwrap();
//! println!("label {:?}", result.label);
//! ```
//!
//! # Modules
//!
//! - [`ranges`]: runs of non-zero values in a projection
//! - [`locate`]: digit bounding boxes
//! - [`features`]: feature vectors
//! - [`classify`]: models and classifiers
//! - [`combine`]: probability fusion
//! - [`evaluate`]: recognition statistics
//! - [`serial`]: JSON/CSV artifacts
//! - [`pipeline`]: configured end-to-end run

pub mod classify;
pub mod combine;
mod error;
pub mod evaluate;
pub mod features;
pub mod locate;
pub mod pipeline;
pub mod ranges;
pub mod serial;

pub use error::{RecogError, RecogResult, ScanSide};

// Re-export commonly used types
pub use classify::{ClassModel, ClassificationResult, Classifier, ClassifierMode, LabelMap};
pub use features::{FeatureStrategy, FeatureVector, extract_features};
pub use locate::{LocateOptions, locate_digits};
pub use pipeline::{PipelineConfig, PipelineReport, run_pipeline};
pub use ranges::{Range, extract_ranges};

// Re-export core for convenience
pub use digitrec_core;
