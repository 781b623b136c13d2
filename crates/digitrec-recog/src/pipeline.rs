//! End-to-end recognition run
//!
//! Loads a training sheet and a test sheet, locates the digits on both,
//! labels the boxes, extracts features, builds a model from the training
//! digits and classifies the test digits. A second feature strategy can
//! be run alongside the first; its probabilities are then fused with the
//! first's by sum and product.
//!
//! Samples whose features cannot be extracted (`OutOfBounds`) are logged
//! and excluded; every other error aborts the run.

use crate::classify::{
    ClassModel, ClassificationResult, Classifier, ClassifierMode, LabelMap, LabeledSample,
    NUM_CLASSES, Probabilities, build_model,
};
use crate::combine::{combine_product, combine_sum};
use crate::evaluate::{RecognitionStats, RecognitionTable, recognition_table};
use crate::features::{DEFAULT_INK_THRESHOLD, FeatureStrategy, FeatureVector, extract_features};
use crate::locate::{LocateOptions, locate_digits};
use crate::serial::{
    write_labels_json, write_probabilities_json, write_recognition_csv, write_vectors_json,
};
use crate::{RecogError, RecogResult};
use digitrec_core::{Boxa, Pix};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Where to write artifacts; unset paths are skipped.
///
/// Probability files hold one row per test box in box order. Boxes a
/// strategy excluded get the zero vector, which reads back as no match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    /// Model vectors (centroids or pool) of the primary strategy
    pub vectors_json: Option<PathBuf>,
    /// Labels of the pool vectors (k-NN only)
    pub pool_labels_json: Option<PathBuf>,
    /// Test probabilities of the primary strategy
    pub probabilities_json: Option<PathBuf>,
    /// Test probabilities of the fusion strategy
    pub fusion_probabilities_json: Option<PathBuf>,
    /// Sum-fused test probabilities
    pub sum_json: Option<PathBuf>,
    /// Product-fused test probabilities
    pub product_json: Option<PathBuf>,
    /// Per-class recognition table
    pub recognition_csv: Option<PathBuf>,
    /// Training sheet with located boxes drawn in
    pub annotated_training: Option<PathBuf>,
    /// Test sheet with located boxes drawn in
    pub annotated_test: Option<PathBuf>,
}

/// Configuration of a recognition run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sheet of labeled training digits
    pub training_image: PathBuf,
    /// Sheet of test digits
    pub test_image: PathBuf,
    /// Training boxes per class, for positional labeling
    pub samples_per_class: usize,
    /// Test boxes per class, for positional labeling
    pub test_samples_per_class: usize,
    /// Explicit training labels in box order (overrides positional)
    pub training_labels: Option<Vec<u8>>,
    /// Explicit test labels in box order (overrides positional)
    pub test_labels: Option<Vec<u8>>,
    /// Digit location options
    pub locate: LocateOptions,
    /// Gray level below which a pixel counts as ink for features
    pub ink_threshold: u8,
    /// Primary feature strategy
    pub strategy: FeatureStrategy,
    /// Optional second strategy, fused with the primary one
    pub fusion: Option<FeatureStrategy>,
    /// Classifier mode (centroid or k-NN with its K)
    pub mode: ClassifierMode,
    /// Artifact outputs
    pub output: OutputPaths,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            training_image: PathBuf::from("app.tif"),
            test_image: PathBuf::from("test.tif"),
            samples_per_class: 20,
            test_samples_per_class: 10,
            training_labels: None,
            test_labels: None,
            locate: LocateOptions::default(),
            ink_threshold: DEFAULT_INK_THRESHOLD,
            strategy: FeatureStrategy::default(),
            fusion: None,
            mode: ClassifierMode::default(),
            output: OutputPaths::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a config for the given sheets with default parameters
    pub fn new(training_image: impl Into<PathBuf>, test_image: impl Into<PathBuf>) -> Self {
        Self {
            training_image: training_image.into(),
            test_image: test_image.into(),
            ..Self::default()
        }
    }

    /// Set the primary feature strategy
    pub fn with_strategy(mut self, strategy: FeatureStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run a second strategy and fuse it with the primary one
    pub fn with_fusion(mut self, strategy: FeatureStrategy) -> Self {
        self.fusion = Some(strategy);
        self
    }

    /// Set the classifier mode
    pub fn with_mode(mut self, mode: ClassifierMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set positional labeling run lengths for training and test sheets
    pub fn with_samples_per_class(mut self, training: usize, test: usize) -> Self {
        self.samples_per_class = training;
        self.test_samples_per_class = test;
        self
    }

    /// Set the feature ink threshold
    pub fn with_ink_threshold(mut self, threshold: u8) -> Self {
        self.ink_threshold = threshold;
        self
    }

    /// Set the artifact outputs
    pub fn with_output(mut self, output: OutputPaths) -> Self {
        self.output = output;
        self
    }

    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RecogResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameters that cannot produce a run
    pub fn validate(&self) -> RecogResult<()> {
        self.strategy.validate()?;
        if let Some(f) = &self.fusion {
            f.validate()?;
        }
        if self.training_labels.is_none() && self.samples_per_class == 0 {
            return Err(RecogError::InvalidParameter(
                "samples_per_class must be positive".to_string(),
            ));
        }
        if self.test_labels.is_none() && self.test_samples_per_class == 0 {
            return Err(RecogError::InvalidParameter(
                "test_samples_per_class must be positive".to_string(),
            ));
        }
        if self.ink_threshold == 0 {
            return Err(RecogError::InvalidParameter(
                "ink_threshold 0 marks no pixel as ink".to_string(),
            ));
        }
        if let ClassifierMode::Knn { k: 0 } = self.mode {
            return Err(RecogError::InvalidParameter("k must be positive".to_string()));
        }
        Ok(())
    }

    fn label_map(
        &self,
        explicit: &Option<Vec<u8>>,
        n_boxes: usize,
        per_class: usize,
    ) -> RecogResult<LabelMap> {
        let map = match explicit {
            Some(labels) => LabelMap::new(labels.clone())?,
            None => LabelMap::positional(n_boxes, per_class)?,
        };
        map.check_boxes(n_boxes)?;
        Ok(map)
    }
}

/// Outcome of one feature strategy
#[derive(Debug, Clone)]
pub struct StrategyReport {
    pub strategy: FeatureStrategy,
    pub model: ClassModel,
    /// Training boxes excluded by feature extraction
    pub excluded_training: Vec<usize>,
    /// Classification per test box; `None` if the box was excluded
    pub results: Vec<Option<ClassificationResult>>,
    /// Recognition counts over the classified test boxes
    pub stats: RecognitionStats,
}

/// Outcome of a recognition run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub training_boxes: Boxa,
    pub test_boxes: Boxa,
    pub training_labels: LabelMap,
    pub test_labels: LabelMap,
    pub primary: StrategyReport,
    pub fusion: Option<StrategyReport>,
    /// Sum-fused probabilities, one row per test box; the zero vector
    /// where either strategy excluded the box
    pub sum: Option<Vec<Probabilities>>,
    /// Product-fused probabilities, laid out like `sum`
    pub product: Option<Vec<Probabilities>>,
    /// Recognition percentages per class and method
    pub table: RecognitionTable,
}

/// Run the full pipeline described by `config`.
#[instrument(skip(config), fields(training = %config.training_image.display(), test = %config.test_image.display()))]
pub fn run_pipeline(config: &PipelineConfig) -> RecogResult<PipelineReport> {
    config.validate()?;

    let training = digitrec_io::read_grayscale(&config.training_image)?;
    let test = digitrec_io::read_grayscale(&config.test_image)?;

    let training_boxes = locate_digits(&training, &config.locate)?;
    let test_boxes = locate_digits(&test, &config.locate)?;
    info!(
        training = training_boxes.len(),
        test = test_boxes.len(),
        "located digits"
    );

    if let Some(path) = &config.output.annotated_training {
        digitrec_io::save_annotated_image(path, &training, &training_boxes)?;
    }
    if let Some(path) = &config.output.annotated_test {
        digitrec_io::save_annotated_image(path, &test, &test_boxes)?;
    }

    let training_labels = config.label_map(
        &config.training_labels,
        training_boxes.len(),
        config.samples_per_class,
    )?;
    let test_labels = config.label_map(
        &config.test_labels,
        test_boxes.len(),
        config.test_samples_per_class,
    )?;

    let sheets = Sheets {
        training: &training,
        training_boxes: &training_boxes,
        training_labels: &training_labels,
        test: &test,
        test_boxes: &test_boxes,
        test_labels: &test_labels,
        ink_threshold: config.ink_threshold,
        mode: config.mode,
    };

    let primary = run_strategy(&sheets, config.strategy)?;
    let fusion = config
        .fusion
        .map(|strategy| run_strategy(&sheets, strategy))
        .transpose()?;

    let (table, sum, product) = match &fusion {
        None => {
            let (_, probs, labels) = aligned(&[&primary], &test_labels)?;
            let table = recognition_table(&[(method_name(config.strategy), &probs[0][..])], &labels)?;
            (table, None, None)
        }
        Some(second) => {
            let (common, probs, labels) = aligned(&[&primary, second], &test_labels)?;
            let sum = combine_sum(&probs[0], &probs[1])?;
            let product = combine_product(&probs[0], &probs[1])?;
            let table = recognition_table(
                &[
                    (method_name(primary.strategy), &probs[0][..]),
                    (method_name(second.strategy), &probs[1][..]),
                    ("sum", &sum[..]),
                    ("product", &product[..]),
                ],
                &labels,
            )?;
            let n = test_boxes.len();
            (
                table,
                Some(scatter(&common, &sum, n)),
                Some(scatter(&common, &product, n)),
            )
        }
    };

    let report = PipelineReport {
        training_boxes,
        test_boxes,
        training_labels,
        test_labels,
        primary,
        fusion,
        sum,
        product,
        table,
    };
    write_artifacts(&config.output, &report)?;

    info!(
        recognized = report.primary.stats.recognized(),
        samples = report.primary.stats.samples(),
        rate = report.primary.stats.rate(),
        "pipeline finished"
    );
    Ok(report)
}

struct Sheets<'a> {
    training: &'a Pix,
    training_boxes: &'a Boxa,
    training_labels: &'a LabelMap,
    test: &'a Pix,
    test_boxes: &'a Boxa,
    test_labels: &'a LabelMap,
    ink_threshold: u8,
    mode: ClassifierMode,
}

fn method_name(strategy: FeatureStrategy) -> &'static str {
    match strategy {
        FeatureStrategy::Profile { .. } => "profile",
        FeatureStrategy::Zoning { .. } => "zoning",
    }
}

/// Features per box; `None` where extraction ran out of bounds
fn extract_all(
    pix: &Pix,
    boxes: &Boxa,
    strategy: FeatureStrategy,
    ink_threshold: u8,
    sheet: &str,
) -> RecogResult<Vec<Option<FeatureVector>>> {
    boxes
        .iter()
        .enumerate()
        .map(|(i, b)| match extract_features(pix, b, &strategy, ink_threshold) {
            Ok(fv) => Ok(Some(fv)),
            Err(e @ RecogError::OutOfBounds { .. }) => {
                warn!(sheet, index = i, error = %e, "excluding sample");
                Ok(None)
            }
            Err(e) => Err(e),
        })
        .collect()
}

fn run_strategy(sheets: &Sheets<'_>, strategy: FeatureStrategy) -> RecogResult<StrategyReport> {
    let training = extract_all(
        sheets.training,
        sheets.training_boxes,
        strategy,
        sheets.ink_threshold,
        "training",
    )?;
    let mut samples = Vec::with_capacity(training.len());
    let mut excluded_training = Vec::new();
    for (i, fv) in training.into_iter().enumerate() {
        match (fv, sheets.training_labels.get(i)) {
            (Some(fv), Some(label)) => samples.push(LabeledSample::new(label, fv)?),
            _ => excluded_training.push(i),
        }
    }
    let model = build_model(&samples, sheets.mode)?;

    let test = extract_all(
        sheets.test,
        sheets.test_boxes,
        strategy,
        sheets.ink_threshold,
        "test",
    )?;
    let results = test
        .iter()
        .map(|fv| fv.as_ref().map(|v| model.classify(v)).transpose())
        .collect::<RecogResult<Vec<_>>>()?;

    let mut probs = Vec::new();
    let mut labels = Vec::new();
    for (i, r) in results.iter().enumerate() {
        if let (Some(r), Some(label)) = (r, sheets.test_labels.get(i)) {
            probs.push(r.probabilities);
            labels.push(label);
        }
    }
    let stats = RecognitionStats::from_probabilities(&probs, &LabelMap::new(labels)?)?;
    info!(
        method = method_name(strategy),
        recognized = stats.recognized(),
        samples = stats.samples(),
        "classified test digits"
    );

    Ok(StrategyReport {
        strategy,
        model,
        excluded_training,
        results,
        stats,
    })
}

/// Probabilities of every strategy restricted to the test boxes all of
/// them classified, with those box indices and the matching labels.
fn aligned(
    reports: &[&StrategyReport],
    labels: &LabelMap,
) -> RecogResult<(Vec<usize>, Vec<Vec<Probabilities>>, LabelMap)> {
    let n = labels.len();
    let common: Vec<usize> = (0..n)
        .filter(|&i| {
            reports
                .iter()
                .all(|r| r.results.get(i).is_some_and(Option::is_some))
        })
        .collect();
    let probs = reports
        .iter()
        .map(|r| {
            common
                .iter()
                .filter_map(|&i| r.results[i].as_ref().map(|c| c.probabilities))
                .collect()
        })
        .collect();
    let kept = LabelMap::new(common.iter().filter_map(|&i| labels.get(i)).collect())?;
    Ok((common, probs, kept))
}

fn write_artifacts(output: &OutputPaths, report: &PipelineReport) -> RecogResult<()> {
    if let Some(path) = &output.vectors_json {
        write_vectors_json(path, &report.primary.model.vectors())?;
    }
    if let (Some(path), Some(labels)) = (
        &output.pool_labels_json,
        report.primary.model.pool_labels(),
    ) {
        write_labels_json(path, &labels)?;
    }
    if let Some(path) = &output.probabilities_json {
        write_probabilities_json(path, &per_box(&report.primary))?;
    }
    if let (Some(path), Some(fusion)) = (&output.fusion_probabilities_json, &report.fusion) {
        write_probabilities_json(path, &per_box(fusion))?;
    }
    if let (Some(path), Some(sum)) = (&output.sum_json, &report.sum) {
        write_probabilities_json(path, sum)?;
    }
    if let (Some(path), Some(product)) = (&output.product_json, &report.product) {
        write_probabilities_json(path, product)?;
    }
    if let Some(path) = &output.recognition_csv {
        write_recognition_csv(path, &report.table)?;
    }
    Ok(())
}

/// One row per test box, the zero vector for excluded boxes
fn per_box(report: &StrategyReport) -> Vec<Probabilities> {
    report
        .results
        .iter()
        .map(|r| r.as_ref().map_or([0.0; NUM_CLASSES], |c| c.probabilities))
        .collect()
}

/// Spread rows computed for `indices` back over `n` boxes
fn scatter(indices: &[usize], rows: &[Probabilities], n: usize) -> Vec<Probabilities> {
    let mut out = vec![[0.0; NUM_CLASSES]; n];
    for (&i, row) in indices.iter().zip(rows) {
        if let Some(slot) = out.get_mut(i) {
            *slot = *row;
        }
    }
    out
}
