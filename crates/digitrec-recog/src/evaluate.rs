//! Recognition bookkeeping
//!
//! Counts how many test samples each method recognizes per class, and
//! lays the counts out as a table (rows = true class, columns = method).

use crate::classify::{NUM_CLASSES, Probabilities, argmax};
use crate::classify::model::LabelMap;
use crate::{RecogError, RecogResult};
use serde::Serialize;

/// Whether the most probable class of `probs` is `label`
pub fn recognized(probs: &Probabilities, label: u8) -> bool {
    argmax(probs) == Some(label)
}

/// Per-class recognition counts of one method
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RecognitionStats {
    /// Recognized samples per true class
    pub success: [usize; NUM_CLASSES],
    /// Samples per true class
    pub total: [usize; NUM_CLASSES],
}

impl RecognitionStats {
    /// Score probability vectors against their true labels.
    ///
    /// # Errors
    ///
    /// `InvalidLabel` if there is not one label per vector.
    pub fn from_probabilities(probs: &[Probabilities], labels: &LabelMap) -> RecogResult<Self> {
        labels.check_boxes(probs.len())?;
        let mut stats = Self::default();
        for (p, &label) in probs.iter().zip(labels.labels()) {
            let c = label as usize;
            stats.total[c] += 1;
            if recognized(p, label) {
                stats.success[c] += 1;
            }
        }
        Ok(stats)
    }

    /// Recognized samples over all classes
    pub fn recognized(&self) -> usize {
        self.success.iter().sum()
    }

    /// Samples over all classes
    pub fn samples(&self) -> usize {
        self.total.iter().sum()
    }

    /// Overall recognition rate in `[0, 1]` (0 without samples)
    pub fn rate(&self) -> f64 {
        ratio(self.recognized(), self.samples())
    }

    /// Recognition rate of one class in `[0, 1]`
    pub fn class_rate(&self, class: u8) -> f64 {
        let c = class as usize;
        match (self.success.get(c), self.total.get(c)) {
            (Some(&s), Some(&t)) => ratio(s, t),
            _ => 0.0,
        }
    }
}

fn ratio(n: usize, d: usize) -> f64 {
    if d == 0 { 0.0 } else { n as f64 / d as f64 }
}

/// Recognition percentages, rows = true class, columns = method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionTable {
    pub methods: Vec<String>,
    /// `NUM_CLASSES` rows of `methods.len()` percentages
    pub rows: Vec<Vec<f64>>,
}

/// Build the per-class recognition table for several methods.
pub fn recognition_table(
    methods: &[(&str, &[Probabilities])],
    labels: &LabelMap,
) -> RecogResult<RecognitionTable> {
    if methods.is_empty() {
        return Err(RecogError::InvalidParameter(
            "recognition table needs at least one method".to_string(),
        ));
    }
    let stats = methods
        .iter()
        .map(|(_, probs)| RecognitionStats::from_probabilities(probs, labels))
        .collect::<RecogResult<Vec<_>>>()?;
    let rows = (0..NUM_CLASSES as u8)
        .map(|c| stats.iter().map(|s| s.class_rate(c) * 100.0).collect())
        .collect();
    Ok(RecognitionTable {
        methods: methods.iter().map(|(name, _)| name.to_string()).collect(),
        rows,
    })
}
