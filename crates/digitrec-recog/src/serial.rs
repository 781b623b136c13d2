//! Persisted artifacts
//!
//! - class vectors: JSON array of arrays of floats (10 centroid slots in
//!   label order, `[]` for an untrained class, or a k-NN pool in sample order)
//! - pool labels: JSON array of class labels, one per pool vector
//! - probabilities: JSON array of arrays of 10 floats, one per test box
//! - recognition table: CSV, one row per class, one column per method

use crate::classify::{LabelMap, Probabilities};
use crate::evaluate::RecognitionTable;
use crate::features::FeatureVector;
use crate::RecogResult;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> RecogResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    debug!(path = %path.display(), "wrote json artifact");
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> RecogResult<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write feature vectors as a JSON array of arrays
pub fn write_vectors_json<P: AsRef<Path>>(path: P, vectors: &[FeatureVector]) -> RecogResult<()> {
    write_json(path.as_ref(), vectors)
}

/// Read feature vectors written by [`write_vectors_json`]
pub fn read_vectors_json<P: AsRef<Path>>(path: P) -> RecogResult<Vec<FeatureVector>> {
    read_json(path.as_ref())
}

/// Write class labels as a JSON array
pub fn write_labels_json<P: AsRef<Path>>(path: P, labels: &LabelMap) -> RecogResult<()> {
    write_json(path.as_ref(), labels)
}

/// Read labels written by [`write_labels_json`]; every label must be a digit
pub fn read_labels_json<P: AsRef<Path>>(path: P) -> RecogResult<LabelMap> {
    let raw: Vec<u8> = read_json(path.as_ref())?;
    LabelMap::new(raw)
}

/// Write per-sample probability vectors as a JSON array of arrays of 10 floats
pub fn write_probabilities_json<P: AsRef<Path>>(
    path: P,
    probabilities: &[Probabilities],
) -> RecogResult<()> {
    write_json(path.as_ref(), probabilities)
}

/// Read probability vectors written by [`write_probabilities_json`]
pub fn read_probabilities_json<P: AsRef<Path>>(path: P) -> RecogResult<Vec<Probabilities>> {
    read_json(path.as_ref())
}

/// Render a recognition table as CSV: no header, one row per class
pub fn recognition_csv(table: &RecognitionTable) -> String {
    let mut out = String::new();
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Write a recognition table as CSV
pub fn write_recognition_csv<P: AsRef<Path>>(path: P, table: &RecognitionTable) -> RecogResult<()> {
    std::fs::write(path.as_ref(), recognition_csv(table))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_layout() {
        let table = RecognitionTable {
            methods: vec!["profile".to_string(), "zoning".to_string()],
            rows: vec![vec![100.0, 90.0], vec![50.0, 0.0]],
        };
        assert_eq!(recognition_csv(&table), "100,90\n50,0\n");
    }

    #[test]
    fn test_vectors_json_shape() {
        let v = vec![FeatureVector::new(vec![0.5, 1.0])];
        assert_eq!(serde_json::to_string(&v).unwrap(), "[[0.5,1.0]]");
        let labels = LabelMap::new(vec![3, 0]).unwrap();
        assert_eq!(serde_json::to_string(&labels).unwrap(), "[3,0]");
    }
}
