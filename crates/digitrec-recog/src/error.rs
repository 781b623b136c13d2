//! Error types for digitrec-recog

use digitrec_core::Box;
use thiserror::Error;

/// Which edge a profile scan started from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSide {
    Left,
    Right,
}

impl std::fmt::Display for ScanSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanSide::Left => f.write_str("left"),
            ScanSide::Right => f.write_str("right"),
        }
    }
}

/// Errors that can occur during segmentation, feature extraction and classification
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] digitrec_core::Error),

    /// Image I/O error
    #[error("io error: {0}")]
    Io(#[from] digitrec_io::IoError),

    /// A band/span could not be trimmed to a valid digit box
    #[error("segmentation error in region {region:?}: {message}")]
    Segmentation { region: Box, message: String },

    /// A profile scan reached the image edge without meeting ink
    #[error("profile scan from the {side} ran out of bounds on row {row} (width {width})")]
    OutOfBounds { row: u32, side: ScanSide, width: u32 },

    /// Feature vectors of different lengths met
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A class label outside 0..=9, or a label list that does not fit the boxes
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// A model was built from, or queried with, no training data
    #[error("empty model: {0}")]
    EmptyModel(String),

    /// JSON (de)serialization of an artifact failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error while persisting an artifact
    #[error("file error: {0}")]
    File(#[from] std::io::Error),
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
