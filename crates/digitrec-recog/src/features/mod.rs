//! Feature extraction
//!
//! A digit is cut out of the sheet by its bounding box, binarized, and
//! reduced to a fixed-length [`FeatureVector`] by one of two strategies:
//!
//! - [`profile`]: left/right margin widths on evenly spaced rows
//! - [`zoning`]: ink density per cell of a fixed grid
//!
//! Vectors are only comparable when produced by the same strategy with
//! the same parameters.

pub mod profile;
pub mod zoning;

pub use profile::profile_features;
pub use zoning::zoning_features;

use crate::{RecogError, RecogResult};
use digitrec_core::{Box, Pix, PixelDepth};
use serde::{Deserialize, Serialize};

/// Default gray level below which a pixel is ink
pub const DEFAULT_INK_THRESHOLD: u8 = 128;

/// Ordered feature values, each in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Wrap raw values
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no features
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Feature values
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Fail with `DimensionMismatch` unless both vectors have the same length
    pub fn check_len(&self, other: &FeatureVector) -> RecogResult<()> {
        if self.len() != other.len() {
            return Err(RecogError::DimensionMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl std::ops::Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Feature extraction strategy and its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FeatureStrategy {
    /// Left/right margins on `rows` sampled rows (length `2 * rows`)
    Profile { rows: u32 },
    /// Ink density on a `vert_zones` x `hor_zones` grid
    Zoning { vert_zones: u32, hor_zones: u32 },
}

impl Default for FeatureStrategy {
    fn default() -> Self {
        FeatureStrategy::Profile { rows: 20 }
    }
}

impl FeatureStrategy {
    /// Default zoning grid (8 x 8)
    pub fn zoning() -> Self {
        FeatureStrategy::Zoning {
            vert_zones: 8,
            hor_zones: 8,
        }
    }

    /// Length of the vectors this strategy produces
    pub fn vector_len(&self) -> usize {
        match *self {
            FeatureStrategy::Profile { rows } => 2 * rows as usize,
            FeatureStrategy::Zoning {
                vert_zones,
                hor_zones,
            } => vert_zones as usize * hor_zones as usize,
        }
    }

    /// Reject zero-sized parameters
    pub fn validate(&self) -> RecogResult<()> {
        match *self {
            FeatureStrategy::Profile { rows: 0 } => Err(RecogError::InvalidParameter(
                "profile needs at least one row".to_string(),
            )),
            FeatureStrategy::Zoning {
                vert_zones,
                hor_zones,
            } if vert_zones == 0 || hor_zones == 0 => Err(RecogError::InvalidParameter(format!(
                "zoning grid {}x{} is empty",
                vert_zones, hor_zones
            ))),
            _ => Ok(()),
        }
    }

    /// Extract features from an already isolated, binarized digit (1 = ink)
    pub fn apply(&self, digit: &Pix) -> RecogResult<FeatureVector> {
        match *self {
            FeatureStrategy::Profile { rows } => profile_features(digit, rows),
            FeatureStrategy::Zoning {
                vert_zones,
                hor_zones,
            } => zoning_features(digit, vert_zones, hor_zones),
        }
    }
}

/// Cut a digit out of a scan and binarize it (1 = ink).
///
/// 8 bpp pixels below `ink_threshold` are ink; 1 bpp input is taken as
/// already binarized.
pub fn isolate_digit(pix: &Pix, digit_box: &Box, ink_threshold: u8) -> RecogResult<Pix> {
    let clipped = pix.clip_box(digit_box)?;
    let binary = match clipped.depth() {
        PixelDepth::Bit1 => clipped,
        PixelDepth::Bit8 => clipped.threshold_to_binary(ink_threshold)?,
        PixelDepth::Bit32 => clipped.convert_to_8()?.threshold_to_binary(ink_threshold)?,
    };
    Ok(binary)
}

/// Extract the feature vector of the digit inside `digit_box`.
pub fn extract_features(
    pix: &Pix,
    digit_box: &Box,
    strategy: &FeatureStrategy,
    ink_threshold: u8,
) -> RecogResult<FeatureVector> {
    strategy.validate()?;
    let digit = isolate_digit(pix, digit_box, ink_threshold)?;
    strategy.apply(&digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_len() {
        assert_eq!(FeatureStrategy::default().vector_len(), 40);
        assert_eq!(FeatureStrategy::zoning().vector_len(), 64);
    }

    #[test]
    fn test_validate() {
        assert!(FeatureStrategy::Profile { rows: 0 }.validate().is_err());
        assert!(
            FeatureStrategy::Zoning {
                vert_zones: 3,
                hor_zones: 0
            }
            .validate()
            .is_err()
        );
        assert!(FeatureStrategy::zoning().validate().is_ok());
    }

    #[test]
    fn test_strategy_json() {
        let s: FeatureStrategy =
            serde_json::from_str(r#"{"kind":"zoning","vert_zones":4,"hor_zones":2}"#).unwrap();
        assert_eq!(
            s,
            FeatureStrategy::Zoning {
                vert_zones: 4,
                hor_zones: 2
            }
        );
        let fv: FeatureVector = serde_json::from_str("[0.5, 0.25]").unwrap();
        assert_eq!(fv.as_slice(), &[0.5, 0.25]);
    }

    #[test]
    fn test_isolate_digit_binarizes() {
        let pix = Pix::from_gray_rows(&[&[255, 0, 255], &[255, 200, 40]]).unwrap();
        let b = Box::new(1, 0, 2, 2).unwrap();
        let digit = isolate_digit(&pix, &b, 128).unwrap();
        assert_eq!(digit.depth(), PixelDepth::Bit1);
        assert_eq!(digit.data(), &[1, 0, 0, 1]);
    }

    #[test]
    fn test_check_len() {
        let a = FeatureVector::new(vec![0.0; 3]);
        let b = FeatureVector::new(vec![0.0; 4]);
        assert!(matches!(
            a.check_len(&b),
            Err(RecogError::DimensionMismatch {
                expected: 3,
                actual: 4
            })
        ));
    }
}
