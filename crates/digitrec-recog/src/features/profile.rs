//! Profile features
//!
//! On `rows` evenly spaced rows, measure how far the ink sits from the
//! left and right edges of the digit box. Values are margins divided by
//! the box width, interleaved as `row0-left, row0-right, row1-left, ...`.

use super::FeatureVector;
use crate::error::ScanSide;
use crate::{RecogError, RecogResult};
use digitrec_core::{Pix, PixelDepth};

/// Profile feature vector of a binarized digit (1 = ink).
///
/// Sample row `i` is `floor(i * height / rows)`.
///
/// # Errors
///
/// Returns [`RecogError::OutOfBounds`] if a sampled row holds no ink, so
/// the scan from an edge never stops.
pub fn profile_features(digit: &Pix, rows: u32) -> RecogResult<FeatureVector> {
    if digit.depth() != PixelDepth::Bit1 {
        return Err(RecogError::InvalidParameter(format!(
            "profile expects a 1 bpp digit, got {} bpp",
            digit.depth().bits()
        )));
    }
    if rows == 0 {
        return Err(RecogError::InvalidParameter(
            "profile needs at least one row".to_string(),
        ));
    }

    let width = digit.width();
    let row_height = digit.height() as f64 / rows as f64;
    let mut values = Vec::with_capacity(2 * rows as usize);
    for i in 0..rows {
        let y = (row_height * i as f64).floor() as u32;
        let row = digit.row(y).unwrap_or(&[]);
        let left = margin(row.iter(), y, ScanSide::Left, width)?;
        let right = margin(row.iter().rev(), y, ScanSide::Right, width)?;
        values.push(left as f64 / width as f64);
        values.push(right as f64 / width as f64);
    }
    Ok(FeatureVector::new(values))
}

/// Count paper pixels before the first ink pixel.
fn margin<'a>(
    mut pixels: impl Iterator<Item = &'a u32>,
    row: u32,
    side: ScanSide,
    width: u32,
) -> RecogResult<usize> {
    pixels
        .position(|&v| v != 0)
        .ok_or(RecogError::OutOfBounds { row, side, width })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(rows: &[&[u32]]) -> Pix {
        let w = rows[0].len() as u32;
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Pix::from_data(w, rows.len() as u32, PixelDepth::Bit1, data).unwrap()
    }

    #[test]
    fn test_margins_interleaved() {
        let digit = binary(&[&[0, 1, 0, 0], &[1, 1, 1, 1]]);
        let fv = profile_features(&digit, 2).unwrap();
        assert_eq!(fv.as_slice(), &[0.25, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_sample_rows_evenly_spaced() {
        // height 4, 2 rows -> samples rows 0 and 2
        let digit = binary(&[&[1, 0], &[0, 0], &[0, 1], &[0, 0]]);
        let fv = profile_features(&digit, 2).unwrap();
        assert_eq!(fv.as_slice(), &[0.0, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_row_without_ink_is_out_of_bounds() {
        let digit = binary(&[&[1, 1], &[0, 0]]);
        match profile_features(&digit, 2) {
            Err(RecogError::OutOfBounds { row, side, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(side, ScanSide::Left);
            }
            other => panic!("expected OutOfBounds, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_gray_input() {
        let gray = Pix::from_gray_rows(&[&[0, 255]]).unwrap();
        assert!(profile_features(&gray, 1).is_err());
    }
}
