//! Zoning features
//!
//! The digit box is cut into a `vert_zones` x `hor_zones` grid with cell
//! size `ceil(H / vert_zones)` x `ceil(W / hor_zones)`. Each value is the
//! ink count of a cell over the nominal cell area, so cells clipped by
//! the image edge read lower than a full cell with the same ink.

use super::FeatureVector;
use crate::{RecogError, RecogResult};
use digitrec_core::{Pix, PixelDepth};

/// Zoning feature vector of a binarized digit (1 = ink), row-major.
pub fn zoning_features(digit: &Pix, vert_zones: u32, hor_zones: u32) -> RecogResult<FeatureVector> {
    if digit.depth() != PixelDepth::Bit1 {
        return Err(RecogError::InvalidParameter(format!(
            "zoning expects a 1 bpp digit, got {} bpp",
            digit.depth().bits()
        )));
    }
    if vert_zones == 0 || hor_zones == 0 {
        return Err(RecogError::InvalidParameter(format!(
            "zoning grid {}x{} is empty",
            vert_zones, hor_zones
        )));
    }

    let (w, h) = (digit.width(), digit.height());
    let cell_h = h.div_ceil(vert_zones);
    let cell_w = w.div_ceil(hor_zones);
    let area = (cell_h * cell_w) as f64;

    let mut values = Vec::with_capacity((vert_zones * hor_zones) as usize);
    for zy in 0..vert_zones {
        let (y0, y1) = ((zy * cell_h).min(h), ((zy + 1) * cell_h).min(h));
        for zx in 0..hor_zones {
            let (x0, x1) = ((zx * cell_w).min(w), ((zx + 1) * cell_w).min(w));
            let ink: usize = (y0..y1)
                .filter_map(|y| digit.row(y))
                .map(|row| row[x0 as usize..x1 as usize].iter().filter(|&&v| v != 0).count())
                .sum();
            values.push(ink as f64 / area);
        }
    }
    Ok(FeatureVector::new(values))
}
