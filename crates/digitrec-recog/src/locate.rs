//! Digit location by recursive projection
//!
//! The locator splits a scanned sheet into row bands using the row
//! projection, splits each band into column spans using the column
//! projection of that band, and then trims each span vertically to its
//! own ink. No connected-component analysis is involved, so touching or
//! skewed digits are not separated.
//!
//! Box order is band order (top to bottom), then span order (left to
//! right). Positional labeling relies on this order.

use crate::ranges::{Range, extract_ranges};
use crate::{RecogError, RecogResult};
use digitrec_core::{Box, Boxa, Pix, PixelDepth};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Options for digit location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocateOptions {
    /// Binarize 8 bpp input at this gray level before projecting
    /// (`v < threshold` is ink). `None` projects the inverted gray
    /// values directly, so any non-white pixel counts (default).
    pub ink_threshold: Option<u8>,
}

impl LocateOptions {
    /// Binarize at `threshold` before projecting
    pub fn with_ink_threshold(mut self, threshold: u8) -> Self {
        self.ink_threshold = Some(threshold);
        self
    }
}

/// Turn a scan into a foreground image where ink carries the high values.
///
/// 1 bpp input is taken as already binarized (1 = ink). 32 bpp input is
/// reduced to gray first.
pub fn foreground(pix: &Pix, options: &LocateOptions) -> RecogResult<Pix> {
    let gray = match pix.depth() {
        PixelDepth::Bit1 => return Ok(pix.clone()),
        PixelDepth::Bit8 => pix.clone(),
        PixelDepth::Bit32 => pix.convert_to_8()?,
    };
    let fg = match options.ink_threshold {
        Some(t) => gray.threshold_to_binary(t)?,
        None => gray.invert()?,
    };
    Ok(fg)
}

/// Locate digit bounding boxes on a scanned sheet.
///
/// # Errors
///
/// Returns [`RecogError::Segmentation`] if a band/span cell holds no ink
/// to trim to.
#[instrument(level = "debug", skip(pix), fields(width = pix.width(), height = pix.height()))]
pub fn locate_digits(pix: &Pix, options: &LocateOptions) -> RecogResult<Boxa> {
    let fg = foreground(pix, options)?;
    let rows = fg.row_sums()?;
    let bands = extract_ranges(rows.as_slice());
    debug!(bands = bands.len(), "row bands");

    let mut boxa = Boxa::new();
    for band in bands {
        let band_box = span_box(Range { start: 0, end: fg.width() as usize }, band)?;
        let cols = fg.column_sums_in_box(&band_box)?;
        let spans = extract_ranges(cols.as_slice());
        debug!(top = band.start, bottom = band.end, spans = spans.len(), "band");

        for span in spans {
            let cell = span_box(span, band)?;
            boxa.push(trim_vertically(&fg, &cell)?);
        }
    }

    info!(digits = boxa.len(), "located digits");
    Ok(boxa)
}

/// Box covering `cols` x `rows`
fn span_box(cols: Range, rows: Range) -> RecogResult<Box> {
    Ok(Box::from_corners(
        cols.start as i32,
        rows.start as i32,
        cols.end as i32,
        rows.end as i32,
    )?)
}

/// Shrink a cell to its first and last ink rows.
fn trim_vertically(fg: &Pix, cell: &Box) -> RecogResult<Box> {
    let rows = fg.row_sums_in_box(cell)?;
    let ink = rows.as_slice();
    let top = ink.iter().position(|&v| v != 0.0);
    let last = ink.iter().rposition(|&v| v != 0.0);
    match (top, last) {
        (Some(top), Some(last)) => Ok(Box::from_corners(
            cell.x,
            cell.y + top as i32,
            cell.right(),
            cell.y + last as i32 + 1,
        )?),
        _ => Err(RecogError::Segmentation {
            region: *cell,
            message: "no ink rows to trim to".to_string(),
        }),
    }
}
