//! Synthetic digit sheets
//!
//! Builds 8 bpp "scans" (dark ink 0 on white paper 255) so that tests do
//! not depend on binary fixtures. Glyphs are seven-segment shapes: every
//! class is distinct, each glyph is a single run of columns, and every
//! glyph row holds ink. Unless jitter is disabled, samples of a class
//! alternate between two stroke widths.

use crate::TestResult;
use digitrec_core::{Pix, PixelDepth};

/// Paper value
pub const PAPER: u32 = 255;
/// Ink value
pub const INK: u32 = 0;

/// Segments lit for each digit, in `a b c d e f g` order.
const SEGMENTS: [[bool; 7]; 10] = [
    [true, true, true, true, true, true, false],
    [false, true, true, false, false, false, false],
    [true, true, false, true, true, false, true],
    [true, true, true, true, false, false, true],
    [false, true, true, false, false, true, true],
    [true, false, true, true, false, true, true],
    [true, false, true, true, true, true, true],
    [true, true, true, false, false, false, false],
    [true, true, true, true, true, true, true],
    [true, true, true, true, false, true, true],
];

/// Layout of a synthetic digit sheet
#[derive(Debug, Clone)]
pub struct SheetSpec {
    /// Classes drawn, one row per class, in this order
    pub classes: Vec<u8>,
    /// Glyphs per row
    pub samples_per_class: u32,
    /// Base glyph width
    pub glyph_width: u32,
    /// Base glyph height
    pub glyph_height: u32,
    /// Stroke thickness
    pub stroke: u32,
    /// Paper gap between glyphs and around the sheet
    pub gap: u32,
    /// Draw odd samples one pixel bolder
    pub stroke_jitter: bool,
}

impl Default for SheetSpec {
    fn default() -> Self {
        Self {
            classes: (0..10).collect(),
            samples_per_class: 4,
            glyph_width: 10,
            glyph_height: 16,
            stroke: 2,
            gap: 5,
            stroke_jitter: true,
        }
    }
}

impl SheetSpec {
    /// Set the number of glyphs per class
    pub fn with_samples_per_class(mut self, n: u32) -> Self {
        self.samples_per_class = n;
        self
    }

    /// Set the classes drawn (one row each)
    pub fn with_classes(mut self, classes: Vec<u8>) -> Self {
        self.classes = classes;
        self
    }

    /// Draw every sample of a class identically
    pub fn without_jitter(mut self) -> Self {
        self.stroke_jitter = false;
        self
    }

    fn stroke_of(&self, sample: u32) -> u32 {
        if self.stroke_jitter {
            self.stroke + sample % 2
        } else {
            self.stroke
        }
    }

    /// Sheet width and height in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        let w = self.gap + self.samples_per_class * (self.glyph_width + self.gap);
        let h = self.gap + self.classes.len() as u32 * (self.glyph_height + self.gap);
        (w, h)
    }
}

/// White 8 bpp page
pub fn blank_page(width: u32, height: u32) -> TestResult<Pix> {
    let mut pm = Pix::new(width, height, PixelDepth::Bit8)?.to_mut();
    pm.set_all(PAPER);
    Ok(pm.into())
}

/// White page with one ink rectangle covering `[x, x + w) x [y, y + h)`
pub fn filled_rect(width: u32, height: u32, x: u32, y: u32, w: u32, h: u32) -> TestResult<Pix> {
    let mut pm = blank_page(width, height)?.to_mut();
    for yy in y..(y + h).min(height) {
        for xx in x..(x + w).min(width) {
            pm.set_pixel(xx, yy, INK)?;
        }
    }
    Ok(pm.into())
}

/// White page whose rows in `rows` are ink across the full width
pub fn ink_rows(width: u32, height: u32, rows: std::ops::Range<u32>) -> TestResult<Pix> {
    filled_rect(width, height, 0, rows.start, width, rows.end.saturating_sub(rows.start))
}

/// Draw the seven-segment glyph for `digit` with its top-left at `(x0, y0)`
fn draw_glyph(
    pm: &mut digitrec_core::PixMut,
    digit: u8,
    x0: u32,
    y0: u32,
    w: u32,
    h: u32,
    stroke: u32,
) -> TestResult<()> {
    let segs = SEGMENTS[digit as usize % 10];
    let mid = h / 2;
    let s = stroke;
    // (x, y, w, h) relative to the glyph origin
    let rects = [
        (0, 0, w, s),
        (w - s, 0, s, mid + 1),
        (w - s, mid - 1, s, h - mid + 1),
        (0, h - s, w, s),
        (0, mid - 1, s, h - mid + 1),
        (0, 0, s, mid + 1),
        (0, mid - 1, w, s),
    ];
    for (lit, (rx, ry, rw, rh)) in segs.iter().zip(rects) {
        if !lit {
            continue;
        }
        for yy in ry..ry + rh {
            for xx in rx..rx + rw {
                pm.set_pixel(x0 + xx, y0 + yy, INK)?;
            }
        }
    }
    Ok(())
}

/// Render a single glyph, tightly cropped, as an 8 bpp image
pub fn glyph(digit: u8, width: u32, height: u32, stroke: u32) -> TestResult<Pix> {
    let mut pm = blank_page(width, height)?.to_mut();
    draw_glyph(&mut pm, digit, 0, 0, width, height, stroke)?;
    Ok(pm.into())
}

/// Render a sheet: one row per class, `samples_per_class` glyphs per row.
///
/// Reading order (rows top to bottom, glyphs left to right) matches the
/// positional labeling convention.
pub fn digit_sheet(layout: &SheetSpec) -> TestResult<Pix> {
    let (width, height) = layout.dimensions();
    let mut pm = blank_page(width, height)?.to_mut();
    let row_pitch = layout.glyph_height + layout.gap;
    let col_pitch = layout.glyph_width + layout.gap;
    for (row, &digit) in layout.classes.iter().enumerate() {
        let y0 = layout.gap + row as u32 * row_pitch;
        for sample in 0..layout.samples_per_class {
            let x0 = layout.gap + sample * col_pitch;
            draw_glyph(
                &mut pm,
                digit,
                x0,
                y0,
                layout.glyph_width,
                layout.glyph_height,
                layout.stroke_of(sample),
            )?;
        }
    }
    Ok(pm.into())
}
