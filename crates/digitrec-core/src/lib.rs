//! digitrec-core - Basic data structures for digit image processing
//!
//! This crate provides the fundamental data structures used throughout
//! the digitrec workspace:
//!
//! - [`Pix`] / [`PixMut`] - The image container (immutable / mutable)
//! - [`Box`] / [`Boxa`] - Rectangle regions
//! - [`Numa`] - Numeric arrays, used for row and column projections
//!
//! # Example
//!
//! ```
//! use digitrec_core::{Pix, PixelDepth};
//!
//! let pix = Pix::new(20, 10, PixelDepth::Bit8).unwrap();
//! let rows = pix.row_sums().unwrap();
//! assert_eq!(rows.len(), 10);
//! ```

pub mod box_;
pub mod error;
pub mod numa;
pub mod pix;

pub use box_::{Box, Boxa};
pub use error::{Error, Result};
pub use numa::Numa;
pub use pix::{Color, Pix, PixMut, PixelDepth};

/// Helpers for 32-bit RGB pixels.
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Compose a 32-bit RGB pixel (alpha = 255).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << RED_SHIFT) | ((g as u32) << GREEN_SHIFT) | ((b as u32) << BLUE_SHIFT) | 255
    }

    /// Extract RGB values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// Luminance of an RGB triple, rounded to the nearest gray level.
    ///
    /// Uses the ITU-R BT.601 weights.
    #[inline]
    pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
        let l = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        (l + 0.5).min(255.0) as u8
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_compose_and_extract() {
            let p = compose_rgb(10, 20, 30);
            assert_eq!(extract_rgb(p), (10, 20, 30));
            assert_eq!(p & 0xff, 255);
        }

        #[test]
        fn test_luminance_extremes() {
            assert_eq!(luminance(0, 0, 0), 0);
            assert_eq!(luminance(255, 255, 255), 255);
            assert_eq!(luminance(128, 128, 128), 128);
        }
    }
}
