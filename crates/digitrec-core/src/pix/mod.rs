//! PIX - The main image container
//!
//! The `Pix` structure is the image type shared by every digitrec crate.
//! It holds 1, 8 or 32 bpp samples in row-major order.
//!
//! # Pixel layout
//!
//! - One 32-bit word per pixel, rows stored top to bottom
//! - 1 bpp: `1` is foreground (ink), `0` is background
//! - 8 bpp: gray level, `0` is black
//! - 32 bpp: `0xRRGGBBAA` (red in MSB)
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `PixMut` via [`Pix::try_into_mut`]
//! or [`Pix::to_mut`], then convert back with `Into<Pix>`.

mod access;
mod clip;
mod convert;
pub mod graphics;
mod projection;

pub use graphics::Color;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image
    Bit1 = 1,
    /// 8-bit grayscale
    Bit8 = 8,
    /// 32-bit RGB
    Bit32 = 32,
}

impl PixelDepth {
    /// Create `PixelDepth` from a raw bit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] if `bits` is not 1, 8, or 32.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(PixelDepth::Bit1),
            8 => Ok(PixelDepth::Bit8),
            32 => Ok(PixelDepth::Bit32),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    /// Get the number of bits per pixel.
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Get the maximum pixel value representable at this depth.
    pub fn max_value(self) -> u32 {
        match self {
            PixelDepth::Bit32 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }
}

/// Internal PIX data
#[derive(Debug, Clone)]
struct PixData {
    width: u32,
    height: u32,
    depth: PixelDepth,
    data: Vec<u32>,
}

/// PIX - Main image container
///
/// # Examples
///
/// ```
/// use digitrec_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(640, 480, PixelDepth::Bit8).unwrap();
/// assert_eq!(pix.width(), 640);
/// assert_eq!(pix.height(), 480);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new PIX with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let data = vec![0u32; width as usize * height as usize];
        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                data,
            }),
        })
    }

    /// Create a PIX from row-major sample values.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero, if `data` does not hold
    /// exactly `width * height` samples, or if a sample exceeds the depth.
    pub fn from_data(width: u32, height: u32, depth: PixelDepth, data: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "expected {} samples for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        let max = depth.max_value();
        if let Some(bad) = data.iter().find(|&&v| v > max) {
            return Err(Error::InvalidParameter(format!(
                "sample value {} exceeds {} bpp maximum {}",
                bad,
                depth.bits(),
                max
            )));
        }
        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                data,
            }),
        })
    }

    /// Create an 8 bpp PIX from a slice of gray rows.
    ///
    /// All rows must have the same, non-zero length.
    pub fn from_gray_rows(rows: &[&[u8]]) -> Result<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        if rows.iter().any(|r| r.len() as u32 != width) {
            return Err(Error::InvalidParameter(
                "gray rows must all have the same length".to_string(),
            ));
        }
        let data = rows
            .iter()
            .flat_map(|r| r.iter().map(|&v| v as u32))
            .collect();
        Self::from_data(width, height, PixelDepth::Bit8, data)
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the raw sample data (row-major).
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get one row of samples.
    ///
    /// Returns `None` if `y` is out of bounds.
    pub fn row(&self, y: u32) -> Option<&[u32]> {
        if y >= self.height() {
            return None;
        }
        let w = self.width() as usize;
        let start = y as usize * w;
        Some(&self.inner.data[start..start + w])
    }

    /// Check whether two images share dimensions and depth.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.depth() == other.depth()
    }

    /// Try to convert into a mutable PIX without copying.
    ///
    /// Succeeds only if this is the sole reference to the data;
    /// otherwise the original `Pix` is returned unchanged.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Pix> {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => Ok(PixMut { inner }),
            Err(inner) => Err(Pix { inner }),
        }
    }

    /// Create a mutable deep copy of this PIX.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: (*self.inner).clone(),
        }
    }
}

/// Mutable PIX
///
/// Obtained from [`Pix::try_into_mut`] or [`Pix::to_mut`]; converted back
/// with `Into<Pix>` once editing is finished.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Set every pixel to `val`.
    pub fn set_all(&mut self, val: u32) {
        self.inner.data.fill(val);
    }
}

impl From<PixMut> for Pix {
    fn from(pix: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pix_new() {
        let pix = Pix::new(10, 5, PixelDepth::Bit8).unwrap();
        assert_eq!(pix.width(), 10);
        assert_eq!(pix.height(), 5);
        assert_eq!(pix.depth(), PixelDepth::Bit8);
        assert!(pix.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_pix_new_zero_dimension() {
        assert!(Pix::new(0, 5, PixelDepth::Bit8).is_err());
        assert!(Pix::new(5, 0, PixelDepth::Bit1).is_err());
    }

    #[test]
    fn test_from_data_validation() {
        assert!(Pix::from_data(2, 2, PixelDepth::Bit8, vec![0, 1, 2]).is_err());
        assert!(Pix::from_data(2, 1, PixelDepth::Bit1, vec![0, 2]).is_err());
        let pix = Pix::from_data(2, 1, PixelDepth::Bit1, vec![0, 1]).unwrap();
        assert_eq!(pix.row(0).unwrap(), &[0, 1]);
        assert!(pix.row(1).is_none());
    }

    #[test]
    fn test_from_gray_rows() {
        let pix = Pix::from_gray_rows(&[&[1, 2, 3], &[4, 5, 6]]).unwrap();
        assert_eq!(pix.width(), 3);
        assert_eq!(pix.height(), 2);
        assert_eq!(pix.row(1).unwrap(), &[4, 5, 6]);
        assert!(Pix::from_gray_rows(&[&[1, 2], &[3]]).is_err());
    }

    #[test]
    fn test_mut_roundtrip() {
        let pix = Pix::new(3, 3, PixelDepth::Bit8).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_all(7);
        let pix: Pix = pm.into();
        assert!(pix.data().iter().all(|&v| v == 7));

        let shared = pix.clone();
        let back = pix.try_into_mut();
        assert!(back.is_err());
        drop(shared);
    }

    #[test]
    fn test_depth_from_bits() {
        assert_eq!(PixelDepth::from_bits(8).unwrap(), PixelDepth::Bit8);
        assert!(PixelDepth::from_bits(4).is_err());
        assert_eq!(PixelDepth::Bit1.max_value(), 1);
        assert_eq!(PixelDepth::Bit8.max_value(), 255);
    }
}
