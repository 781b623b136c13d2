//! Row and column projections
//!
//! A projection reduces an image to a 1-D [`Numa`] by summing pixel values
//! along one axis. Row sums are index-aligned with `y`, column sums with `x`.

use super::{Pix, PixelDepth};
use crate::Numa;
use crate::box_::Box;
use crate::error::{Error, Result};

impl Pix {
    /// Sum of pixel values along each row (length = height).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for 32 bpp images.
    pub fn row_sums(&self) -> Result<Numa> {
        self.check_projectable()?;
        let mut na = Numa::with_capacity(self.height() as usize);
        for y in 0..self.height() {
            let sum: u64 = self.row(y).unwrap_or(&[]).iter().map(|&v| v as u64).sum();
            na.push(sum as f32);
        }
        Ok(na)
    }

    /// Sum of pixel values along each column (length = width).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for 32 bpp images.
    pub fn column_sums(&self) -> Result<Numa> {
        self.check_projectable()?;
        let mut sums = vec![0u64; self.width() as usize];
        for y in 0..self.height() {
            for (acc, &v) in sums.iter_mut().zip(self.row(y).unwrap_or(&[])) {
                *acc += v as u64;
            }
        }
        Ok(sums.into_iter().map(|s| s as f32).collect())
    }

    /// Row sums restricted to a rectangular region.
    ///
    /// The result has one entry per row of the region (clipped to the image).
    pub fn row_sums_in_box(&self, region: &Box) -> Result<Numa> {
        self.check_projectable()?;
        let (x0, y0, x1, y1) = self.clip_region(region)?;
        let mut na = Numa::with_capacity((y1 - y0) as usize);
        for y in y0..y1 {
            let row = self.row(y).unwrap_or(&[]);
            let sum: u64 = row[x0 as usize..x1 as usize].iter().map(|&v| v as u64).sum();
            na.push(sum as f32);
        }
        Ok(na)
    }

    /// Column sums restricted to a rectangular region.
    ///
    /// The result has one entry per column of the region (clipped to the image).
    pub fn column_sums_in_box(&self, region: &Box) -> Result<Numa> {
        self.check_projectable()?;
        let (x0, y0, x1, y1) = self.clip_region(region)?;
        let mut sums = vec![0u64; (x1 - x0) as usize];
        for y in y0..y1 {
            let row = self.row(y).unwrap_or(&[]);
            for (acc, &v) in sums.iter_mut().zip(&row[x0 as usize..x1 as usize]) {
                *acc += v as u64;
            }
        }
        Ok(sums.into_iter().map(|s| s as f32).collect())
    }

    fn check_projectable(&self) -> Result<()> {
        match self.depth() {
            PixelDepth::Bit1 | PixelDepth::Bit8 => Ok(()),
            d => Err(Error::UnsupportedDepth(d.bits())),
        }
    }

    /// Clip a region to the image, returning half-open `(x0, y0, x1, y1)`.
    fn clip_region(&self, region: &Box) -> Result<(u32, u32, u32, u32)> {
        let clipped = region
            .clip(self.width() as i32, self.height() as i32)
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "region {:?} does not intersect {}x{} image",
                    region,
                    self.width(),
                    self.height()
                ))
            })?;
        Ok((
            clipped.x as u32,
            clipped.y as u32,
            clipped.right() as u32,
            clipped.bottom() as u32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Pix {
        Pix::from_gray_rows(&[&[0, 10, 0], &[5, 5, 5], &[0, 0, 1]]).unwrap()
    }

    #[test]
    fn test_row_sums() {
        let na = sample().row_sums().unwrap();
        assert_eq!(na.as_slice(), &[10.0, 15.0, 1.0]);
    }

    #[test]
    fn test_column_sums() {
        let na = sample().column_sums().unwrap();
        assert_eq!(na.as_slice(), &[5.0, 15.0, 6.0]);
    }

    #[test]
    fn test_sums_in_box() {
        let pix = sample();
        let b = Box::new_unchecked(1, 1, 2, 2);
        assert_eq!(pix.row_sums_in_box(&b).unwrap().as_slice(), &[10.0, 1.0]);
        assert_eq!(pix.column_sums_in_box(&b).unwrap().as_slice(), &[5.0, 6.0]);
        assert!(pix.row_sums_in_box(&Box::new_unchecked(5, 5, 2, 2)).is_err());
    }

    #[test]
    fn test_rgb_not_projectable() {
        let pix = Pix::new(2, 2, PixelDepth::Bit32).unwrap();
        assert!(pix.row_sums().is_err());
        assert!(pix.column_sums().is_err());
    }
}
