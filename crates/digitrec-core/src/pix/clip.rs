//! Rectangle extraction

use super::Pix;
use crate::box_::Box;
use crate::error::{Error, Result};

impl Pix {
    /// Extract a rectangular region from the image.
    ///
    /// The rectangle is clipped to the image bounds; its origin must lie
    /// inside the image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `w` or `h` is 0 or the origin
    /// is outside the image.
    pub fn clip_rectangle(&self, x: u32, y: u32, w: u32, h: u32) -> Result<Pix> {
        if w == 0 || h == 0 {
            return Err(Error::InvalidParameter(format!(
                "clip rectangle has zero dimension: {}x{}",
                w, h
            )));
        }

        let src_w = self.width();
        let src_h = self.height();
        if x >= src_w || y >= src_h {
            return Err(Error::InvalidParameter(format!(
                "clip rectangle origin ({}, {}) is outside image bounds ({}x{})",
                x, y, src_w, src_h
            )));
        }

        let clip_w = w.min(src_w - x);
        let clip_h = h.min(src_h - y);

        let mut data = Vec::with_capacity(clip_w as usize * clip_h as usize);
        for dy in 0..clip_h {
            if let Some(row) = self.row(y + dy) {
                data.extend_from_slice(&row[x as usize..(x + clip_w) as usize]);
            }
        }
        Pix::from_data(clip_w, clip_h, self.depth(), data)
    }

    /// Extract the region covered by a [`Box`].
    ///
    /// Negative coordinates are clipped away.
    pub fn clip_box(&self, region: &Box) -> Result<Pix> {
        let clipped = region
            .clip(self.width() as i32, self.height() as i32)
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "box {:?} does not intersect {}x{} image",
                    region,
                    self.width(),
                    self.height()
                ))
            })?;
        self.clip_rectangle(
            clipped.x as u32,
            clipped.y as u32,
            clipped.w as u32,
            clipped.h as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_rectangle() {
        let pix = Pix::from_gray_rows(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]).unwrap();
        let sub = pix.clip_rectangle(1, 1, 5, 5).unwrap();
        assert_eq!(sub.width(), 2);
        assert_eq!(sub.height(), 2);
        assert_eq!(sub.data(), &[5, 6, 8, 9]);
        assert!(pix.clip_rectangle(3, 0, 1, 1).is_err());
        assert!(pix.clip_rectangle(0, 0, 0, 1).is_err());
    }

    #[test]
    fn test_clip_box() {
        let pix = Pix::from_gray_rows(&[&[1, 2, 3], &[4, 5, 6]]).unwrap();
        let sub = pix.clip_box(&Box::new_unchecked(-1, 0, 2, 2)).unwrap();
        assert_eq!(sub.data(), &[1, 4]);
        assert!(pix.clip_box(&Box::new_unchecked(10, 10, 1, 1)).is_err());
    }
}
