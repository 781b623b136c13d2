//! Box rendering for debug overlays

use super::{PixMut, PixelDepth};
use crate::box_::{Box, Boxa};
use crate::color;
use crate::error::{Error, Result};

/// An RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 200, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);

    /// Create a color from its components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn to_pixel(self) -> u32 {
        color::compose_rgb(self.r, self.g, self.b)
    }
}

impl PixMut {
    /// Draw the one-pixel outline of a box (32 bpp only).
    ///
    /// The outline covers the box's first and last row and column; parts
    /// falling outside the image are skipped.
    pub fn render_box(&mut self, b: &Box, c: Color) -> Result<()> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        if b.is_empty() {
            return Ok(());
        }
        let val = c.to_pixel();
        let (x0, y0) = (b.x, b.y);
        let (x1, y1) = (b.right() - 1, b.bottom() - 1);
        for x in x0..=x1 {
            self.put_clipped(x, y0, val);
            self.put_clipped(x, y1, val);
        }
        for y in y0..=y1 {
            self.put_clipped(x0, y, val);
            self.put_clipped(x1, y, val);
        }
        Ok(())
    }

    /// Draw the outline of every box in a Boxa.
    pub fn render_boxa(&mut self, boxa: &Boxa, c: Color) -> Result<()> {
        for b in boxa.iter() {
            self.render_box(b, c)?;
        }
        Ok(())
    }

    fn put_clipped(&mut self, x: i32, y: i32, val: u32) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.set_pixel_unchecked(x as u32, y as u32, val);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pix;

    #[test]
    fn test_render_box_outline() {
        let pix = Pix::new(6, 6, PixelDepth::Bit32).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.render_box(&Box::new_unchecked(1, 1, 3, 3), Color::RED).unwrap();
        let red = color::compose_rgb(255, 0, 0);
        assert_eq!(pm.get_pixel(1, 1), Some(red));
        assert_eq!(pm.get_pixel(3, 3), Some(red));
        assert_eq!(pm.get_pixel(2, 2), Some(0));
        assert_eq!(pm.get_pixel(4, 4), Some(0));
    }

    #[test]
    fn test_render_box_requires_rgb() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let mut pm = pix.to_mut();
        assert!(pm.render_box(&Box::new_unchecked(0, 0, 2, 2), Color::RED).is_err());
    }

    #[test]
    fn test_render_box_clipped() {
        let pix = Pix::new(3, 3, PixelDepth::Bit32).unwrap();
        let mut pm = pix.to_mut();
        pm.render_box(&Box::new_unchecked(-1, -1, 10, 10), Color::BLUE)
            .unwrap();
        assert_eq!(pm.get_pixel(0, 0), Some(0));
    }
}
