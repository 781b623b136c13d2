//! Depth conversion, inversion and thresholding
//!
//! These are the "binarizer" half of the segmentation front end: scanned
//! pages arrive as dark ink on light paper, and the locator works on the
//! inverted image so that ink carries the high values.

use super::{Pix, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

impl Pix {
    /// Invert pixel values.
    ///
    /// 8 bpp: `v -> 255 - v`. 1 bpp: foreground and background swap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for 32 bpp images.
    pub fn invert(&self) -> Result<Pix> {
        let max = match self.depth() {
            PixelDepth::Bit1 | PixelDepth::Bit8 => self.depth().max_value(),
            d => return Err(Error::UnsupportedDepth(d.bits())),
        };
        let data = self.data().iter().map(|&v| max - v).collect();
        Pix::from_data(self.width(), self.height(), self.depth(), data)
    }

    /// Threshold an 8 bpp image to 1 bpp.
    ///
    /// Pixels with a gray value strictly below `thresh` become foreground (1).
    /// A 1 bpp input is returned unchanged.
    pub fn threshold_to_binary(&self, thresh: u8) -> Result<Pix> {
        match self.depth() {
            PixelDepth::Bit1 => Ok(self.clone()),
            PixelDepth::Bit8 => {
                let t = thresh as u32;
                let data = self.data().iter().map(|&v| u32::from(v < t)).collect();
                Pix::from_data(self.width(), self.height(), PixelDepth::Bit1, data)
            }
            d => Err(Error::UnsupportedDepth(d.bits())),
        }
    }

    /// Convert to 8 bpp grayscale.
    ///
    /// 1 bpp foreground maps to black (0) and background to white (255);
    /// 32 bpp RGB maps through [`color::luminance`].
    pub fn convert_to_8(&self) -> Result<Pix> {
        let data = match self.depth() {
            PixelDepth::Bit8 => return Ok(self.clone()),
            PixelDepth::Bit1 => self
                .data()
                .iter()
                .map(|&v| if v == 0 { 255 } else { 0 })
                .collect(),
            PixelDepth::Bit32 => self
                .data()
                .iter()
                .map(|&p| {
                    let (r, g, b) = color::extract_rgb(p);
                    color::luminance(r, g, b) as u32
                })
                .collect(),
        };
        Pix::from_data(self.width(), self.height(), PixelDepth::Bit8, data)
    }

    /// Convert to 32 bpp RGB, replicating gray levels into each channel.
    pub fn convert_to_32(&self) -> Result<Pix> {
        if self.depth() == PixelDepth::Bit32 {
            return Ok(self.clone());
        }
        let gray = self.convert_to_8()?;
        let data = gray
            .data()
            .iter()
            .map(|&v| color::compose_rgb(v as u8, v as u8, v as u8))
            .collect();
        Pix::from_data(self.width(), self.height(), PixelDepth::Bit32, data)
    }
}
