//! TIFF image format support
//!
//! Reads the first page of a TIFF as 8 bpp gray or 32 bpp RGB. Bilevel
//! pages are expanded to 8 bpp so that every scan reaches the locator
//! with the same depth. Writing is uncompressed Gray8 or RGB8.

use crate::{IoError, IoResult};
use digitrec_core::{Pix, PixelDepth, color};
use std::io::{Read, Seek, Write};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::TiffEncoder;
use tiff::encoder::colortype::{Gray8, RGB8};
use tiff::tags::Tag;

/// PhotometricInterpretation value for "0 is white".
const WHITE_IS_ZERO: u32 = 0;

/// Read the first page of a TIFF image
pub fn read_tiff<R: Read + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF color type: {}", e)))?;
    let white_is_zero = decoder
        .get_tag_u32(Tag::PhotometricInterpretation)
        .map(|v| v == WHITE_IS_ZERO)
        .unwrap_or(false);

    let image_data = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?;

    let npix = width as usize * height as usize;
    let gray = |v: u8| -> u32 {
        if white_is_zero {
            (255 - v) as u32
        } else {
            v as u32
        }
    };

    let (depth, pixels): (PixelDepth, Vec<u32>) = match (color_type, image_data) {
        (ColorType::Gray(1), DecodingResult::U8(data)) => {
            let bytes_per_row = width.div_ceil(8) as usize;
            check_len(data.len(), bytes_per_row * height as usize)?;
            let pixels = (0..npix)
                .map(|i| {
                    let (y, x) = (i / width as usize, i % width as usize);
                    let bit = (data[y * bytes_per_row + x / 8] >> (7 - (x % 8))) & 1;
                    gray(if bit == 1 { 255 } else { 0 })
                })
                .collect();
            (PixelDepth::Bit8, pixels)
        }
        (ColorType::Gray(8), DecodingResult::U8(data)) => {
            check_len(data.len(), npix)?;
            (PixelDepth::Bit8, data[..npix].iter().map(|&v| gray(v)).collect())
        }
        (ColorType::Gray(16), DecodingResult::U16(data)) => {
            check_len(data.len(), npix)?;
            let pixels = data[..npix].iter().map(|&v| gray((v >> 8) as u8)).collect();
            (PixelDepth::Bit8, pixels)
        }
        (ColorType::RGB(8), DecodingResult::U8(data)) => {
            check_len(data.len(), npix * 3)?;
            let pixels = data
                .chunks_exact(3)
                .take(npix)
                .map(|c| color::compose_rgb(c[0], c[1], c[2]))
                .collect();
            (PixelDepth::Bit32, pixels)
        }
        (ColorType::RGBA(8), DecodingResult::U8(data)) => {
            check_len(data.len(), npix * 4)?;
            let pixels = data
                .chunks_exact(4)
                .take(npix)
                .map(|c| color::compose_rgb(c[0], c[1], c[2]))
                .collect();
            (PixelDepth::Bit32, pixels)
        }
        (ct, _) => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported TIFF color type: {:?}",
                ct
            )));
        }
    };

    Ok(Pix::from_data(width, height, depth, pixels)?)
}

/// Write a TIFF image (uncompressed)
pub fn write_tiff<W: Write + Seek>(pix: &Pix, writer: W) -> IoResult<()> {
    let (width, height) = (pix.width(), pix.height());
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?;

    match pix.depth() {
        PixelDepth::Bit1 | PixelDepth::Bit8 => {
            let data: Vec<u8> = pix.convert_to_8()?.data().iter().map(|&v| v as u8).collect();
            encoder
                .write_image::<Gray8>(width, height, &data)
                .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
        }
        PixelDepth::Bit32 => {
            let mut data = Vec::with_capacity(pix.data().len() * 3);
            for &p in pix.data() {
                let (r, g, b) = color::extract_rgb(p);
                data.extend_from_slice(&[r, g, b]);
            }
            encoder
                .write_image::<RGB8>(width, height, &data)
                .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
        }
    }
    Ok(())
}

fn check_len(actual: usize, needed: usize) -> IoResult<()> {
    if actual < needed {
        return Err(IoError::InvalidData(format!(
            "TIFF data too short: {} < {}",
            actual, needed
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_tiff_roundtrip_gray() {
        let pix = Pix::from_gray_rows(&[&[0, 10, 20], &[200, 250, 255]]).unwrap();
        let mut buf = Cursor::new(Vec::new());
        write_tiff(&pix, &mut buf).unwrap();
        let back = read_tiff(Cursor::new(buf.into_inner())).unwrap();
        assert_eq!(back.depth(), PixelDepth::Bit8);
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_tiff_roundtrip_rgb() {
        let data = vec![color::compose_rgb(1, 2, 3), color::compose_rgb(250, 128, 0)];
        let pix = Pix::from_data(1, 2, PixelDepth::Bit32, data).unwrap();
        let mut buf = Cursor::new(Vec::new());
        write_tiff(&pix, &mut buf).unwrap();
        let back = read_tiff(Cursor::new(buf.into_inner())).unwrap();
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_tiff_garbage_is_error() {
        assert!(read_tiff(Cursor::new(vec![0u8; 16])).is_err());
    }
}
