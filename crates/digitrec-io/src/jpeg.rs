//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. Grayscale scans come
//! back at 8 bpp, color scans at 32 bpp. Writing is not provided: the
//! decoder crate is decode-only and JPEG artifacts are a poor fit for
//! binarized digit sheets anyway.

use crate::{IoError, IoResult};
use digitrec_core::{Pix, PixelDepth, color};
use jpeg_decoder::{Decoder, PixelFormat};
use std::io::Read;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
///
/// # Returns
/// A `Pix` at 8 bpp (grayscale) or 32 bpp (RGB).
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    let bytes = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;
    let (width, height) = (info.width as u32, info.height as u32);

    let (depth, pixels): (PixelDepth, Vec<u32>) = match info.pixel_format {
        PixelFormat::L8 => (PixelDepth::Bit8, bytes.iter().map(|&v| v as u32).collect()),
        PixelFormat::L16 => (
            PixelDepth::Bit8,
            // big-endian samples; keep the high byte
            bytes.chunks_exact(2).map(|c| c[0] as u32).collect(),
        ),
        PixelFormat::RGB24 => (
            PixelDepth::Bit32,
            bytes
                .chunks_exact(3)
                .map(|c| color::compose_rgb(c[0], c[1], c[2]))
                .collect(),
        ),
        PixelFormat::CMYK32 => {
            return Err(IoError::UnsupportedFormat(
                "CMYK JPEG is not supported".to_string(),
            ));
        }
    };

    Ok(Pix::from_data(width, height, depth, pixels)?)
}
