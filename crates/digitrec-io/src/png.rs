//! PNG image format support
//!
//! Decoding normalizes every PNG variant to 8-bit samples: gray images
//! (any bit depth) become 8 bpp, everything with color or alpha becomes
//! 32 bpp RGB. Alpha is dropped; scanned digit sheets carry none.

use crate::{IoError, IoResult};
use digitrec_core::{Pix, PixelDepth, color};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG output depth: {:?}",
            bit_depth
        )));
    }

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let samples = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "indexed PNG was not expanded".to_string(),
            ));
        }
    };

    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as usize {
        let row = &data[y * bytes_per_row..][..width as usize * samples];
        for px in row.chunks_exact(samples) {
            let value = match samples {
                1 => px[0] as u32,
                2 => color::compose_rgb(px[0], px[0], px[0]),
                _ => color::compose_rgb(px[0], px[1], px[2]),
            };
            pixels.push(value);
        }
    }

    let depth = if samples == 1 {
        PixelDepth::Bit8
    } else {
        PixelDepth::Bit32
    };
    Ok(Pix::from_data(width, height, depth, pixels)?)
}

/// Write a PNG image
///
/// 1 bpp images are written as 8-bit gray (foreground black); 32 bpp as RGB.
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let (color_type, bytes) = match pix.depth() {
        PixelDepth::Bit1 | PixelDepth::Bit8 => {
            let gray = pix.convert_to_8()?;
            let bytes: Vec<u8> = gray.data().iter().map(|&v| v as u8).collect();
            (ColorType::Grayscale, bytes)
        }
        PixelDepth::Bit32 => {
            let mut bytes = Vec::with_capacity(pix.data().len() * 3);
            for &p in pix.data() {
                let (r, g, b) = color::extract_rgb(p);
                bytes.extend_from_slice(&[r, g, b]);
            }
            (ColorType::Rgb, bytes)
        }
    };

    let mut encoder = Encoder::new(writer, pix.width(), pix.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(&bytes)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    Ok(())
}
