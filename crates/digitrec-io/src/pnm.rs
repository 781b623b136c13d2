//! PNM (Portable Any Map) format support
//!
//! Reads PBM (P1/P4), PGM (P2/P5) and PPM (P3/P6) images, and writes
//! binary PGM (P5) for 1 and 8 bpp images and binary PPM (P6) for 32 bpp.
//! Gray levels with a `maxval` other than 255 are rescaled to 0..=255.

use crate::{IoError, IoResult};
use digitrec_core::{Pix, PixelDepth, color};
use std::io::{Read, Write};

/// Read a PNM image from a reader.
///
/// # Returns
/// A `Pix` at 8 bpp (PBM, PGM) or 32 bpp (PPM). PBM black maps to 0.
pub fn read_pnm<R: Read>(mut reader: R) -> IoResult<Pix> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    let mut cursor = HeaderCursor::new(&buf);

    let magic = cursor.token()?;
    let kind = match magic.as_slice() {
        b"P1" => PnmKind::Bitmap { binary: false },
        b"P4" => PnmKind::Bitmap { binary: true },
        b"P2" => PnmKind::Graymap { binary: false },
        b"P5" => PnmKind::Graymap { binary: true },
        b"P3" => PnmKind::Pixmap { binary: false },
        b"P6" => PnmKind::Pixmap { binary: true },
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNM magic {:?}",
                String::from_utf8_lossy(other)
            )));
        }
    };

    let width = cursor.number()?;
    let height = cursor.number()?;
    if width == 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "PNM has zero dimension {}x{}",
            width, height
        )));
    }
    let maxval = match kind {
        PnmKind::Bitmap { .. } => 1,
        _ => cursor.number()?,
    };
    if maxval == 0 || maxval > 255 {
        return Err(IoError::UnsupportedFormat(format!(
            "PNM maxval {} not supported",
            maxval
        )));
    }

    let npix = width as usize * height as usize;
    let scale = |v: u32| (v.min(maxval) * 255 + maxval / 2) / maxval;

    let (depth, data) = match kind {
        PnmKind::Bitmap { binary } => {
            let bits: Vec<u32> = if binary {
                cursor.skip_single_whitespace();
                let body = cursor.rest();
                let bytes_per_row = (width as usize).div_ceil(8);
                if body.len() < bytes_per_row * height as usize {
                    return Err(IoError::InvalidData("truncated PBM data".to_string()));
                }
                (0..npix)
                    .map(|i| {
                        let (y, x) = (i / width as usize, i % width as usize);
                        let byte = body[y * bytes_per_row + x / 8];
                        ((byte >> (7 - (x % 8))) & 1) as u32
                    })
                    .collect()
            } else {
                cursor.bits(npix)?
            };
            // PBM: 1 is black
            let gray = bits.into_iter().map(|b| if b == 1 { 0 } else { 255 }).collect();
            (PixelDepth::Bit8, gray)
        }
        PnmKind::Graymap { binary } => {
            let raw = read_samples(&mut cursor, binary, npix)?;
            (PixelDepth::Bit8, raw.into_iter().map(scale).collect())
        }
        PnmKind::Pixmap { binary } => {
            let raw = read_samples(&mut cursor, binary, npix * 3)?;
            let rgb = raw
                .chunks_exact(3)
                .map(|c| color::compose_rgb(scale(c[0]) as u8, scale(c[1]) as u8, scale(c[2]) as u8))
                .collect();
            (PixelDepth::Bit32, rgb)
        }
    };

    Ok(Pix::from_data(width, height, depth, data)?)
}

/// Write a `Pix` as binary PNM to a writer.
///
/// Chooses P5 (1 and 8 bpp) or P6 (32 bpp) based on the pixel depth.
pub fn write_pnm<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let (w, h) = (pix.width(), pix.height());
    match pix.depth() {
        PixelDepth::Bit1 | PixelDepth::Bit8 => {
            let gray = pix.convert_to_8()?;
            write!(writer, "P5\n{} {}\n255\n", w, h)?;
            let bytes: Vec<u8> = gray.data().iter().map(|&v| v as u8).collect();
            writer.write_all(&bytes)?;
        }
        PixelDepth::Bit32 => {
            write!(writer, "P6\n{} {}\n255\n", w, h)?;
            let mut bytes = Vec::with_capacity(w as usize * h as usize * 3);
            for &p in pix.data() {
                let (r, g, b) = color::extract_rgb(p);
                bytes.extend_from_slice(&[r, g, b]);
            }
            writer.write_all(&bytes)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum PnmKind {
    Bitmap { binary: bool },
    Graymap { binary: bool },
    Pixmap { binary: bool },
}

fn read_samples(cursor: &mut HeaderCursor<'_>, binary: bool, count: usize) -> IoResult<Vec<u32>> {
    if binary {
        cursor.skip_single_whitespace();
        let body = cursor.rest();
        if body.len() < count {
            return Err(IoError::InvalidData(format!(
                "truncated PNM data: need {} bytes, have {}",
                count,
                body.len()
            )));
        }
        Ok(body[..count].iter().map(|&b| b as u32).collect())
    } else {
        (0..count).map(|_| cursor.number()).collect()
    }
}

/// Tokenizer over a PNM header (and ASCII body), skipping `#` comments.
struct HeaderCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> HeaderCursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn skip_separators(&mut self) {
        while self.pos < self.buf.len() {
            let c = self.buf[self.pos];
            if c == b'#' {
                while self.pos < self.buf.len() && self.buf[self.pos] != b'\n' {
                    self.pos += 1;
                }
            } else if c.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn token(&mut self) -> IoResult<Vec<u8>> {
        self.skip_separators();
        let start = self.pos;
        while self.pos < self.buf.len() && !self.buf[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(IoError::InvalidData("unexpected end of PNM header".to_string()));
        }
        Ok(self.buf[start..self.pos].to_vec())
    }

    fn number(&mut self) -> IoResult<u32> {
        let tok = self.token()?;
        std::str::from_utf8(&tok)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                IoError::InvalidData(format!(
                    "expected a number in PNM data, got {:?}",
                    String::from_utf8_lossy(&tok)
                ))
            })
    }

    /// ASCII PBM allows bits without separators ("0101").
    fn bits(&mut self, count: usize) -> IoResult<Vec<u32>> {
        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            self.skip_separators();
            match self.buf.get(self.pos) {
                Some(b'0') => out.push(0),
                Some(b'1') => out.push(1),
                _ => return Err(IoError::InvalidData("truncated PBM data".to_string())),
            }
            self.pos += 1;
        }
        Ok(out)
    }

    fn skip_single_whitespace(&mut self) {
        if self.pos < self.buf.len() && self.buf[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_ascii_pgm_with_comment() {
        let src = b"P2\n# scanned sheet\n3 2\n15\n0 15 5\n15 0 10\n";
        let pix = read_pnm(&src[..]).unwrap();
        assert_eq!(pix.depth(), PixelDepth::Bit8);
        assert_eq!(pix.row(0).unwrap(), &[0, 255, 85]);
        assert_eq!(pix.row(1).unwrap(), &[255, 0, 170]);
    }

    #[test]
    fn test_read_ascii_pbm() {
        let src = b"P1\n4 1\n0110";
        let pix = read_pnm(&src[..]).unwrap();
        assert_eq!(pix.row(0).unwrap(), &[255, 0, 0, 255]);
    }

    #[test]
    fn test_read_binary_pbm() {
        let src = [b'P', b'4', b'\n', b'3', b' ', b'1', b'\n', 0b1010_0000];
        let pix = read_pnm(&src[..]).unwrap();
        assert_eq!(pix.row(0).unwrap(), &[0, 255, 0]);
    }

    #[test]
    fn test_write_then_read_p5() {
        let pix = Pix::from_gray_rows(&[&[0, 128], &[255, 7]]).unwrap();
        let mut out = Vec::new();
        write_pnm(&pix, &mut out).unwrap();
        assert!(out.starts_with(b"P5\n2 2\n255\n"));
        let back = read_pnm(&out[..]).unwrap();
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_truncated_and_bad_magic() {
        assert!(read_pnm(&b"P5\n4 4\n255\n\x00\x01"[..]).is_err());
        assert!(read_pnm(&b"P7\n1 1\n"[..]).is_err());
        assert!(read_pnm(&b"P2\n0 1\n255\n"[..]).is_err());
    }
}
