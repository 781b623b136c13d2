//! digitrec-io - Image I/O for digit sheet scans
//!
//! Reads scanned digit sheets from PNG, TIFF, PNM and JPEG into a [`Pix`]
//! and writes images (including box-annotated overlays) back out.
//!
//! # Supported formats
//!
//! | Format | Read | Write | Feature     |
//! |--------|------|-------|-------------|
//! | PNM    | yes  | yes   | `pnm`         |
//! | PNG    | yes  | yes   | `png-format`  |
//! | TIFF   | yes  | yes   | `tiff-format` |
//! | JPEG   | yes  | no    | `jpeg`        |
//! | BMP    | detected only | no | -      |

pub mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;
#[cfg(feature = "tiff-format")]
pub mod tiff;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use digitrec_core::{Boxa, Color, Pix};
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image from a file, detecting the format from its magic bytes.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let data = std::fs::read(path.as_ref())?;
    read_image_mem(&data)
}

/// Read an image from an in-memory buffer.
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(data)?;
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::read_tiff(Cursor::new(data)),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(data),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(data),
        other => Err(IoError::UnsupportedFormat(format!(
            "cannot read {:?} images",
            other
        ))),
    }
}

/// Read an image and convert it to 8 bpp grayscale.
///
/// This is the form the digit locator consumes: dark ink on light paper.
pub fn read_grayscale<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    Ok(read_image(path)?.convert_to_8()?)
}

/// Write an image to a file.
///
/// `ImageFormat::Unknown` picks the format from the path's extension.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    let path = path.as_ref();
    let format = match format {
        ImageFormat::Unknown => ImageFormat::from_extension(path),
        f => f,
    };
    let mut writer = BufWriter::new(File::create(path)?);
    write_image_to(pix, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Encode an image into an in-memory buffer.
pub fn write_image_mem(pix: &Pix, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    write_image_to(pix, &mut buf, format)?;
    Ok(buf.into_inner())
}

fn write_image_to<W: Write + std::io::Seek>(
    pix: &Pix,
    writer: &mut W,
    format: ImageFormat,
) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(pix, writer),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::write_tiff(pix, writer),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(pix, writer),
        other => Err(IoError::UnsupportedFormat(format!(
            "cannot write {:?} images",
            other
        ))),
    }
}

/// Save a copy of `pix` with every box in `boxa` outlined in red.
///
/// Used to eyeball segmentation results; the format follows the path's
/// extension.
pub fn save_annotated_image<P: AsRef<Path>>(path: P, pix: &Pix, boxa: &Boxa) -> IoResult<()> {
    let mut overlay = pix.convert_to_32()?.to_mut();
    overlay.render_boxa(boxa, Color::RED)?;
    write_image(&overlay.into(), path, ImageFormat::Unknown)
}
