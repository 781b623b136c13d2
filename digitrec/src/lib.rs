//! digitrec - handwritten digit recognition for scanned sheets
//!
//! # Overview
//!
//! - Image container, boxes and projection profiles (`digitrec-core`)
//! - Image I/O for PNG, TIFF, PNM and JPEG (`digitrec-io`)
//! - Digit segmentation, profile and zoning features, centroid and k-NN
//!   classification, probability fusion and evaluation (`digitrec-recog`)
//!
//! # Example
//!
//! ```
//! use digitrec::recog::{LocateOptions, locate_digits};
//! use digitrec::Pix;
//!
//! // white page with one dark 2x2 blob
//! let pix = Pix::from_gray_rows(&[
//!     &[255, 255, 255, 255, 255],
//!     &[255, 0, 0, 255, 255],
//!     &[255, 0, 0, 255, 255],
//!     &[255, 255, 255, 255, 255],
//! ])
//! .unwrap();
//! let boxes = locate_digits(&pix, &LocateOptions::default()).unwrap();
//! assert_eq!(boxes.len(), 1);
//! ```

// Re-export core types (used by every stage)
pub use digitrec_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use digitrec_io as io;
pub use digitrec_recog as recog;
