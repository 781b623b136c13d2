//! digitrec-test - Regression test framework for digitrec
//!
//! Provides [`RegParams`], a regression harness with three modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run tests without comparison (visual inspection)
//!
//! and [`synth`], builders for synthetic digit sheets.
//!
//! # Usage
//!
//! ```ignore
//! use digitrec_test::RegParams;
//!
//! let mut rp = RegParams::new("locate");
//! rp.compare_values(1.0, boxes.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // digitrec-test is at crates/digitrec-test
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Path of a named file inside the regout directory
pub fn regout_path(name: &str) -> String {
    format!("{}/{}", regout_dir(), name)
}

/// Load an image previously written to the regout directory
pub fn load_regout_image(name: &str) -> TestResult<digitrec_core::Pix> {
    let path = regout_path(name);
    digitrec_io::read_image(&path).map_err(|e| TestError::ImageLoad {
        path: path.clone(),
        message: e.to_string(),
    })
}
