//! digitrec command line
//!
//! ```bash
//! digitrec config.json
//! digitrec config.json --log-level debug
//! ```
//!
//! Runs the recognition pipeline described by a JSON config and prints
//! the per-class recognition table.

use clap::Parser;
use digitrec::recog::{PipelineConfig, PipelineReport, RecogResult, run_pipeline};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "digitrec")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Locate and classify handwritten digits on scanned sheets", long_about = None)]
struct Cli {
    /// Pipeline config (JSON); missing fields take their defaults
    config: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info", env = "DIGITREC_LOG")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    match run(&cli.config) {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(config = %cli.config.display(), error = %e, "pipeline failed");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path) -> RecogResult<PipelineReport> {
    let config = PipelineConfig::from_json_file(path)?;
    tracing::info!(config = %path.display(), "digitrec starting");
    run_pipeline(&config)
}

fn print_summary(report: &PipelineReport) {
    let stats = &report.primary.stats;
    println!(
        "training digits: {}  test digits: {}",
        report.training_boxes.len(),
        report.test_boxes.len()
    );
    println!(
        "recognized {} of {} ({:.1}%)",
        stats.recognized(),
        stats.samples(),
        stats.rate() * 100.0
    );
    println!("class  {}", report.table.methods.join("  "));
    for (class, row) in report.table.rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:6.1}", v)).collect();
        println!("{:>5}  {}", class, cells.join("  "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_config_and_log_level() {
        let cli = Cli::try_parse_from(["digitrec", "run.json", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("run.json"));
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_cli_requires_config() {
        assert!(Cli::try_parse_from(["digitrec"]).is_err());
    }
}
