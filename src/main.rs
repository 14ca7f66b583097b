//! CSV to QIF converter CLI
//!
//! Command-line interface for converting financial CSV exports to QIF files.
//!
//! # Usage
//!
//! ```bash
//! csv-to-qif export.csv config.json
//! csv-to-qif -v
//! RUST_LOG=csv_to_qif=debug csv-to-qif export.csv config.json
//! ```
//!
//! The banner is printed first, so it also precedes version and usage output.
//! The program then reads the configuration, converts every row of the CSV file
//! and writes each record to the QIF file selected by the configuration's
//! routing rules. Diagnostics are logged to stderr; set `CSV_TO_QIF_LOG_JSON`
//! for JSON log lines.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Conversion error (missing file, bad configuration, bad row, unrouted record)
//! - 2: Usage error (reported by clap)

use csv_to_qif::cli;
use csv_to_qif::convert_files;
use std::process;

const BANNER: &str = "***** CSV to QIF File Converter *****";

fn main() {
    println!("\n\n{}\n", BANNER);

    let args = cli::parse_args();
    init_logging();

    match convert_files(&args.csv_file, &args.config_file) {
        Ok(summary) => println!("{} CSV records processed", summary.records),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("csv_to_qif=warn"));

    let json_logging = std::env::var("CSV_TO_QIF_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
