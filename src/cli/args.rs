use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Converts financial CSV files to the Quicken QIF format
#[derive(Parser, Debug)]
#[command(name = "csv-to-qif", version)]
#[command(about = "Converts financial CSV files to the Quicken QIF format", long_about = None)]
#[command(disable_version_flag = true)]
pub struct CliArgs {
    /// Input CSV file path
    #[arg(value_name = "CSV_FILE", help = "Specify the input CSV file")]
    pub csv_file: PathBuf,

    /// Conversion configuration path
    #[arg(
        value_name = "CONFIG_FILE",
        help = "Specify the conversion configuration JSON file"
    )]
    pub config_file: PathBuf,

    /// Print version and exit
    #[allow(dead_code)]
    #[arg(short = 'v', long = "version", action = ArgAction::Version, help = "Shows the version and exits")]
    version: Option<bool>,
}
