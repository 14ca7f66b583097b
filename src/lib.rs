//! CSV to QIF Converter Library
//! # Overview
//!
//! This library converts investment transactions exported as CSV into one or
//! more Quicken Interchange Format (QIF) files. A JSON configuration names the
//! CSV columns, maps broker action text to QIF action codes and routes each
//! record to an output file by matching a column against a pattern.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (configuration, QIF record, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Conversion logic:
//!   - [`core::resolver`] - Configuration resolution (action lookup, routing patterns)
//!   - [`core::money`] - Monetary and quantity text parsing
//!   - [`core::engine`] - Row conversion and routing
//! - [`io`] - Configuration loading, CSV input, QIF formatting and output files
//! - [`pipeline`] - File-based entry point tying the pieces together
//!
//! # QIF Records
//!
//! Each CSV row becomes one record of seven lines followed by `^`:
//!
//! - `D` date, `N` action, `Y` security, `I` price
//! - `T` amount (two decimals, grouped thousands)
//! - `Q` quantity (always positive, grouped thousands)
//! - `M` memo
//!
//! # Failure Policy
//!
//! Conversion is all-or-nothing per row: the first row that cannot be
//! converted or routed stops the run with a descriptive [`ConvertError`].

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod pipeline;
pub mod types;

pub use core::{parse_signed_money, ConversionEngine, ResolvedConfig, RunSummary};
pub use io::{load_config, CsvSource, DestinationSet};
pub use pipeline::convert_files;
pub use types::{ConversionConfig, ConvertError, QifRecord};
