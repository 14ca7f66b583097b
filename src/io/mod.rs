//! I/O module
//!
//! Handles configuration loading, CSV input and QIF output.
//!
//! # Components
//!
//! - `config_reader` - Loads the JSON conversion configuration from disk
//! - `csv_source` - Streaming CSV reader with header-based column lookup
//! - `qif_format` - QIF record serialization and number formatting
//! - `destinations` - The set of open QIF output streams for a run

pub mod config_reader;
pub mod csv_source;
pub mod destinations;
pub mod qif_format;

pub use config_reader::load_config;
pub use csv_source::{ColumnIndex, CsvRow, CsvSource};
pub use destinations::{create_file, DestinationSet, DestinationSummary};
pub use qif_format::{format_amount, format_quantity, group_thousands};
