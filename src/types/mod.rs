//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `config`: Declarative conversion configuration
//! - `qif`: The QIF record produced for each CSV row
//! - `error`: Error types for the converter

pub mod config;
pub mod error;
pub mod qif;

pub use config::{ConversionConfig, Field, HeaderRowMap, QifFileConfig};
pub use error::ConvertError;
pub use qif::QifRecord;
