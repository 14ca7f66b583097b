//! Error types for the CSV to QIF converter
//!
//! Every error in this crate is fatal: the conversion stops at the first one
//! and the message is reported to the user. Variants carry enough context to
//! locate the offending input without re-running the conversion.
//!
//! # Error Categories
//!
//! - **Input Errors**: CSV or configuration file missing, unreadable
//! - **Configuration Errors**: malformed JSON, missing keys, bad routing patterns,
//!   conflicting action mappings
//! - **Row Errors**: unknown columns, unparseable amounts, unmapped actions,
//!   records that match no output file

use thiserror::Error;

/// Main error type for the converter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// An input file named on the command line does not exist
    #[error("{kind} file '{path}' does not exist")]
    InputNotFound {
        /// Which input was missing ("CSV" or "Config")
        kind: String,
        /// The path that was not found
        path: String,
    },

    /// I/O error while reading input or writing QIF output
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// The configuration file is not valid JSON or has the wrong shape
    #[error("Malformed configuration: {message}")]
    MalformedConfig {
        /// Description of the deserialization failure
        message: String,
    },

    /// One or more required configuration keys are absent
    ///
    /// All missing keys are collected before this is raised.
    #[error("Configuration is missing required keys: {}", keys.join(", "))]
    MissingConfigKeys {
        /// Dotted paths of the missing keys, e.g. `csvFile.headerRowMap.dateColumn`
        keys: Vec<String>,
    },

    /// A routing pattern in `qifFiles` failed to compile
    #[error("Invalid match pattern '{pattern}' for output file '{file}': {message}")]
    InvalidPattern {
        /// Output file the pattern belongs to
        file: String,
        /// The pattern text
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// Two canonical actions map to the same CSV action text
    #[error("Actions '{first}' and '{second}' both map to CSV action '{csv_text}'")]
    DuplicateActionMapping {
        /// The shared CSV action text
        csv_text: String,
        /// First canonical action
        first: String,
        /// Second canonical action
        second: String,
    },

    /// The CSV input itself could not be read
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    CsvError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A configured column is not present in the CSV header row
    #[error("Column '{column}' not found in CSV header{}", line.map(|l| format!(" (line {})", l)).unwrap_or_default())]
    MissingColumn {
        /// The column name from the configuration
        column: String,
        /// Line of the row that referenced it
        line: Option<u64>,
    },

    /// A money or quantity field has no numeric content
    #[error("Cannot find monetary value in string '{text}'{}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// The raw field text
        text: String,
        /// Line of the row holding the field
        line: Option<u64>,
    },

    /// A CSV action value has no QIF action mapped to it
    #[error("Cannot map CSV action '{action}' to a QIF action{}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    UnknownAction {
        /// The raw CSV action text
        action: String,
        /// Line of the row holding the action
        line: Option<u64>,
    },

    /// A record matched none of the configured output files
    #[error("Cannot map CSV file record{} to an output file: {record}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    RoutingError {
        /// The formatted QIF record that could not be routed
        record: String,
        /// Line of the source row
        line: Option<u64>,
    },
}

// Conversion from io::Error to ConvertError
impl From<std::io::Error> for ConvertError {
    fn from(error: std::io::Error) -> Self {
        ConvertError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ConvertError
impl From<csv::Error> for ConvertError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ConvertError::CsvError {
            line,
            message: error.to_string(),
        }
    }
}

// Conversion from serde_json::Error to ConvertError
impl From<serde_json::Error> for ConvertError {
    fn from(error: serde_json::Error) -> Self {
        ConvertError::MalformedConfig {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ConvertError {
    /// Create an InputNotFound error for the CSV input
    pub fn csv_not_found(path: &str) -> Self {
        ConvertError::InputNotFound {
            kind: "CSV".to_string(),
            path: path.to_string(),
        }
    }

    /// Create an InputNotFound error for the configuration file
    pub fn config_not_found(path: &str) -> Self {
        ConvertError::InputNotFound {
            kind: "Config".to_string(),
            path: path.to_string(),
        }
    }

    /// Create a ParseError without line information
    pub fn parse(text: &str) -> Self {
        ConvertError::ParseError {
            text: text.to_string(),
            line: None,
        }
    }

    /// Create a MissingColumn error without line information
    pub fn missing_column(column: &str) -> Self {
        ConvertError::MissingColumn {
            column: column.to_string(),
            line: None,
        }
    }

    /// Create an UnknownAction error without line information
    pub fn unknown_action(action: &str) -> Self {
        ConvertError::UnknownAction {
            action: action.to_string(),
            line: None,
        }
    }

    /// Create a RoutingError without line information
    pub fn routing(record: &str) -> Self {
        ConvertError::RoutingError {
            record: record.to_string(),
            line: None,
        }
    }

    /// Attach a CSV line number to a row-level error
    ///
    /// Errors that already carry a line, and errors that are not tied to a
    /// row, are returned unchanged.
    pub fn at_line(self, at: u64) -> Self {
        match self {
            ConvertError::MissingColumn { column, line } => ConvertError::MissingColumn {
                column,
                line: line.or(Some(at)),
            },
            ConvertError::ParseError { text, line } => ConvertError::ParseError {
                text,
                line: line.or(Some(at)),
            },
            ConvertError::UnknownAction { action, line } => ConvertError::UnknownAction {
                action,
                line: line.or(Some(at)),
            },
            ConvertError::RoutingError { record, line } => ConvertError::RoutingError {
                record,
                line: line.or(Some(at)),
            },
            other => other,
        }
    }
}
