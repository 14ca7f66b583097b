//! Open QIF output streams
//!
//! A [`DestinationSet`] owns one writer per configured destination, in
//! configuration order. Writers are created together before the first row is
//! converted and are closed when the set is dropped, on success or error.
//! [`DestinationSet::finish`] flushes every writer so that write failures on
//! the success path are reported instead of being lost on drop.

use crate::core::Destination;
use crate::types::ConvertError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::debug;

/// Create (or truncate) the output file for a destination
pub fn create_file(destination: &Destination) -> io::Result<BufWriter<File>> {
    File::create(destination.name()).map(BufWriter::new)
}

/// Number of records written to one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationSummary {
    pub name: String,
    pub records: usize,
}

#[derive(Debug)]
struct OpenDestination<W> {
    name: String,
    writer: W,
    records: usize,
}

/// Output streams for every destination of a run
#[derive(Debug)]
pub struct DestinationSet<W: Write> {
    outputs: Vec<OpenDestination<W>>,
}

impl<W: Write> DestinationSet<W> {
    /// Open a writer for each destination, in order
    ///
    /// # Arguments
    ///
    /// * `destinations` - Resolved destinations
    /// * `open` - Creates the writer for one destination (see [`create_file`])
    ///
    /// # Errors
    ///
    /// Returns `IoError` naming the first destination that could not be opened.
    /// Writers opened before it are closed.
    pub fn open<F>(destinations: &[Destination], mut open: F) -> Result<Self, ConvertError>
    where
        F: FnMut(&Destination) -> io::Result<W>,
    {
        let outputs = destinations
            .iter()
            .map(|destination| {
                let writer = open(destination).map_err(|e| ConvertError::IoError {
                    message: format!("Failed to create '{}': {}", destination.name(), e),
                })?;
                debug!(file = destination.name(), "Opened output");
                Ok(OpenDestination {
                    name: destination.name().to_string(),
                    writer,
                    records: 0,
                })
            })
            .collect::<Result<Vec<_>, ConvertError>>()?;

        Ok(Self { outputs })
    }

    /// Number of open destinations
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether no destination is open
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Append a formatted record to destination `index`
    pub fn write(&mut self, index: usize, record: &str) -> Result<(), ConvertError> {
        let output = self
            .outputs
            .get_mut(index)
            .ok_or_else(|| ConvertError::IoError {
                message: format!("No output open for destination {}", index),
            })?;

        output
            .writer
            .write_all(record.as_bytes())
            .map_err(|e| ConvertError::IoError {
                message: format!("Failed to write to '{}': {}", output.name, e),
            })?;
        output.records += 1;
        Ok(())
    }

    /// Flush and close every destination
    ///
    /// # Returns
    ///
    /// Record counts per destination, in configuration order.
    pub fn finish(self) -> Result<Vec<DestinationSummary>, ConvertError> {
        self.outputs
            .into_iter()
            .map(|mut output| {
                output.writer.flush().map_err(|e| ConvertError::IoError {
                    message: format!("Failed to flush '{}': {}", output.name, e),
                })?;
                Ok(DestinationSummary {
                    name: output.name,
                    records: output.records,
                })
            })
            .collect()
    }
}
