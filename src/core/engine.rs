//! Conversion engine
//!
//! This module provides the [`ConversionEngine`] that turns CSV rows into QIF
//! records and routes each one to an output destination.
//!
//! A run moves through `ConfigLoaded -> DestinationsOpen -> Streaming -> Finalized`:
//! the engine is built from a resolved configuration, opens every destination,
//! converts rows strictly in file order, then flushes all outputs. The first
//! failing row aborts the run; nothing is retried or skipped.
//!
//! Per row, the engine:
//! - looks up each semantic field through the header map
//! - resolves the CSV action to its canonical QIF code (case-insensitive)
//! - parses price and amount as signed values, quantity as a magnitude
//! - writes the formatted record to the first destination whose pattern
//!   matches the value of its match column

use crate::core::money::parse_signed_money;
use crate::core::resolver::{Destination, ResolvedConfig};
use crate::io::{ColumnIndex, CsvRow, CsvSource, DestinationSet, DestinationSummary};
use crate::types::{ConvertError, Field, QifRecord};
use std::io::{self, Read, Write};
use tracing::{debug, info, warn};

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// CSV data rows converted
    pub records: usize,
    /// Records written per destination, in configuration order
    pub destinations: Vec<DestinationSummary>,
}

/// CSV to QIF conversion engine
///
/// Holds the resolved configuration for a run. The engine itself is
/// stateless between runs; all per-run state lives in [`ConversionEngine::run`].
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    config: ResolvedConfig,
}

impl ConversionEngine {
    /// Create an engine for a resolved configuration
    pub fn new(config: ResolvedConfig) -> Self {
        ConversionEngine { config }
    }

    /// Destinations in routing order
    pub fn destinations(&self) -> &[Destination] {
        &self.config.destinations
    }

    /// Convert every row of `source`, routing records to writers made by `open`
    ///
    /// All destinations are opened before the first row is read, including
    /// ones that end up receiving no records.
    ///
    /// # Arguments
    ///
    /// * `source` - CSV rows to convert
    /// * `open` - Creates the writer for a destination, called once per
    ///   destination in configuration order
    ///
    /// # Returns
    ///
    /// The processed row count and per-destination record counts.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered. Row-level errors carry the CSV line
    /// number. Output written before the error is left in place.
    pub fn run<R, W, F>(&self, source: CsvSource<R>, open: F) -> Result<RunSummary, ConvertError>
    where
        R: Read,
        W: Write,
        F: FnMut(&Destination) -> io::Result<W>,
    {
        let mut outputs = DestinationSet::open(&self.config.destinations, open)?;
        if outputs.is_empty() {
            warn!("No QIF files configured; any data row will fail routing");
        } else {
            debug!(destinations = outputs.len(), "Outputs open");
        }

        let columns = source.columns().clone();
        self.warn_on_unmapped_columns(&columns);

        let mut records = 0;
        for row in source {
            let row = row?;
            self.process_row(&columns, &row, &mut outputs)
                .map_err(|e| e.at_line(row.line()))?;
            records += 1;
        }

        let destinations = outputs.finish()?;
        for destination in &destinations {
            info!(
                file = %destination.name,
                records = destination.records,
                "QIF file written"
            );
        }

        Ok(RunSummary {
            records,
            destinations,
        })
    }

    /// Build the QIF record for one row
    ///
    /// Fields are evaluated in QIF order (`D N Y I T Q M`), so the first
    /// problem in that order is the one reported.
    ///
    /// # Errors
    ///
    /// - `MissingColumn` if a mapped column is not in the CSV header
    /// - `UnknownAction` if the action text has no mapping
    /// - `ParseError` if price, amount or quantity has no numeric content
    pub fn convert_row<'r>(
        &'r self,
        columns: &ColumnIndex,
        row: &'r CsvRow,
    ) -> Result<QifRecord<'r>, ConvertError> {
        let header = &self.config.header_row_map;
        let field = |field: Field| columns.get(row, header.column(field));

        let date = field(Field::Date)?;
        let action_text = field(Field::Action)?;
        let action = self
            .config
            .actions
            .resolve(action_text)
            .ok_or_else(|| ConvertError::unknown_action(action_text))?;
        let security = field(Field::Security)?;
        let price = parse_signed_money(field(Field::Price)?, false)?;
        let value = parse_signed_money(field(Field::Value)?, false)?;
        let quantity = parse_signed_money(field(Field::Quantity)?, true)?;
        let memo = field(Field::Memo)?;

        Ok(QifRecord {
            date,
            action,
            security,
            price,
            value,
            quantity,
            memo,
        })
    }

    /// Index of the first destination that accepts `row`
    ///
    /// Only the match columns of destinations up to the first match are read.
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` if a tested match column is not in the header.
    pub fn route(&self, columns: &ColumnIndex, row: &CsvRow) -> Result<Option<usize>, ConvertError> {
        for (index, destination) in self.config.destinations.iter().enumerate() {
            let value = columns.get(row, destination.match_column())?;
            if destination.matches(value) {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Log mapped columns the header lacks; rows fail only if they reach one
    fn warn_on_unmapped_columns(&self, columns: &ColumnIndex) {
        let header = &self.config.header_row_map;
        let mapped = Field::ALL.iter().map(|&field| header.column(field));
        let matched = self.config.destinations.iter().map(|d| d.match_column());

        for column in mapped.chain(matched) {
            if !columns.contains(column) {
                warn!(column, "Configured column not found in CSV header");
            }
        }
    }

    fn process_row<W: Write>(
        &self,
        columns: &ColumnIndex,
        row: &CsvRow,
        outputs: &mut DestinationSet<W>,
    ) -> Result<(), ConvertError> {
        let record = self.convert_row(columns, row)?.to_string();

        match self.route(columns, row)? {
            Some(index) => {
                debug!(
                    line = row.line(),
                    file = self.config.destinations[index].name(),
                    "Record routed"
                );
                outputs.write(index, &record)
            }
            None => Err(ConvertError::routing(&record)),
        }
    }
}
