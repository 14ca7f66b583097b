//! Streaming CSV source with header-based column lookup
//!
//! The first CSV row names the columns. [`CsvSource`] reads it once, builds a
//! [`ColumnIndex`] from it, then yields the remaining rows one at a time as
//! [`CsvRow`] values. Fields are looked up by column name through the index.
//!
//! # Design
//!
//! Rows are read with `csv::Reader::read_record` into a fresh `StringRecord`
//! per row, so memory use is O(1) in the file size. The reader is flexible:
//! fields past the header's width are ignored, and a short row only fails
//! when one of its absent columns is asked for. Field values are not
//! trimmed: dates, securities and memos are passed through to the QIF output
//! exactly as exported.
//!
//! # Error Handling
//!
//! - Failure to open the file or read the header row is returned from `open()`
//! - Malformed rows are yielded as `Err(ConvertError::CsvError)` with a line number
//! - Columns that are not in the header surface as `ConvertError::MissingColumn`
//!   when a row is asked for them

use crate::types::ConvertError;
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column name to field position, built from the CSV header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Build an index from a header record
    ///
    /// If a name appears more than once the last occurrence wins.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(position, name)| (name.to_string(), position))
            .collect();
        Self { positions }
    }

    /// Whether the header row has a column called `name`
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Value of column `name` in `row`
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` (without a line number) if the header row has
    /// no such column.
    pub fn get<'r>(&self, row: &'r CsvRow, name: &str) -> Result<&'r str, ConvertError> {
        self.positions
            .get(name)
            .and_then(|&position| row.record.get(position))
            .ok_or_else(|| ConvertError::missing_column(name))
    }
}

/// One data row of the CSV file
#[derive(Debug, Clone)]
pub struct CsvRow {
    record: StringRecord,
    line: u64,
}

impl CsvRow {
    /// 1-based line number of the row in the CSV file
    pub fn line(&self) -> u64 {
        self.line
    }
}

/// Streaming reader over the data rows of a CSV file
#[derive(Debug)]
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    columns: ColumnIndex,
}

impl CsvSource<File> {
    /// Open a CSV file and read its header row
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be opened, or `CsvError` if the
    /// header row cannot be read.
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let file = File::open(path).map_err(|e| ConvertError::IoError {
            message: format!("Failed to open CSV file '{}': {}", path.display(), e),
        })?;

        Self::from_reader(file)
    }
}

impl<R: Read> CsvSource<R> {
    /// Wrap any reader producing CSV text
    pub fn from_reader(input: R) -> Result<Self, ConvertError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(input);

        let columns = ColumnIndex::from_headers(reader.headers()?);

        Ok(Self { reader, columns })
    }

    /// Columns named by the header row
    pub fn columns(&self) -> &ColumnIndex {
        &self.columns
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = Result<CsvRow, ConvertError>;

    /// Read the next data row
    ///
    /// # Returns
    ///
    /// * `Some(Ok(CsvRow))` - Next row
    /// * `Some(Err(ConvertError))` - Malformed CSV or read failure
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();

        match self.reader.read_record(&mut record) {
            Ok(true) => {
                let line = record
                    .position()
                    .map(|pos| pos.line())
                    .unwrap_or_else(|| self.reader.position().line());
                Some(Ok(CsvRow { record, line }))
            }
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_open_reads_header() {
        let file = create_temp_csv("Date,Action,Amount\n1/2/2020,BUY,10.00\n");

        let source = CsvSource::open(file.path()).unwrap();
        assert!(source.columns().contains("Date"));
        assert!(source.columns().contains("Amount"));
        assert!(!source.columns().contains("Memo"));
    }

    #[test]
    fn test_open_fails_on_missing_file() {
        let result = CsvSource::open(Path::new("nonexistent.csv"));
        match result {
            Err(ConvertError::IoError { message }) => {
                assert!(message.contains("Failed to open CSV file"))
            }
            other => panic!("Expected IoError, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_are_looked_up_by_name() {
        let source =
            CsvSource::from_reader("Date,Action,Amount\n1/2/2020,BUY,10.00\n3/4/2021,SELL,(5)\n".as_bytes())
                .unwrap();
        let columns = source.columns().clone();
        let rows: Vec<_> = source.collect::<Result<_, _>>().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(columns.get(&rows[0], "Action").unwrap(), "BUY");
        assert_eq!(columns.get(&rows[1], "Amount").unwrap(), "(5)");
        assert_eq!(columns.get(&rows[1], "Date").unwrap(), "3/4/2021");
    }

    #[test]
    fn test_line_numbers_count_header() {
        let source = CsvSource::from_reader("A,B\n1,2\n3,4\n5,6\n".as_bytes()).unwrap();
        let lines: Vec<u64> = source.map(|row| row.unwrap().line()).collect();

        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn test_missing_column_error() {
        let mut source = CsvSource::from_reader("A,B\n1,2\n".as_bytes()).unwrap();
        let columns = source.columns().clone();
        let row = source.next().unwrap().unwrap();

        assert_eq!(
            columns.get(&row, "C").unwrap_err(),
            ConvertError::missing_column("C")
        );
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let mut source = CsvSource::from_reader("Memo,Security\n  spaced memo , Apple\n".as_bytes()).unwrap();
        let columns = source.columns().clone();
        let row = source.next().unwrap().unwrap();

        assert_eq!(columns.get(&row, "Memo").unwrap(), "  spaced memo ");
        assert_eq!(columns.get(&row, "Security").unwrap(), " Apple");
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let mut source =
            CsvSource::from_reader("Security,Amount\n\"Apple, Inc.\",\"$1,234.56\"\n".as_bytes())
                .unwrap();
        let columns = source.columns().clone();
        let row = source.next().unwrap().unwrap();

        assert_eq!(columns.get(&row, "Security").unwrap(), "Apple, Inc.");
        assert_eq!(columns.get(&row, "Amount").unwrap(), "$1,234.56");
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let mut source = CsvSource::from_reader("Name,Name\nfirst,second\n".as_bytes()).unwrap();
        let columns = source.columns().clone();
        let row = source.next().unwrap().unwrap();

        assert_eq!(columns.get(&row, "Name").unwrap(), "second");
    }

    #[test]
    fn test_extra_trailing_field_is_ignored() {
        let mut source = CsvSource::from_reader("A,B\n1,2,\n".as_bytes()).unwrap();
        let columns = source.columns().clone();
        let row = source.next().unwrap().unwrap();

        assert_eq!(columns.get(&row, "A").unwrap(), "1");
        assert_eq!(columns.get(&row, "B").unwrap(), "2");
    }

    #[test]
    fn test_short_row_reports_missing_column() {
        let source = CsvSource::from_reader("A,B\n1,2\n3\n".as_bytes()).unwrap();
        let columns = source.columns().clone();
        let rows: Vec<_> = source.collect::<Result<_, _>>().unwrap();

        assert_eq!(rows[1].line(), 3);
        assert_eq!(columns.get(&rows[1], "A").unwrap(), "3");
        assert_eq!(
            columns.get(&rows[1], "B").unwrap_err(),
            ConvertError::missing_column("B")
        );
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let source = CsvSource::from_reader("A,B\n".as_bytes()).unwrap();
        assert_eq!(source.count(), 0);
    }
}
