//! File-based conversion pipeline
//!
//! Wires the components together for one run over files on disk:
//! 1. Checks that both input files exist
//! 2. Loads and resolves the configuration
//! 3. Opens the CSV file and reads its header row
//! 4. Runs the [`ConversionEngine`], creating one QIF file per destination
//!
//! Nothing is written until the configuration has been fully validated, so a
//! bad configuration never truncates existing QIF files.

use crate::core::{ConversionEngine, ResolvedConfig, RunSummary};
use crate::io::{create_file, load_config, CsvSource};
use crate::types::ConvertError;
use std::path::Path;
use tracing::info;

/// Convert `csv_path` according to the configuration at `config_path`
///
/// # Errors
///
/// - `InputNotFound` if either path is not an existing file (CSV checked first)
/// - Any configuration, CSV, row or output error from the run
///
/// # Examples
///
/// ```no_run
/// use csv_to_qif::convert_files;
/// use std::path::Path;
///
/// let summary = convert_files(Path::new("export.csv"), Path::new("config.json"))?;
/// println!("{} CSV records processed", summary.records);
/// # Ok::<(), csv_to_qif::ConvertError>(())
/// ```
pub fn convert_files(csv_path: &Path, config_path: &Path) -> Result<RunSummary, ConvertError> {
    if !csv_path.is_file() {
        return Err(ConvertError::csv_not_found(&csv_path.display().to_string()));
    }
    if !config_path.is_file() {
        return Err(ConvertError::config_not_found(
            &config_path.display().to_string(),
        ));
    }

    let config = ResolvedConfig::resolve(load_config(config_path)?)?;
    let source = CsvSource::open(csv_path)?;
    let engine = ConversionEngine::new(config);

    info!(
        csv = %csv_path.display(),
        destinations = engine.destinations().len(),
        "Converting CSV file"
    );
    engine.run(source, create_file)
}
