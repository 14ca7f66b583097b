//! Configuration file loading

use crate::types::{ConversionConfig, ConvertError};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read and validate the JSON conversion configuration at `path`
///
/// # Errors
///
/// - `IoError` if the file cannot be read
/// - `MalformedConfig` / `MissingConfigKeys` from validation
pub fn load_config(path: &Path) -> Result<ConversionConfig, ConvertError> {
    let text = fs::read_to_string(path).map_err(|e| ConvertError::IoError {
        message: format!("Failed to read config file '{}': {}", path.display(), e),
    })?;

    let config = ConversionConfig::from_json_str(&text)?;
    debug!(
        path = %path.display(),
        actions = config.action_code_map.len(),
        qif_files = config.qif_files.len(),
        "Configuration loaded"
    );
    Ok(config)
}
