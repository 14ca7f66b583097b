//! Configuration resolution
//!
//! Turns the declarative [`ConversionConfig`] into the lookup structures the
//! engine needs per row:
//! - an inverted, case-folded action table (CSV text -> QIF action)
//! - the ordered list of output destinations with compiled routing patterns
//!
//! Resolution happens once, before any output file is created, so a bad
//! pattern or conflicting action mapping never leaves empty output files behind.

use crate::types::{ConversionConfig, ConvertError, HeaderRowMap, QifFileConfig};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Case-insensitive lookup from CSV action text to canonical QIF action code
#[derive(Debug, Clone, Default)]
pub struct ActionLookup {
    by_csv_text: HashMap<String, String>,
}

impl ActionLookup {
    /// Invert an action code map
    ///
    /// Entries mapped to an empty string mark actions the CSV never uses and
    /// are left out, so they can never be matched.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateActionMapping` if two canonical actions map to the
    /// same CSV text, ignoring case.
    pub fn from_action_code_map(
        action_code_map: &BTreeMap<String, String>,
    ) -> Result<Self, ConvertError> {
        let mut by_csv_text: HashMap<String, String> = HashMap::new();

        for (canonical, csv_text) in action_code_map {
            if csv_text.is_empty() {
                continue;
            }

            let key = csv_text.to_uppercase();
            if let Some(existing) = by_csv_text.get(&key) {
                return Err(ConvertError::DuplicateActionMapping {
                    csv_text: key,
                    first: existing.clone(),
                    second: canonical.clone(),
                });
            }
            by_csv_text.insert(key, canonical.clone());
        }

        Ok(Self { by_csv_text })
    }

    /// Canonical action for a raw CSV action value, if one is mapped
    pub fn resolve(&self, csv_action: &str) -> Option<&str> {
        self.by_csv_text
            .get(&csv_action.to_uppercase())
            .map(String::as_str)
    }

    /// Number of usable mappings
    pub fn len(&self) -> usize {
        self.by_csv_text.len()
    }

    /// Whether no action can be resolved at all
    pub fn is_empty(&self) -> bool {
        self.by_csv_text.is_empty()
    }
}

/// An output destination with its routing rule compiled
#[derive(Debug, Clone)]
pub struct Destination {
    name: String,
    match_column: String,
    pattern: Regex,
}

impl Destination {
    /// Compile the routing pattern of a configured QIF file
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if `matchRegEx` is not a valid regex.
    pub fn compile(file: &QifFileConfig) -> Result<Self, ConvertError> {
        let pattern =
            Regex::new(&file.match_regex).map_err(|e| ConvertError::InvalidPattern {
                file: file.name.clone(),
                pattern: file.match_regex.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            name: file.name.clone(),
            match_column: file.match_column.clone(),
            pattern,
        })
    }

    /// Output path
    pub fn name(&self) -> &str {
        &self.name
    }

    /// CSV column tested by this destination
    pub fn match_column(&self) -> &str {
        &self.match_column
    }

    /// Whether the pattern matches at the start of `value`
    ///
    /// The match need not span the whole value: `401k` matches `401k Rollover`
    /// but not `Rollover 401k`.
    pub fn matches(&self, value: &str) -> bool {
        // Leftmost-first search: a match at offset 0 is found whenever one exists
        self.pattern.find(value).is_some_and(|m| m.start() == 0)
    }
}

/// Configuration in lookup-ready form
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub header_row_map: HeaderRowMap,
    pub actions: ActionLookup,
    pub destinations: Vec<Destination>,
}

impl ResolvedConfig {
    /// Resolve a validated configuration
    ///
    /// # Errors
    ///
    /// - `DuplicateActionMapping` for conflicting action texts
    /// - `InvalidPattern` for the first routing pattern that fails to compile
    pub fn resolve(config: ConversionConfig) -> Result<Self, ConvertError> {
        let actions = ActionLookup::from_action_code_map(&config.action_code_map)?;
        let destinations = config
            .qif_files
            .iter()
            .map(Destination::compile)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            actions = actions.len(),
            unused_actions = config.action_code_map.len() - actions.len(),
            destinations = destinations.len(),
            "Configuration resolved"
        );

        Ok(Self {
            header_row_map: config.header_row_map,
            actions,
            destinations,
        })
    }
}
