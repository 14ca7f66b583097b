//! Declarative conversion configuration
//!
//! The JSON configuration file is deserialized into loosely-typed raw
//! structures first, then validated in a single pass into [`ConversionConfig`].
//! Validation collects every missing key so the user sees all of them at once
//! instead of fixing the file one key at a time.

use crate::types::ConvertError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Semantic fields of a QIF investment record that are read from the CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Action,
    Security,
    Price,
    Quantity,
    Value,
    Memo,
}

impl Field {
    /// All fields, in the order they are listed in the configuration file
    pub const ALL: [Field; 7] = [
        Field::Date,
        Field::Action,
        Field::Security,
        Field::Price,
        Field::Quantity,
        Field::Value,
        Field::Memo,
    ];

    /// Key naming this field inside `csvFile.headerRowMap`
    pub fn config_key(&self) -> &'static str {
        match self {
            Field::Date => "dateColumn",
            Field::Action => "actionColumn",
            Field::Security => "securityColumn",
            Field::Price => "priceColumn",
            Field::Quantity => "quantityColumn",
            Field::Value => "valueColumn",
            Field::Memo => "memoColumn",
        }
    }
}

/// Mapping from semantic fields to CSV column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRowMap {
    pub date: String,
    pub action: String,
    pub security: String,
    pub price: String,
    pub quantity: String,
    pub value: String,
    pub memo: String,
}

impl HeaderRowMap {
    /// CSV column name configured for `field`
    pub fn column(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::Action => &self.action,
            Field::Security => &self.security,
            Field::Price => &self.price,
            Field::Quantity => &self.quantity,
            Field::Value => &self.value,
            Field::Memo => &self.memo,
        }
    }
}

/// One output QIF file and the rule that routes records to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QifFileConfig {
    /// Output path
    pub name: String,
    /// CSV column whose value is tested
    pub match_column: String,
    /// Pattern matched from the start of the column value
    pub match_regex: String,
}

/// Validated conversion configuration
///
/// Immutable for the duration of a run. Built by [`ConversionConfig::from_json_str`]
/// and resolved into lookup tables by [`crate::core::ResolvedConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    pub header_row_map: HeaderRowMap,
    /// Canonical QIF action code -> CSV action text (empty means unused)
    pub action_code_map: BTreeMap<String, String>,
    /// Output files in priority order
    pub qif_files: Vec<QifFileConfig>,
}

impl ConversionConfig {
    /// Parse and validate a configuration from JSON text
    ///
    /// # Errors
    ///
    /// - `MalformedConfig` if the text is not JSON or a value has the wrong type
    /// - `MissingConfigKeys` listing every required key that is absent
    pub fn from_json_str(text: &str) -> Result<Self, ConvertError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        raw.validate()
    }

    /// Validate an already parsed JSON value
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConvertError> {
        let raw: RawConfig = serde_json::from_value(value)?;
        raw.validate()
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "csvFile")]
    csv_file: Option<RawCsvFile>,
    #[serde(rename = "qifFiles")]
    qif_files: Option<Vec<RawQifFile>>,
}

#[derive(Debug, Deserialize)]
struct RawCsvFile {
    #[serde(rename = "headerRowMap")]
    header_row_map: Option<RawHeaderRowMap>,
    #[serde(rename = "actionCodeMap")]
    action_code_map: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHeaderRowMap {
    date_column: Option<String>,
    action_column: Option<String>,
    security_column: Option<String>,
    price_column: Option<String>,
    quantity_column: Option<String>,
    value_column: Option<String>,
    memo_column: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawQifFile {
    name: Option<String>,
    #[serde(rename = "matchColumn")]
    match_column: Option<String>,
    #[serde(rename = "matchRegEx")]
    match_regex: Option<String>,
}

fn require<T>(value: Option<T>, key: String, missing: &mut Vec<String>) -> Option<T> {
    if value.is_none() {
        missing.push(key);
    }
    value
}

impl RawConfig {
    fn validate(self) -> Result<ConversionConfig, ConvertError> {
        let mut missing = Vec::new();

        let (header_row_map, action_code_map) = match self.csv_file {
            Some(csv_file) => {
                let header = match csv_file.header_row_map {
                    Some(header) => header.validate(&mut missing),
                    None => {
                        missing.push("csvFile.headerRowMap".to_string());
                        None
                    }
                };
                let actions = require(
                    csv_file.action_code_map,
                    "csvFile.actionCodeMap".to_string(),
                    &mut missing,
                );
                (header, actions)
            }
            None => {
                missing.push("csvFile".to_string());
                (None, None)
            }
        };

        let qif_files = require(self.qif_files, "qifFiles".to_string(), &mut missing).map(
            |files| {
                files
                    .into_iter()
                    .enumerate()
                    .map(|(index, file)| file.validate(index, &mut missing))
                    .collect::<Vec<_>>()
            },
        );

        match (header_row_map, action_code_map, qif_files) {
            (Some(header_row_map), Some(action_code_map), Some(qif_files))
                if missing.is_empty() =>
            {
                Ok(ConversionConfig {
                    header_row_map,
                    action_code_map,
                    qif_files: qif_files.into_iter().flatten().collect(),
                })
            }
            _ => Err(ConvertError::MissingConfigKeys { keys: missing }),
        }
    }
}

impl RawHeaderRowMap {
    fn validate(self, missing: &mut Vec<String>) -> Option<HeaderRowMap> {
        let mut take = |value: Option<String>, field: Field| {
            require(
                value,
                format!("csvFile.headerRowMap.{}", field.config_key()),
                missing,
            )
        };

        let date = take(self.date_column, Field::Date);
        let action = take(self.action_column, Field::Action);
        let security = take(self.security_column, Field::Security);
        let price = take(self.price_column, Field::Price);
        let quantity = take(self.quantity_column, Field::Quantity);
        let value = take(self.value_column, Field::Value);
        let memo = take(self.memo_column, Field::Memo);

        Some(HeaderRowMap {
            date: date?,
            action: action?,
            security: security?,
            price: price?,
            quantity: quantity?,
            value: value?,
            memo: memo?,
        })
    }
}

impl RawQifFile {
    fn validate(self, index: usize, missing: &mut Vec<String>) -> Option<QifFileConfig> {
        let name = require(self.name, format!("qifFiles[{}].name", index), missing);
        let match_column = require(
            self.match_column,
            format!("qifFiles[{}].matchColumn", index),
            missing,
        );
        let match_regex = require(
            self.match_regex,
            format!("qifFiles[{}].matchRegEx", index),
            missing,
        );

        Some(QifFileConfig {
            name: name?,
            match_column: match_column?,
            match_regex: match_regex?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn full_config() -> serde_json::Value {
        json!({
            "csvFile": {
                "headerRowMap": {
                    "dateColumn": "Date",
                    "actionColumn": "Action",
                    "securityColumn": "Symbol",
                    "priceColumn": "Price",
                    "quantityColumn": "Quantity",
                    "valueColumn": "Amount",
                    "memoColumn": "Description"
                },
                "actionCodeMap": {
                    "Buy": "YOU BOUGHT",
                    "Sell": "YOU SOLD",
                    "ShrsIn": ""
                }
            },
            "qifFiles": [
                { "name": "roth.qif", "matchColumn": "Account", "matchRegEx": "Roth" },
                { "name": "brokerage.qif", "matchColumn": "Account", "matchRegEx": ".*" }
            ]
        })
    }

    #[test]
    fn test_full_config_parses() {
        let config = ConversionConfig::from_json_value(full_config()).unwrap();

        assert_eq!(config.header_row_map.date, "Date");
        assert_eq!(config.header_row_map.column(Field::Value), "Amount");
        assert_eq!(config.action_code_map.len(), 3);
        assert_eq!(config.action_code_map["ShrsIn"], "");
        assert_eq!(config.qif_files.len(), 2);
        assert_eq!(config.qif_files[0].name, "roth.qif");
        assert_eq!(config.qif_files[1].match_regex, ".*");
    }

    #[test]
    fn test_from_json_str_matches_from_value() {
        let text = full_config().to_string();
        assert_eq!(
            ConversionConfig::from_json_str(&text).unwrap(),
            ConversionConfig::from_json_value(full_config()).unwrap()
        );
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let mut value = full_config();
        value["comment"] = json!("exported from my broker");
        value["csvFile"]["headerRowMap"]["accountColumn"] = json!("Account");

        assert!(ConversionConfig::from_json_value(value).is_ok());
    }

    #[rstest]
    #[case::no_csv_file("/csvFile", vec!["csvFile"])]
    #[case::no_qif_files("/qifFiles", vec!["qifFiles"])]
    #[case::no_header_map("/csvFile/headerRowMap", vec!["csvFile.headerRowMap"])]
    #[case::no_action_map("/csvFile/actionCodeMap", vec!["csvFile.actionCodeMap"])]
    #[case::no_memo("/csvFile/headerRowMap/memoColumn", vec!["csvFile.headerRowMap.memoColumn"])]
    #[case::no_match_regex("/qifFiles/1/matchRegEx", vec!["qifFiles[1].matchRegEx"])]
    fn test_missing_key_reported(#[case] pointer: &str, #[case] expected: Vec<&str>) {
        let mut value = full_config();
        let (parent, key) = pointer.rsplit_once('/').unwrap();
        let parent = if parent.is_empty() {
            &mut value
        } else {
            value.pointer_mut(parent).unwrap()
        };
        match parent {
            serde_json::Value::Object(map) => {
                map.remove(key);
            }
            other => panic!("Unexpected parent {:?}", other),
        }

        let error = ConversionConfig::from_json_value(value).unwrap_err();
        assert_eq!(
            error,
            ConvertError::MissingConfigKeys {
                keys: expected.into_iter().map(String::from).collect()
            }
        );
    }

    #[test]
    fn test_all_missing_keys_reported_together() {
        let value = json!({
            "csvFile": {
                "headerRowMap": { "dateColumn": "Date", "memoColumn": "Memo" }
            },
            "qifFiles": [ { "name": "out.qif" } ]
        });

        let error = ConversionConfig::from_json_value(value).unwrap_err();
        match error {
            ConvertError::MissingConfigKeys { keys } => assert_eq!(
                keys,
                vec![
                    "csvFile.headerRowMap.actionColumn",
                    "csvFile.headerRowMap.securityColumn",
                    "csvFile.headerRowMap.priceColumn",
                    "csvFile.headerRowMap.quantityColumn",
                    "csvFile.headerRowMap.valueColumn",
                    "csvFile.actionCodeMap",
                    "qifFiles[0].matchColumn",
                    "qifFiles[0].matchRegEx",
                ]
            ),
            other => panic!("Expected MissingConfigKeys, got {:?}", other),
        }
    }

    #[test]
    fn test_null_value_counts_as_missing() {
        let mut value = full_config();
        value["csvFile"]["headerRowMap"]["priceColumn"] = serde_json::Value::Null;

        let error = ConversionConfig::from_json_value(value).unwrap_err();
        assert_eq!(
            error,
            ConvertError::MissingConfigKeys {
                keys: vec!["csvFile.headerRowMap.priceColumn".to_string()]
            }
        );
    }

    #[rstest]
    #[case::not_json("{ this is not json")]
    #[case::wrong_type(r#"{ "csvFile": [], "qifFiles": [] }"#)]
    #[case::numeric_column(r#"{ "csvFile": { "headerRowMap": { "dateColumn": 3 } }, "qifFiles": [] }"#)]
    fn test_malformed_config(#[case] text: &str) {
        let error = ConversionConfig::from_json_str(text).unwrap_err();
        assert!(matches!(error, ConvertError::MalformedConfig { .. }));
    }

    #[test]
    fn test_empty_qif_file_list_is_valid() {
        let mut value = full_config();
        value["qifFiles"] = json!([]);

        let config = ConversionConfig::from_json_value(value).unwrap();
        assert!(config.qif_files.is_empty());
    }
}
