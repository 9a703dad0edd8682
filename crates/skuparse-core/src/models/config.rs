//! Configuration structures for SKU recognition.
//!
//! These are plain serde records. Engines are compiled from them once by
//! [`SkuParser::from_config`](crate::parser::SkuParser::from_config) and the
//! `from_config`/`from_record` factories of the individual engines.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::features::{SearchOrder, ValueFormat};

/// Main configuration for the skuparse pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// SKU normalization applied before matching.
    pub preprocessing: PreprocessConfig,

    /// Classification tables, e.g. brand and category.
    pub tables: Vec<TableConfig>,

    /// Attribute chains, resolved in declaration order.
    pub attributes: Vec<AttributeConfig>,
}

/// SKU preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Apply base cleaning (brackets, slashes, leading notes, ...).
    pub clean: bool,

    /// Upper-case and pad the SKU with spaces before classification.
    pub uppercase_for_classification: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            clean: true,
            uppercase_for_classification: true,
        }
    }
}

/// A named, ordered list of identifier rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub rules: Vec<RuleRecord>,
}

/// One classification candidate.
///
/// All four identifier lists must be present; each accepts a JSON array, a
/// single `;`-separated string or `null` (an empty cell). Empty entries are
/// dropped. An absent list is reported when the table is compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub label: String,
    #[serde(default, deserialize_with = "identifier_list", skip_serializing_if = "Option::is_none")]
    pub main: Option<Vec<String>>,
    #[serde(default, deserialize_with = "identifier_list", skip_serializing_if = "Option::is_none")]
    pub limiting_main: Option<Vec<String>>,
    #[serde(default, deserialize_with = "identifier_list", skip_serializing_if = "Option::is_none")]
    pub limiting_additional: Option<Vec<String>>,
    #[serde(default, deserialize_with = "identifier_list", skip_serializing_if = "Option::is_none")]
    pub excluding: Option<Vec<String>>,
}

impl RuleRecord {
    /// Record with every identifier list present.
    pub fn new(
        label: impl Into<String>,
        main: &[&str],
        limiting_main: &[&str],
        limiting_additional: &[&str],
        excluding: &[&str],
    ) -> Self {
        let list = |ids: &[&str]| -> Option<Vec<String>> {
            Some(ids.iter().map(|id| id.to_string()).collect())
        };
        Self {
            label: label.into(),
            main: list(main),
            limiting_main: list(limiting_main),
            limiting_additional: list(limiting_additional),
            excluding: list(excluding),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdentifierList {
    List(Vec<String>),
    Joined(String),
}

/// Only called for present fields, so `null` still yields `Some`.
fn identifier_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IdentifierList>::deserialize(deserializer)?;
    let ids: Vec<String> = match raw {
        None => Vec::new(),
        Some(IdentifierList::List(ids)) => ids,
        Some(IdentifierList::Joined(joined)) => joined.split(';').map(str::to_string).collect(),
    };
    Ok(Some(ids.into_iter().filter(|id| !id.is_empty()).collect()))
}

/// Patterns resolving one attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeConfig {
    pub name: String,

    pub patterns: Vec<PatternRecord>,

    /// Returned when no pattern matches.
    #[serde(default)]
    pub default_value: String,

    /// Cut the matched text out before the next attribute is resolved.
    #[serde(default)]
    pub strip_matched: bool,
}

/// A single detector, tagged by `"type"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternRecord {
    Const {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        regex: String,
        #[serde(default)]
        value: String,
    },
    Value(ValueRecord),
}

/// Numeric detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Indicator regex; a pattern without one never matches.
    pub indicator: Option<IndicatorRecord>,

    /// Static factor applied to every value.
    pub multiplier: f64,

    pub min_value: f64,

    /// Upper bound, unbounded when absent.
    pub max_value: Option<f64>,

    /// Values must be a multiple of this when positive.
    pub multiplicity: f64,

    pub prefix: String,

    pub suffix: String,

    pub addends: Option<AdjacentRecord>,

    pub multipliers: Option<AdjacentRecord>,

    pub range: Option<RangeRecord>,

    pub exceptions: Vec<ExceptionRecord>,

    pub search_order: SearchOrder,

    pub format: ValueFormat,
}

impl Default for ValueRecord {
    fn default() -> Self {
        Self {
            name: None,
            indicator: None,
            multiplier: 1.0,
            min_value: 0.0,
            max_value: None,
            multiplicity: 0.0,
            prefix: String::new(),
            suffix: String::new(),
            addends: None,
            multipliers: None,
            range: None,
            exceptions: Vec::new(),
            search_order: SearchOrder::Straight,
            format: ValueFormat::default(),
        }
    }
}

/// Either a bare regex or a regex with left/right context regexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorRecord {
    Simple(String),
    Composite {
        regex: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        right: Option<String>,
    },
}

/// Value and symbol regexes combined into adjacent-value patterns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjacentRecord {
    pub values: Vec<String>,
    pub symbols: Vec<String>,
}

/// Range border patterns plus the separator used in the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeRecord {
    #[serde(flatten)]
    pub borders: AdjacentRecord,
    #[serde(default)]
    pub separator: String,
}

/// Context in which an indicator occurrence is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExceptionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub own: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
}

impl ParserConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// A small working configuration: one brand table and a weight attribute.
    pub fn sample() -> Self {
        Self {
            preprocessing: PreprocessConfig::default(),
            tables: vec![TableConfig {
                name: "brand".to_string(),
                rules: vec![RuleRecord::new("ACME", &["ACM"], &[], &[], &["USED"])],
            }],
            attributes: vec![AttributeConfig {
                name: "weight".to_string(),
                patterns: vec![PatternRecord::Value(ValueRecord {
                    name: Some("kilograms".to_string()),
                    indicator: Some(IndicatorRecord::Simple(r"\d+[.,]?\d*\s*kg".to_string())),
                    multiplier: 1000.0,
                    suffix: "g".to_string(),
                    range: Some(RangeRecord {
                        borders: AdjacentRecord {
                            values: vec![r"\d+[.,]?\d*".to_string()],
                            symbols: vec![r"\s*-\s*".to_string()],
                        },
                        separator: "-".to_string(),
                    }),
                    ..ValueRecord::default()
                })],
                default_value: String::new(),
                strip_matched: true,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identifier_lists() {
        let json = r#"{
            "label": "ACME",
            "main": "ACM;;ACME ",
            "limiting_main": [],
            "limiting_additional": null,
            "excluding": ["USED", ""]
        }"#;
        let rule: RuleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rule.main, Some(vec!["ACM".to_string(), "ACME ".to_string()]));
        assert_eq!(rule.limiting_main, Some(Vec::new()));
        assert_eq!(rule.limiting_additional, Some(Vec::new()));
        assert_eq!(rule.excluding, Some(vec!["USED".to_string()]));
    }

    #[test]
    fn test_missing_identifier_column_is_kept_absent() {
        let json = r#"{"label": "ACME", "main": ["ACM"], "limiting_main": [], "excluding": []}"#;
        let rule: RuleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rule.limiting_additional, None);
        assert_eq!(rule.limiting_main, Some(Vec::new()));
    }

    #[test]
    fn test_pattern_records() {
        let json = r#"[
            {"type": "const", "regex": "sugar free", "value": "0"},
            {"type": "value", "indicator": "\\d+\\s*kg", "multiplier": 1000,
             "format": {"kind": "float_comma", "round": 2}, "search_order": "max"},
            {"type": "value", "indicator": {"regex": "\\d+", "left": "vol\\s*$"},
             "range": {"values": ["\\d+"], "symbols": ["-"], "separator": "-"}}
        ]"#;
        let records: Vec<PatternRecord> = serde_json::from_str(json).unwrap();
        assert!(matches!(&records[0], PatternRecord::Const { value, .. } if value == "0"));

        let PatternRecord::Value(weight) = &records[1] else {
            panic!("expected value pattern");
        };
        assert_eq!(weight.multiplier, 1000.0);
        assert_eq!(weight.format, ValueFormat::FloatComma { round: Some(2) });
        assert_eq!(weight.search_order, SearchOrder::Max);
        assert_eq!(weight.max_value, None);

        let PatternRecord::Value(volume) = &records[2] else {
            panic!("expected value pattern");
        };
        assert!(matches!(
            &volume.indicator,
            Some(IndicatorRecord::Composite { left: Some(_), right: None, .. })
        ));
        assert_eq!(volume.range.as_ref().unwrap().borders.symbols, vec!["-"]);
        assert_eq!(volume.multiplier, 1.0);
    }

    #[test]
    fn test_default_config() {
        let config = ParserConfig::from_json("{}").unwrap();
        assert!(config.tables.is_empty());
        assert!(config.preprocessing.clean);
    }

    #[test]
    fn test_sample_survives_json() {
        let json = serde_json::to_string(&ParserConfig::sample()).unwrap();
        let config = ParserConfig::from_json(&json).unwrap();
        assert_eq!(config.tables[0].rules, ParserConfig::sample().tables[0].rules);
        assert_eq!(config.attributes[0].name, "weight");
    }
}
