//! SKU parser combining classification tables and attribute chains.

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::error::ConfigError;
use crate::features::PatternChain;
use crate::identifiers::{ClassificationAudit, ClassificationTable};
use crate::models::config::{ParserConfig, PreprocessConfig};
use crate::preprocess::{clean_sku, for_classification};

/// A named output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: String,
}

impl NamedValue {
    fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Audit of one table for one SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableAudit {
    pub table: String,
    #[serde(flatten)]
    pub audit: ClassificationAudit,
}

/// Structured data recognized in one SKU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSku {
    /// One label per table, empty when no rule fired.
    pub labels: Vec<NamedValue>,
    /// One value per attribute.
    pub attributes: Vec<NamedValue>,
    /// Filled only by [`SkuParser::parse_with_audit`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audits: Vec<TableAudit>,
}

impl ParsedSku {
    pub fn label(&self, table: &str) -> Option<&str> {
        find_value(&self.labels, table)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_value(&self.attributes, name)
    }
}

fn find_value<'a>(values: &'a [NamedValue], name: &str) -> Option<&'a str> {
    values
        .iter()
        .find(|v| v.name == name)
        .map(|v| v.value.as_str())
}

#[derive(Debug, Clone)]
struct Attribute {
    chain: PatternChain,
    strip_matched: bool,
}

/// Immutable, thread-safe SKU parser built once from configuration.
#[derive(Debug, Clone, Default)]
pub struct SkuParser {
    preprocessing: PreprocessConfig,
    tables: Vec<ClassificationTable>,
    attributes: Vec<Attribute>,
}

impl SkuParser {
    /// Compile every table and attribute of `config`.
    pub fn from_config(config: &ParserConfig) -> Result<Self, ConfigError> {
        ensure_unique(config.tables.iter().map(|t| t.name.as_str()), "table")?;
        ensure_unique(config.attributes.iter().map(|a| a.name.as_str()), "attribute")?;

        let tables = config
            .tables
            .iter()
            .map(ClassificationTable::from_config)
            .collect::<Result<Vec<_>, _>>()?;

        let attributes = config
            .attributes
            .iter()
            .map(|a| {
                Ok(Attribute {
                    chain: PatternChain::from_config(a)?,
                    strip_matched: a.strip_matched,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        info!(
            "SKU parser ready: {} tables, {} attributes",
            tables.len(),
            attributes.len()
        );

        Ok(Self {
            preprocessing: config.preprocessing.clone(),
            tables,
            attributes,
        })
    }

    /// Load a JSON configuration file and compile it.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let config = ParserConfig::from_file(path)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(Self::from_config(&config)?)
    }

    /// Add a table built in code.
    pub fn with_table(mut self, table: ClassificationTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Add an attribute chain built in code.
    pub fn with_attribute(mut self, chain: PatternChain, strip_matched: bool) -> Self {
        self.attributes.push(Attribute {
            chain,
            strip_matched,
        });
        self
    }

    pub fn with_preprocessing(mut self, preprocessing: PreprocessConfig) -> Self {
        self.preprocessing = preprocessing;
        self
    }

    pub fn table(&self, name: &str) -> Option<&ClassificationTable> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &ClassificationTable> {
        self.tables.iter()
    }

    pub fn attribute(&self, name: &str) -> Option<&PatternChain> {
        self.attributes
            .iter()
            .map(|a| &a.chain)
            .find(|c| c.name() == name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &PatternChain> {
        self.attributes.iter().map(|a| &a.chain)
    }

    /// SKU as handed to the attribute chains.
    pub fn normalize(&self, sku: &str) -> String {
        if self.preprocessing.clean {
            clean_sku(sku)
        } else {
            sku.to_string()
        }
    }

    /// SKU as handed to the classification tables.
    pub fn classification_text(&self, normalized: &str) -> String {
        if self.preprocessing.uppercase_for_classification {
            for_classification(normalized)
        } else {
            normalized.to_string()
        }
    }

    /// Recognize labels and attributes of one SKU.
    pub fn parse(&self, sku: &str) -> ParsedSku {
        self.run(sku, false)
    }

    /// Like [`parse`](Self::parse), also returning every table's audit.
    pub fn parse_with_audit(&self, sku: &str) -> ParsedSku {
        self.run(sku, true)
    }

    fn run(&self, sku: &str, audit: bool) -> ParsedSku {
        let normalized = self.normalize(sku);
        let class_text = self.classification_text(&normalized);

        let mut parsed = ParsedSku::default();
        for table in &self.tables {
            if audit {
                let result = table.classify_with_audit(&class_text);
                parsed.labels.push(NamedValue::new(table.name(), result.label.as_str()));
                parsed.audits.push(TableAudit {
                    table: table.name().to_string(),
                    audit: result,
                });
            } else {
                parsed
                    .labels
                    .push(NamedValue::new(table.name(), table.classify(&class_text)));
            }
        }

        let mut remaining = normalized;
        for attribute in &self.attributes {
            let value = if attribute.strip_matched {
                let (value, rest) = attribute.chain.resolve_and_strip(&remaining);
                remaining = rest;
                value
            } else {
                attribute.chain.resolve(&remaining)
            };
            parsed
                .attributes
                .push(NamedValue::new(attribute.chain.name(), value));
        }

        parsed
    }
}

fn ensure_unique<'a>(names: impl Iterator<Item = &'a str>, kind: &str) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateName(format!("{kind} {name}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"{
        "tables": [
            {"name": "brand", "rules": [
                {"label": "ACME", "main": " ACM ", "limiting_main": "", "limiting_additional": "", "excluding": "USED"},
                {"label": "BOLT", "main": ["BOLT"], "limiting_main": [], "limiting_additional": [], "excluding": []}
            ]},
            {"name": "category", "rules": [
                {"label": "TOOLS", "main": ["HAMMER", "WRENCH"], "limiting_main": [], "limiting_additional": [], "excluding": []}
            ]}
        ],
        "attributes": [
            {"name": "weight", "strip_matched": true, "patterns": [
                {"type": "value", "indicator": "\\d+[.,]?\\d*\\s*kg", "multiplier": 1000, "suffix": "g"}
            ]},
            {"name": "count", "default_value": "1", "patterns": [
                {"type": "value", "indicator": "\\d+\\s*(pcs|шт)", "format": {"kind": "int"}}
            ]},
            {"name": "number", "patterns": [
                {"type": "value", "indicator": "\\d+"}
            ]}
        ]
    }"#;

    fn parser() -> SkuParser {
        SkuParser::from_config(&ParserConfig::from_json(CONFIG).unwrap()).unwrap()
    }

    #[test]
    fn test_parse_sku() {
        let parsed = parser().parse("acm hammer 2,5 kg 3 pcs");
        assert_eq!(parsed.label("brand"), Some("ACME"));
        assert_eq!(parsed.label("category"), Some("TOOLS"));
        assert_eq!(parsed.attribute("weight"), Some("2500g"));
        assert_eq!(parsed.attribute("count"), Some("3"));
        assert!(parsed.audits.is_empty());
    }

    #[test]
    fn test_stripped_attribute_hides_its_number() {
        let parsed = parser().parse("bolt 5kg");
        assert_eq!(parsed.attribute("weight"), Some("5000g"));
        assert_eq!(parsed.attribute("number"), Some(""));
        assert_eq!(parsed.attribute("count"), Some("1"));
    }

    #[test]
    fn test_whole_word_identifier() {
        let parsed = parser().parse("acmeco hammer");
        assert_eq!(parsed.label("brand"), Some(""));
    }

    #[test]
    fn test_cleaning_before_matching() {
        let parsed = parser().parse("123: [acm] hammer");
        assert_eq!(parsed.label("brand"), Some(""));
        let parsed = parser().parse("123: acm  hammer");
        assert_eq!(parsed.label("brand"), Some("ACME"));
    }

    #[test]
    fn test_empty_sku() {
        let parsed = parser().parse("");
        assert_eq!(parsed.label("brand"), Some(""));
        assert_eq!(parsed.attribute("weight"), Some(""));
        assert_eq!(parsed.attribute("count"), Some(""));
    }

    #[test]
    fn test_parse_with_audit() {
        let parsed = parser().parse_with_audit("acm used hammer");
        assert_eq!(parsed.label("brand"), Some(""));
        assert_eq!(parsed.audits.len(), 2);
        assert_eq!(parsed.audits[0].table, "brand");
        assert_eq!(
            parsed.audits[0].audit.trail[0].excluded_by.as_deref(),
            Some("USED")
        );
        assert_eq!(parsed.audits[1].audit.label, "TOOLS");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut config = ParserConfig::from_json(CONFIG).unwrap();
        config.tables.push(config.tables[0].clone());
        let err = SkuParser::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateName(name) if name == "table brand"));
    }

    #[test]
    fn test_missing_identifier_column_rejected() {
        let config = ParserConfig::from_json(
            r#"{"tables": [{"name": "brand", "rules": [
                {"label": "ACME", "main": "ACM", "limiting_main": "", "excluding": ""}
            ]}]}"#,
        )
        .unwrap();
        let err = SkuParser::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(field) if field.starts_with("limiting_additional")));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let config = ParserConfig::from_json(
            r#"{"attributes": [{"name": "w", "patterns": [{"type": "const", "regex": "(", "value": "x"}]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            SkuParser::from_config(&config),
            Err(ConfigError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SkuParser>();

        let parser = std::sync::Arc::new(parser());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let parser = parser.clone();
                std::thread::spawn(move || (i, parser.parse(&format!("bolt {i}kg")).attributes))
            })
            .collect();
        for handle in handles {
            let (i, attributes) = handle.join().unwrap();
            let weight = if i == 0 { "0g".to_string() } else { format!("{i}000g") };
            assert_eq!(attributes[0].value, weight);
        }
    }
}
