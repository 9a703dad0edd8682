//! Core library for recognizing structured data in product SKU strings.
//!
//! This crate provides:
//! - Classification tables resolving a label (brand, category, ...) from
//!   ordered identifier rules
//! - Numeric and constant feature patterns extracting attributes such as
//!   weight, volume or pack size
//! - SKU cleaning and a parser combining both engines from a JSON
//!   configuration

pub mod error;
pub mod features;
pub mod identifiers;
pub mod models;
pub mod parser;
pub mod preprocess;

pub use error::{ConfigError, Result, SkuError};
pub use features::{
    AdjacentPatterns, ConstValuePattern, ExceptionRule, FeaturePattern, Indicator, Pattern,
    PatternChain, PatternMatch, SearchOrder, ValueFormat, ValuePattern,
};
pub use identifiers::{
    AuditEntry, ClassificationAudit, ClassificationTable, Decision, DecisiveIdentifiers,
    IdentifierRule, LimitingOutcome,
};
pub use models::config::ParserConfig;
pub use parser::{NamedValue, ParsedSku, SkuParser, TableAudit};
