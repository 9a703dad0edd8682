//! Pattern-based extraction of attribute values from SKU strings.
//!
//! Each attribute (weight, volume, pack size, ...) is resolved by a
//! [`PatternChain`]: an ordered list of [`Pattern`]s tried in declaration
//! order, where the first pattern that yields a value wins.

mod adjacent;
mod chain;
mod constant;
mod lowered;
pub mod number;
mod value;

pub use adjacent::AdjacentPatterns;
pub use chain::PatternChain;
pub use constant::ConstValuePattern;
pub use number::parse_number;
pub use value::{ExceptionRule, Indicator, SearchOrder, ValueFormat, ValuePattern};

use crate::error::ConfigError;
use crate::models::config::PatternRecord;

/// Byte range `[start, end)` inside the text handed to a pattern.
pub type Span = (usize, usize);

/// Trait for single feature detectors.
pub trait FeaturePattern {
    /// Look for the feature in `text`.
    fn parse(&self, text: &str) -> Option<PatternMatch>;

    /// Name used to report which detector produced a value.
    fn name(&self) -> &str;
}

/// A value produced by a pattern together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    /// Formatted value, prefix and suffix included.
    pub value: String,
    /// Position of the indicator match in the original text.
    pub span: Span,
    /// Name of the pattern that matched.
    pub pattern: String,
}

impl PatternMatch {
    pub fn new(value: impl Into<String>, span: Span, pattern: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            span,
            pattern: pattern.into(),
        }
    }
}

/// Closed set of detector kinds a chain can hold.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Constant value triggered by a regex.
    Const(ConstValuePattern),
    /// Numeric value located by an indicator regex.
    Value(ValuePattern),
}

impl Pattern {
    /// Compile a configuration record. `context` names the owner in errors.
    pub fn from_record(record: &PatternRecord, context: &str) -> Result<Self, ConfigError> {
        match record {
            PatternRecord::Const { name, regex, value } => {
                let name = name.clone().unwrap_or_else(|| context.to_string());
                Ok(Self::Const(ConstValuePattern::new(name, regex, value.clone())?))
            }
            PatternRecord::Value(record) => {
                Ok(Self::Value(ValuePattern::from_record(record, context)?))
            }
        }
    }
}

impl FeaturePattern for Pattern {
    fn parse(&self, text: &str) -> Option<PatternMatch> {
        match self {
            Self::Const(pattern) => pattern.parse(text),
            Self::Value(pattern) => pattern.parse(text),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Const(pattern) => pattern.name(),
            Self::Value(pattern) => pattern.name(),
        }
    }
}

pub(crate) fn compile_regex(pattern: &str, context: &str) -> Result<regex::Regex, ConfigError> {
    regex::Regex::new(pattern).map_err(|e| ConfigError::regex(context, e))
}
