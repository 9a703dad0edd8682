//! Auxiliary values written right next to an indicator match.
//!
//! Addends (`2+3kg`), dynamic multipliers (`4x250g`) and range borders
//! (`5-10kg`) are all found the same way: a value regex joined to a symbol
//! regex, anchored to the left or the right edge of the indicator match.

use super::number::parse_number;
use super::{compile_regex, Span};
use crate::error::ConfigError;
use crate::models::config::AdjacentRecord;

/// Value/symbol regex combinations anchored on both sides of a match.
#[derive(Debug, Clone, Default)]
pub struct AdjacentPatterns {
    /// `value symbol$`, tried against the text before the match.
    left: Vec<regex::Regex>,
    /// `^symbol value`, tried against the text after the match.
    right: Vec<regex::Regex>,
}

impl AdjacentPatterns {
    /// Build every symbol × value combination, symbols in the outer loop.
    pub fn from_record(record: &AdjacentRecord, context: &str) -> Result<Self, ConfigError> {
        if record.values.is_empty() || record.symbols.is_empty() {
            return Err(ConfigError::invalid(
                context,
                "both value and symbol regexes are required",
            ));
        }

        let mut patterns = Self::default();
        for symbol in &record.symbols {
            for value in &record.values {
                patterns
                    .left
                    .push(compile_regex(&format!("(?:{value})(?:{symbol})$"), context)?);
                patterns
                    .right
                    .push(compile_regex(&format!("^(?:{symbol})(?:{value})"), context)?);
            }
        }
        Ok(patterns)
    }

    /// Look for an adjacent value around `span` of `text`.
    ///
    /// Combinations are tried in order; for each one the left side is
    /// checked before the right side, and the first parsable number wins.
    pub fn find(&self, text: &str, span: Span) -> Option<f64> {
        let before = &text[..span.0];
        let after = &text[span.1..];

        for (left, right) in self.left.iter().zip(&self.right) {
            let nearest_left = left.find_iter(before).last();
            if let Some((value, _)) = nearest_left.and_then(|m| parse_number(m.as_str())) {
                return Some(value);
            }
            if let Some((value, _)) = right.find(after).and_then(|m| parse_number(m.as_str())) {
                return Some(value);
            }
        }
        None
    }
}
