//! Constant-valued feature detector.

use regex::Regex;

use super::lowered::LoweredText;
use super::{compile_regex, FeaturePattern, PatternMatch};
use crate::error::ConfigError;

/// Yields a fixed value whenever its regex matches the lower-cased text,
/// e.g. `"sugar[- ]free"` → `"0"` for a sugar content attribute.
#[derive(Debug, Clone)]
pub struct ConstValuePattern {
    name: String,
    regex: Regex,
    value: String,
}

impl ConstValuePattern {
    pub fn new(
        name: impl Into<String>,
        regex: &str,
        value: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        Ok(Self {
            regex: compile_regex(regex, &name)?,
            name,
            value: value.into(),
        })
    }
}

impl FeaturePattern for ConstValuePattern {
    fn parse(&self, text: &str) -> Option<PatternMatch> {
        let lowered = LoweredText::new(text);
        let m = self.regex.find(lowered.as_str())?;
        Some(PatternMatch::new(
            self.value.as_str(),
            lowered.original_span((m.start(), m.end())),
            self.name.as_str(),
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_lower_cased_text() {
        let pattern = ConstValuePattern::new("sugar", r"sugar[- ]free", "0").unwrap();
        let m = pattern.parse("COLA SUGAR-FREE 0.5L").unwrap();
        assert_eq!(m.value, "0");
        assert_eq!(m.span, (5, 15));
        assert_eq!(m.pattern, "sugar");
    }

    #[test]
    fn test_no_match() {
        let pattern = ConstValuePattern::new("sugar", r"sugar[- ]free", "0").unwrap();
        assert_eq!(pattern.parse("COLA 0.5L"), None);
    }

    #[test]
    fn test_invalid_regex() {
        assert!(ConstValuePattern::new("bad", "[a-", "x").is_err());
    }
}
