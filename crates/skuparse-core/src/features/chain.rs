//! Ordered detector list resolving a single attribute.

use tracing::{debug, trace};

use super::{FeaturePattern, Pattern, PatternMatch, Span};
use crate::error::ConfigError;
use crate::models::config::AttributeConfig;

/// Patterns tried in declaration order; the first one yielding a value wins.
#[derive(Debug, Clone)]
pub struct PatternChain {
    name: String,
    patterns: Vec<Pattern>,
    default_value: String,
}

impl PatternChain {
    pub fn new(name: impl Into<String>, patterns: Vec<Pattern>) -> Self {
        Self {
            name: name.into(),
            patterns,
            default_value: String::new(),
        }
    }

    /// Value returned when no pattern matches.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    /// Compile an attribute configuration.
    pub fn from_config(config: &AttributeConfig) -> Result<Self, ConfigError> {
        let patterns = config
            .patterns
            .iter()
            .enumerate()
            .map(|(i, record)| Pattern::from_record(record, &format!("{}#{}", config.name, i)))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Built attribute chain {} with {} patterns",
            config.name,
            patterns.len()
        );

        Ok(Self::new(config.name.clone(), patterns).with_default(config.default_value.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// The winning match, or `None` when the text is blank or nothing matched.
    pub fn find(&self, text: &str) -> Option<PatternMatch> {
        if text.trim().is_empty() {
            return None;
        }
        let found = self.patterns.iter().find_map(|p| p.parse(text));
        if let Some(m) = &found {
            trace!("{}: {} matched {:?}", self.name, m.pattern, m.value);
        }
        found
    }

    /// Attribute value for `text`: blank text gives an empty value, no match
    /// gives the default.
    pub fn resolve(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        self.find(text)
            .map(|m| m.value)
            .unwrap_or_else(|| self.default_value.clone())
    }

    /// Like [`resolve`](Self::resolve), also returning `text` with the
    /// winning match cut out, so another chain can work on the remainder.
    pub fn resolve_and_strip(&self, text: &str) -> (String, String) {
        if text.trim().is_empty() {
            return (String::new(), text.to_string());
        }
        match self.find(text) {
            Some(m) => (m.value, strip_span(text, m.span)),
            None => (self.default_value.clone(), text.to_string()),
        }
    }
}

/// Remove `span` and join what is left with a single space.
fn strip_span(text: &str, span: Span) -> String {
    let left = text[..span.0].trim_end();
    let right = text[span.1..].trim_start();
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (_, true) => left.to_string(),
        _ => format!("{left} {right}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{ConstValuePattern, Indicator, ValuePattern};
    use pretty_assertions::assert_eq;
    use regex::Regex;

    fn weight_chain() -> PatternChain {
        let kilograms = ValuePattern::new("kg", Indicator::Simple(Regex::new(r"\d+\s*kg").unwrap()))
            .with_multiplier(1000.0)
            .with_affixes("", "g");
        let grams = ValuePattern::new("g", Indicator::Simple(Regex::new(r"\d+\s*g\b").unwrap()))
            .with_affixes("", "g");
        PatternChain::new(
            "weight",
            vec![Pattern::Value(kilograms), Pattern::Value(grams)],
        )
    }

    #[test]
    fn test_first_pattern_wins() {
        let chain = weight_chain();
        assert_eq!(chain.resolve("box 5 kg heavy"), "5000g");
        assert_eq!(chain.resolve("pack 250 g"), "250g");
        assert_eq!(chain.resolve("2kg or 250g"), "2000g");
    }

    #[test]
    fn test_default_value() {
        let chain = weight_chain().with_default("n/a");
        assert_eq!(chain.resolve("no weight here"), "n/a");
        assert_eq!(
            chain.resolve_and_strip("no weight here"),
            ("n/a".to_string(), "no weight here".to_string())
        );
    }

    #[test]
    fn test_blank_text() {
        let chain = weight_chain().with_default("n/a");
        assert_eq!(chain.resolve(""), "");
        assert_eq!(chain.resolve("   "), "");
        assert_eq!(chain.resolve_and_strip("  "), (String::new(), "  ".to_string()));
    }

    #[test]
    fn test_strip_leading_match() {
        let chain = weight_chain();
        assert_eq!(
            chain.resolve_and_strip("5kg item"),
            ("5000g".to_string(), "item".to_string())
        );
    }

    #[test]
    fn test_strip_inner_match() {
        let chain = weight_chain();
        assert_eq!(
            chain.resolve_and_strip("sugar 1 kg white"),
            ("1000g".to_string(), "sugar white".to_string())
        );
    }

    #[test]
    fn test_const_pattern_in_chain() {
        let chain = PatternChain::new(
            "sugar",
            vec![Pattern::Const(
                ConstValuePattern::new("free", r"sugar[- ]free", "0").unwrap(),
            )],
        );
        assert_eq!(
            chain.resolve_and_strip("Cola Sugar-Free 0.5"),
            ("0".to_string(), "Cola 0.5".to_string())
        );
    }

    #[test]
    fn test_deterministic() {
        let chain = weight_chain();
        let text = "2 kg 3 kg";
        assert_eq!(chain.resolve(text), chain.resolve(text));
    }
}
