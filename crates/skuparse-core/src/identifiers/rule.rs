//! A single classification candidate.

use crate::error::ConfigError;
use crate::models::config::RuleRecord;

/// Label plus the identifier sets deciding whether it applies.
///
/// A rule fires when the text contains one of `main`, satisfies the
/// limiting sets and contains none of `excluding`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierRule {
    pub(crate) label: String,
    pub(crate) main: Vec<String>,
    pub(crate) limiting_main: Vec<String>,
    pub(crate) limiting_additional: Vec<String>,
    pub(crate) excluding: Vec<String>,
}

/// Limiting identifiers that satisfied a rule; both `None` when the rule
/// has no limiting identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LimitingHit<'a> {
    pub(crate) main: Option<&'a str>,
    pub(crate) additional: Option<&'a str>,
}

impl IdentifierRule {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            main: Vec::new(),
            limiting_main: Vec::new(),
            limiting_additional: Vec::new(),
            excluding: Vec::new(),
        }
    }

    pub fn with_main<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.main = collect_identifiers(ids);
        self
    }

    pub fn with_limiting_main<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.limiting_main = collect_identifiers(ids);
        self
    }

    pub fn with_limiting_additional<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.limiting_additional = collect_identifiers(ids);
        self
    }

    pub fn with_excluding<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluding = collect_identifiers(ids);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// A rule without main identifiers can never fire.
    pub fn is_usable(&self) -> bool {
        !self.main.is_empty()
    }

    /// Main identifiers present in `text`, in declaration order.
    pub(crate) fn main_hits<'a, 't>(&'a self, text: &'t str) -> impl Iterator<Item = &'a str> {
        present(&self.main, text)
    }

    /// First limiting combination present in `text`.
    ///
    /// `limiting_main` is scanned in order; with additional identifiers
    /// configured, a main hit only counts together with the first additional
    /// identifier present.
    pub(crate) fn limiting_hit(&self, text: &str) -> Option<LimitingHit<'_>> {
        if self.limiting_main.is_empty() {
            return Some(LimitingHit::default());
        }

        present(&self.limiting_main, text).find_map(|main| {
            if self.limiting_additional.is_empty() {
                return Some(LimitingHit {
                    main: Some(main),
                    additional: None,
                });
            }
            present(&self.limiting_additional, text)
                .next()
                .map(|additional| LimitingHit {
                    main: Some(main),
                    additional: Some(additional),
                })
        })
    }

    /// First excluding identifier present in `text`.
    pub(crate) fn excluding_hit(&self, text: &str) -> Option<&str> {
        present(&self.excluding, text).next()
    }
}

impl TryFrom<RuleRecord> for IdentifierRule {
    type Error = ConfigError;

    /// Every identifier column must be present, even when empty.
    fn try_from(record: RuleRecord) -> Result<Self, ConfigError> {
        let column = |ids: Option<Vec<String>>, field: &str| {
            ids.ok_or_else(|| {
                ConfigError::MissingField(format!("{} of rule {:?}", field, record.label))
            })
        };
        let main = column(record.main, "main")?;
        let limiting_main = column(record.limiting_main, "limiting_main")?;
        let limiting_additional = column(record.limiting_additional, "limiting_additional")?;
        let excluding = column(record.excluding, "excluding")?;

        Ok(Self::new(record.label)
            .with_main(main)
            .with_limiting_main(limiting_main)
            .with_limiting_additional(limiting_additional)
            .with_excluding(excluding))
    }
}

fn present<'a, 't>(ids: &'a [String], text: &'t str) -> impl Iterator<Item = &'a str> {
    ids.iter()
        .map(String::as_str)
        .filter(move |id| text.contains(id))
}

/// Empty identifiers would be contained in every text; drop them.
fn collect_identifiers<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter()
        .map(Into::into)
        .filter(|id: &String| !id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrestricted_limiting() {
        let rule = IdentifierRule::new("A").with_main(["X"]);
        assert_eq!(rule.limiting_hit("anything"), Some(LimitingHit::default()));
    }

    #[test]
    fn test_limiting_main_only() {
        let rule = IdentifierRule::new("A")
            .with_main(["X"])
            .with_limiting_main(["L1", "L2"]);
        assert_eq!(
            rule.limiting_hit("X L2 L1"),
            Some(LimitingHit {
                main: Some("L1"),
                additional: None
            })
        );
        assert_eq!(rule.limiting_hit("X"), None);
    }

    #[test]
    fn test_limiting_additional_required() {
        let rule = IdentifierRule::new("A")
            .with_main(["X"])
            .with_limiting_main(["L"])
            .with_limiting_additional(["P", "Q"]);
        assert_eq!(rule.limiting_hit("X L"), None);
        assert_eq!(
            rule.limiting_hit("X L Q P"),
            Some(LimitingHit {
                main: Some("L"),
                additional: Some("P")
            })
        );
    }

    #[test]
    fn test_additional_ignored_without_limiting_main() {
        let rule = IdentifierRule::new("A")
            .with_main(["X"])
            .with_limiting_additional(["P"]);
        assert_eq!(rule.limiting_hit("X"), Some(LimitingHit::default()));
    }

    #[test]
    fn test_empty_identifiers_dropped() {
        let rule = IdentifierRule::new("A").with_main(["", "X"]).with_excluding([""]);
        assert_eq!(rule.main, vec!["X"]);
        assert_eq!(rule.excluding_hit("X"), None);
    }

    #[test]
    fn test_from_record() {
        let record = RuleRecord::new("ACME", &["ACM", ""], &[], &[], &["USED"]);
        let rule = IdentifierRule::try_from(record).unwrap();
        assert_eq!(rule.label(), "ACME");
        assert_eq!(rule.main, vec!["ACM"]);
        assert_eq!(rule.excluding_hit("ACM USED"), Some("USED"));
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let mut record = RuleRecord::new("ACME", &["ACM"], &[], &[], &[]);
        record.limiting_additional = None;
        let err = IdentifierRule::try_from(record).unwrap_err();
        assert!(
            matches!(&err, ConfigError::MissingField(field) if field == "limiting_additional of rule \"ACME\""),
            "{err:?}"
        );
    }

    #[test]
    fn test_unusable_rule() {
        assert!(!IdentifierRule::new("A").is_usable());
        assert!(IdentifierRule::new("A").with_main(["X"]).is_usable());
    }
}
