//! Ordered rule table resolving one label.

use tracing::{debug, trace, warn};

use super::audit::{AuditEntry, ClassificationAudit, DecisiveIdentifiers, LimitingOutcome};
use super::rule::{IdentifierRule, LimitingHit};
use crate::error::ConfigError;
use crate::models::config::TableConfig;

/// The rule that fired and the identifiers that made it fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision<'a> {
    /// Position of the rule in its table.
    pub rule_index: usize,
    pub label: &'a str,
    pub main: &'a str,
    pub limiting_main: Option<&'a str>,
    pub limiting_additional: Option<&'a str>,
}

impl Decision<'_> {
    pub fn decisive(&self) -> DecisiveIdentifiers {
        DecisiveIdentifiers {
            main: self.main.to_string(),
            limiting_main: self.limiting_main.map(str::to_string),
            limiting_additional: self.limiting_additional.map(str::to_string),
        }
    }
}

/// Rules in priority order: the first rule that fires wins, regardless of
/// how specific later rules are.
#[derive(Debug, Clone, Default)]
pub struct ClassificationTable {
    name: String,
    rules: Vec<IdentifierRule>,
}

impl ClassificationTable {
    pub fn new(name: impl Into<String>, rules: Vec<IdentifierRule>) -> Self {
        let name = name.into();
        for rule in rules.iter().filter(|r| !r.is_usable()) {
            warn!(
                "Rule {:?} in table {} has no main identifiers and will never fire",
                rule.label(),
                name
            );
        }
        debug!("Built classification table {} with {} rules", name, rules.len());
        Self { name, rules }
    }

    pub fn from_config(config: &TableConfig) -> Result<Self, ConfigError> {
        let rules = config
            .rules
            .iter()
            .cloned()
            .map(IdentifierRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(config.name.clone(), rules))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[IdentifierRule] {
        &self.rules
    }

    /// Label of the first rule firing on `text`, or `""`.
    pub fn classify(&self, text: &str) -> &str {
        self.decide(text).map_or("", |d| d.label)
    }

    /// The winning rule with its decisive identifiers.
    pub fn decide(&self, text: &str) -> Option<Decision<'_>> {
        self.evaluate(text, None)
    }

    /// Classify `text`, recording every examined candidate.
    pub fn classify_with_audit(&self, text: &str) -> ClassificationAudit {
        let mut trail = Vec::new();
        let decision = self.evaluate(text, Some(&mut trail));
        ClassificationAudit {
            label: decision.map(|d| d.label.to_string()).unwrap_or_default(),
            decisive: decision.map(|d| d.decisive()),
            trail,
        }
    }

    fn evaluate(&self, text: &str, mut trail: Option<&mut Vec<AuditEntry>>) -> Option<Decision<'_>> {
        for (rule_index, rule) in self.rules.iter().enumerate() {
            let mut mains = rule.main_hits(text);
            let Some(first) = mains.next() else {
                continue;
            };

            // Neither check depends on which main identifier hit, so once
            // the first candidate is rejected every other one is as well.
            let limiting = rule.limiting_hit(text);
            let excluded_by = limiting.and_then(|_| rule.excluding_hit(text));

            if let (Some(hit), None) = (limiting, excluded_by) {
                if let Some(trail) = trail.as_deref_mut() {
                    trail.push(entry(rule, first, limiting, None, true));
                }
                trace!("{}: rule {} fired on {:?}", self.name, rule_index, first);
                return Some(Decision {
                    rule_index,
                    label: rule.label(),
                    main: first,
                    limiting_main: hit.main,
                    limiting_additional: hit.additional,
                });
            }

            if let Some(trail) = trail.as_deref_mut() {
                for main in std::iter::once(first).chain(mains) {
                    trail.push(entry(rule, main, limiting, excluded_by, false));
                }
            }
        }
        None
    }
}

fn entry(
    rule: &IdentifierRule,
    main: &str,
    limiting: Option<LimitingHit<'_>>,
    excluded_by: Option<&str>,
    accepted: bool,
) -> AuditEntry {
    let limiting = match limiting {
        None => LimitingOutcome::NotFound,
        Some(LimitingHit { main: None, .. }) => LimitingOutcome::Unrestricted,
        Some(LimitingHit {
            main: Some(main),
            additional,
        }) => LimitingOutcome::Found {
            main: main.to_string(),
            additional: additional.map(str::to_string),
        },
    };
    AuditEntry {
        label: rule.label().to_string(),
        main: main.to_string(),
        limiting,
        excluded_by: excluded_by.map(str::to_string),
        accepted,
    }
}
