//! Record of how a classification was reached.

use serde::Serialize;
use std::fmt;

/// Identifiers that made the winning rule fire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecisiveIdentifiers {
    pub main: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limiting_main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limiting_additional: Option<String>,
}

/// Outcome of the limiting check for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LimitingOutcome {
    /// The rule has no limiting identifiers.
    Unrestricted,
    Found {
        main: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        additional: Option<String>,
    },
    NotFound,
}

/// One examined (rule, main identifier) candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub label: String,
    pub main: String,
    pub limiting: LimitingOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_by: Option<String>,
    pub accepted: bool,
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "candidate \"{}\"; main: {}", self.label, self.main)?;
        match &self.limiting {
            LimitingOutcome::Unrestricted => {}
            LimitingOutcome::Found { main, additional } => {
                write!(f, "; limiting main: {main}")?;
                if let Some(additional) = additional {
                    write!(f, "; limiting additional: {additional}")?;
                }
            }
            LimitingOutcome::NotFound => write!(f, "; limiting: not found")?,
        }
        if let Some(excluding) = &self.excluded_by {
            write!(f, "; excluded by: {excluding}")?;
        }
        Ok(())
    }
}

/// Classification result with the full decision history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationAudit {
    /// Winning label, empty when no rule fired.
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decisive: Option<DecisiveIdentifiers>,
    pub trail: Vec<AuditEntry>,
}

impl ClassificationAudit {
    /// Trail rendered one candidate per line.
    pub fn history(&self) -> String {
        self.trail
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
