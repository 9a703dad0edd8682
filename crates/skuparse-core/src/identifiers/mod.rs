//! Identifier-membership classification.
//!
//! A [`ClassificationTable`] maps a SKU to a label (a brand, a category)
//! through an ordered list of [`IdentifierRule`]s. Identifiers are matched
//! by plain substring containment, so the caller decides on case and
//! padding (see [`crate::preprocess::for_classification`]).

mod audit;
mod rule;
mod table;

pub use audit::{AuditEntry, ClassificationAudit, DecisiveIdentifiers, LimitingOutcome};
pub use rule::IdentifierRule;
pub use table::{ClassificationTable, Decision};
