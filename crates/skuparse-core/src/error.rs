//! Error types for the skuparse-core library.

use thiserror::Error;

/// Main error type for the skuparse library.
#[derive(Error, Debug)]
pub enum SkuError {
    /// Rule or pattern configuration could not be compiled.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building tables and chains from configuration.
///
/// These only ever surface at construction time; lookups never fail.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A regex in the configuration does not compile.
    #[error("invalid regex in {context}: {source}")]
    InvalidRegex {
        context: String,
        #[source]
        source: regex::Error,
    },

    /// A required field is absent from a record.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A field holds a value outside of its domain.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// An exception entry has none of its three parts configured.
    #[error("exception #{index} of {context} has no left, own or right part")]
    EmptyException { context: String, index: usize },

    /// Two tables or two attributes share a name.
    #[error("duplicate name: {0}")]
    DuplicateName(String),
}

impl ConfigError {
    pub(crate) fn regex(context: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidRegex {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for the skuparse library.
pub type Result<T> = std::result::Result<T, SkuError>;
