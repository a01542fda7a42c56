//! Error taxonomy for the search engine.
//!
//! Every variant is raised synchronously, either by a constructor or by the
//! pre-loop validation of [`crate::alns::Alns::execute`]. A rejected candidate
//! is an ordinary search outcome and never surfaces as an error.

use thiserror::Error;

/// Errors produced while configuring or starting a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlnsError {
    /// A constructor parameter is outside its valid range.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// `execute` was called without at least one destroy and one repair operator.
    #[error("missing operators: {destroy} destroy and {repair} repair operator(s) registered")]
    MissingOperators {
        /// Number of registered destroy operators.
        destroy: usize,
        /// Number of registered repair operators.
        repair: usize,
    },
}

impl AlnsError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        AlnsError::Configuration(message.into())
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, AlnsError>;
