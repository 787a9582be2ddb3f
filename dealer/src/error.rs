//! Error types returned at the dealer boundary.

use thiserror::Error;

/// Errors surfaced by [`crate::Dealer`] operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DealerError {
    /// The order failed a placement rule; carries the rule that failed
    #[error("invalid order state: {0}")]
    InvalidOrderState(String),

    /// The caller cancelled before the operation applied anything
    #[error("operation cancelled")]
    Cancelled,

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Errors from reading dealer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("'{0}' key not found")]
    MissingKey(String),

    #[error("invalid '{key}' entry: {reason}")]
    Invalid { key: String, reason: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}
