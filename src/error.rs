//! Error types

use thiserror::Error;

/// Configuration errors
///
/// These are fatal: a game cannot start from a config it cannot read or that
/// fails validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config parsed but describes an unplayable game
    #[error("Invalid config: {0}")]
    Invalid(String),
}
