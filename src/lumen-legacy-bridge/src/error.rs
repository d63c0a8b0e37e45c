//! Bridge error types.

use thiserror::Error;

/// Errors raised by the bridge's own fallible seams.
///
/// None of these ever cross a hook method back into the legacy runtime;
/// they exist for the configuration layer and internal plumbing.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Invalid bridge configuration.
    #[error("invalid bridge configuration: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
