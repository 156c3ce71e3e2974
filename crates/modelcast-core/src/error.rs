//! Error types for the modelcast core library
//!
//! Malformed values are never errors here: coercers absorb bad content into
//! sentinels. What remains are configuration and programming mistakes, which
//! this module models with thiserror and anyhow.

use crate::kind::Kind;
use thiserror::Error;

/// Main error type for modelcast operations
#[derive(Error, Debug)]
pub enum Error {
    /// No registered, default or pass-through transform exists for the pair
    #[error("Unsupported conversion: no transformer from {from} to {to}")]
    UnsupportedConversion {
        from: Kind,
        to: Kind,
    },

    /// Invalid transformer configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The process-wide transformer was already installed
    #[error("A shared value transformer is already installed")]
    AlreadyInstalled,
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for an unsupported (source, target) pair
    pub fn unsupported(from: Kind, to: Kind) -> Self {
        Error::UnsupportedConversion { from, to }
    }

    /// Whether retrying with the same registry could ever succeed.
    ///
    /// Always false: every variant is a setup problem that needs a code or
    /// configuration change.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Configuration {
            message: err.to_string(),
            source: Some(err.into()),
        }
    }
}
