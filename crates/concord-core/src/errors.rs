//! Unified error system for Concord
//!
//! Runtime operations on rings and counters never fail; they normalize
//! invalid input into no-ops. Errors only surface from construction,
//! configuration, strict increment variants and wire decoding.

use serde::{Deserialize, Serialize};

/// Unified error type for all fallible Concord operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ConcordError {
    /// Configuration value out of range or missing
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message describing the invalid setting
        message: String,
    },

    /// Counter amount rejected by a strict increment
    #[error("Invalid amount {amount}: increments must be positive")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Filesystem error while reading configuration
    #[error("I/O error: {message}")]
    Io {
        /// Error message describing the I/O failure
        message: String,
    },
}

impl ConcordError {
    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid amount error
    pub fn invalid_amount(amount: i64) -> Self {
        Self::InvalidAmount { amount }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "invalid_config",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::Serialization { .. } => "serialization",
            Self::Io { .. } => "io",
        }
    }
}

/// Standard Result type for Concord operations
pub type Result<T> = std::result::Result<T, ConcordError>;

impl From<std::io::Error> for ConcordError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for ConcordError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for ConcordError {
    fn from(err: toml::ser::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
