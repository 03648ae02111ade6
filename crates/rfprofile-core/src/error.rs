//! Error types for the core crate.

use thiserror::Error;

/// Error raised while parsing units and quantities from text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Unit symbol not known in the requested category
    #[error("unknown {category} unit: '{symbol}'")]
    UnknownUnit {
        /// Category that was searched (e.g. "frequency")
        category: &'static str,
        /// Symbol as given
        symbol: String,
    },

    /// Numeric part of a quantity could not be parsed
    #[error("invalid number in quantity '{0}'")]
    InvalidNumber(String),

    /// Quantity text was empty
    #[error("empty quantity")]
    Empty,
}

/// Error raised while selecting a country profile
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Profile name not recognized
    #[error("unknown profile '{0}' (expected mx or sg)")]
    Unknown(String),
}

/// Error raised while loading generator configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configured value is outside its usable domain
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result type alias for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;
