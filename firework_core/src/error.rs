//! Error types.
//!
//! Nothing in the per-frame path is fatal: malformed hands degrade to
//! `Unknown`, rejected batches are dropped, audio failures are swallowed by
//! the backend.  What remains surfaces at startup (configuration).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FireworksError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The config file is not valid TOML for [`crate::FireworksConfig`].
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A field parsed but holds a value the simulation cannot run with.
    #[error("invalid config value for `{field}`: {reason}")]
    ConfigInvalid { field: &'static str, reason: String },

    /// A hand observation carried fewer than four fingertips.
    #[error("malformed hand observation: expected 4 fingertips, found {found}")]
    MalformedHand { found: usize },

    /// A hand observation carried a NaN or infinite coordinate.
    #[error("malformed hand observation: non-finite landmark")]
    NonFiniteHand,
}

pub type Result<T> = std::result::Result<T, FireworksError>;
