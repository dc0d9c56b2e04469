#![forbid(unsafe_code)]

//! Error types.
//!
//! Pagination operations never fail: numeric input is coerced and clamped.
//! Only reading configuration can go wrong.

use thiserror::Error;

/// Standard result type for configuration APIs.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Failure while reading [`PaginationOptions`](crate::config::PaginationOptions).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options document is not valid JSON or has the wrong shape.
    #[error("invalid pagination options: {0}")]
    Json(#[from] serde_json::Error),

    /// The activation event is neither `click` nor `touchend`.
    #[error("unknown activation event: {name}")]
    UnknownActivationEvent { name: String },
}
