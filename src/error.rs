//! Crate-wide error type

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EfError>;

#[derive(Debug, Error)]
pub enum EfError {
    /// Query rejected before classification (empty or whitespace-only text).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Underlying store unreachable or query failed. Fatal for the current
    /// request only; retry policy belongs to the caller.
    #[error("store unavailable: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("missing config: {0}")]
    MissingConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
