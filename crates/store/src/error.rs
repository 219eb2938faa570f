//! Storage-layer error model.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage operation error.
///
/// Infrastructure failures only; domain failures never originate here. The
/// service facade translates `Conflict` to a domain conflict and everything
/// else to an internal error with a generic message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint was violated (duplicate barcode, location
    /// name, team name, membership pair).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A write referenced a row that is no longer there.
    #[error("missing row: {0}")]
    MissingRow(String),

    /// Backend failure (connection loss, poisoned lock, ...).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn missing_row(msg: impl Into<String>) -> Self {
        Self::MissingRow(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
