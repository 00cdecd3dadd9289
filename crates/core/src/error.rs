//! Domain error model.

use thiserror::Error;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors surfaced by ledger operations.
///
/// Deterministic business failures each get their own variant; collaborator
/// failures (storage, identity backends) collapse into `StorageUnavailable`.
/// All errors are returned to the caller of the failing operation; nothing
/// is retried internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    /// Another receipt (any status) already carries this number.
    #[error("receipt number '{0}' already exists")]
    DuplicateReceiptNumber(String),

    /// A currency amount was zero, negative, or not a finite number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A required creation field was absent or blank.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// No receipt with the given identifier.
    #[error("receipt not found")]
    ReceiptNotFound,

    /// The receipt is in a terminal status and accepts no further changes.
    #[error("receipt is {0}, no further changes accepted")]
    ReceiptClosed(String),

    /// The deduction is larger than the remaining balance.
    #[error("deduction {requested:.2} exceeds remaining balance {balance:.2}")]
    ExceedsBalance { requested: f64, balance: f64 },

    /// No signed-in user; write operations require one.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Catch-all for collaborator failures.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl LedgerError {
    pub fn duplicate_number(number: impl Into<String>) -> Self {
        Self::DuplicateReceiptNumber(number.into())
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn closed(status: impl Into<String>) -> Self {
        Self::ReceiptClosed(status.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }
}
