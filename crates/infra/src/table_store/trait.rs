use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;
use uuid::Uuid;

use recibo_core::LedgerError;

/// Storage tables the ledger writes to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Table {
    Receipts,
    Deductions,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Receipts => "receipts",
            Table::Deductions => "deductions",
        }
    }
}

impl core::fmt::Display for Table {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Row predicate understood by every store implementation.
///
/// The collaborator contract is deliberately small: either everything, or
/// single-column equality. Anything richer (ordering, joins, aggregates,
/// uniqueness) is the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    All,
    /// Keep rows whose `column` equals `value` exactly.
    Eq(&'static str, JsonValue),
}

impl RowFilter {
    /// Reference semantics for implementations: a missing column never
    /// matches an `Eq` filter.
    pub fn matches(&self, row: &JsonValue) -> bool {
        match self {
            RowFilter::All => true,
            RowFilter::Eq(column, value) => row.get(column) == Some(value),
        }
    }
}

/// Table store operation error.
///
/// These are **infrastructure** failures (storage, encoding, locks) as
/// opposed to business failures; the ledger collapses them all into
/// [`LedgerError::StorageUnavailable`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("no row with id {id} in '{table}'")]
    RowNotFound { table: &'static str, id: Uuid },

    #[error("malformed record for '{table}': {reason}")]
    Malformed { table: &'static str, reason: String },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        LedgerError::storage(err.to_string())
    }
}

/// Persistent relational store collaborator.
///
/// Rows are JSON objects; the domain layer owns the mapping to and from
/// typed values. Semantics every implementation must honor:
///
/// - `insert` persists exactly one record and returns it as stored (any
///   fields the backend fills in are visible in the returned row).
/// - `query` returns rows in stable insertion order. [`RowFilter`] is the
///   whole filter language; no ordering guarantee beyond insertion order.
/// - `update` merges the keys of `patch` into the row whose `id` column
///   equals `id`, leaving other columns untouched.
/// - Uniqueness is NOT enforced server-side; callers own uniqueness
///   checks (and any serialization they need around them).
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Persist one record, returning it as stored.
    async fn insert(&self, table: Table, record: JsonValue) -> Result<JsonValue, StoreError>;

    /// Rows of `table` accepted by `filter`, in insertion order.
    async fn query(&self, table: Table, filter: RowFilter) -> Result<Vec<JsonValue>, StoreError>;

    /// Merge `patch` into the row identified by `id`.
    async fn update(&self, table: Table, id: Uuid, patch: JsonValue) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> TableStore for Arc<S>
where
    S: TableStore + ?Sized,
{
    async fn insert(&self, table: Table, record: JsonValue) -> Result<JsonValue, StoreError> {
        (**self).insert(table, record).await
    }

    async fn query(&self, table: Table, filter: RowFilter) -> Result<Vec<JsonValue>, StoreError> {
        (**self).query(table, filter).await
    }

    async fn update(&self, table: Table, id: Uuid, patch: JsonValue) -> Result<(), StoreError> {
        (**self).update(table, id, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_filter_requires_the_column_to_exist() {
        let filter = RowFilter::Eq("receipt_id", json!("abc"));
        assert!(filter.matches(&json!({"receipt_id": "abc", "value": 10.0})));
        assert!(!filter.matches(&json!({"receipt_id": "xyz"})));
        assert!(!filter.matches(&json!({"value": 10.0})));
    }

    #[test]
    fn all_filter_matches_anything() {
        assert!(RowFilter::All.matches(&json!({})));
        assert!(RowFilter::All.matches(&json!({"id": 1})));
    }

    #[test]
    fn store_errors_collapse_into_storage_unavailable() {
        let err: LedgerError = StoreError::Unavailable("down".to_string()).into();
        assert!(matches!(err, LedgerError::StorageUnavailable(_)));
    }
}
