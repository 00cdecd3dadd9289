use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::r#trait::{RowFilter, StoreError, Table, TableStore};

/// In-memory table store.
///
/// Intended for tests/dev. Rows are kept in insertion order per table; not
/// optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    tables: RwLock<HashMap<Table, Vec<JsonValue>>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_id(row: &JsonValue) -> Option<Uuid> {
    row.get("id")?.as_str()?.parse().ok()
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn insert(&self, table: Table, record: JsonValue) -> Result<JsonValue, StoreError> {
        if !record.is_object() {
            return Err(StoreError::Malformed {
                table: table.name(),
                reason: "record must be a JSON object".to_string(),
            });
        }

        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        tables.entry(table).or_default().push(record.clone());
        Ok(record)
    }

    async fn query(&self, table: Table, filter: RowFilter) -> Result<Vec<JsonValue>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(tables
            .get(&table)
            .map(|rows| rows.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default())
    }

    async fn update(&self, table: Table, id: Uuid, patch: JsonValue) -> Result<(), StoreError> {
        let JsonValue::Object(patch) = patch else {
            return Err(StoreError::Malformed {
                table: table.name(),
                reason: "patch must be a JSON object".to_string(),
            });
        };

        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let row = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id)))
            .ok_or(StoreError::RowNotFound {
                table: table.name(),
                id,
            })?;

        let JsonValue::Object(columns) = row else {
            return Err(StoreError::Malformed {
                table: table.name(),
                reason: "stored row is not a JSON object".to_string(),
            });
        };

        for (column, value) in patch {
            columns.insert(column, value);
        }
        Ok(())
    }
}
