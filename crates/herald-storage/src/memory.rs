//! In-memory table store for testing and local runs.
//!
//! Partitions are kept in `BTreeMap`s keyed by row key, so reads come back in
//! row-key order the way the table service returns them.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, instrument};

use crate::error::{StorageError, StorageResult};
use crate::filter::RowKeyFilter;
use crate::traits::{validate_key, validate_table_name, KeyValueStore, TableEntity};

/// Default limit on the encoded filter length, matching the service's 2048
/// character URL limit.
pub const DEFAULT_MAX_REQUEST_LENGTH: usize = 2048;

type Partitions = BTreeMap<String, BTreeMap<String, TableEntity>>;

/// In-memory implementation of [`KeyValueStore`].
///
/// Tables must be created before use. Filters whose encoded length exceeds
/// `max_request_length` are rejected with [`StorageError::InvalidFilter`],
/// mirroring the request-size limit of the real service.
#[derive(Debug)]
pub struct MemoryKeyValueStore {
    tables: DashMap<String, Partitions>,
    max_request_length: usize,
}

impl Default for MemoryKeyValueStore {
    fn default() -> Self {
        Self {
            tables: DashMap::new(),
            max_request_length: DEFAULT_MAX_REQUEST_LENGTH,
        }
    }
}

impl MemoryKeyValueStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Sets the maximum encoded filter length.
    pub fn with_max_request_length(mut self, max_request_length: usize) -> Self {
        self.max_request_length = max_request_length;
        self
    }

    /// Creates a table. Fails if it already exists.
    pub fn create_table(&self, table: &str) -> StorageResult<()> {
        validate_table_name(table)?;

        use dashmap::mapref::entry::Entry;
        match self.tables.entry(table.to_string()) {
            Entry::Occupied(_) => Err(StorageError::TableAlreadyExists {
                table: table.to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(Partitions::new());
                Ok(())
            }
        }
    }

    /// Creates a table unless it already exists.
    pub fn ensure_table(&self, table: &str) -> StorageResult<()> {
        validate_table_name(table)?;
        self.tables.entry(table.to_string()).or_default();
        Ok(())
    }

    /// Inserts or replaces an entity, refreshing its timestamp.
    pub fn upsert(&self, table: &str, mut entity: TableEntity) -> StorageResult<()> {
        validate_key("partition key", &entity.partition_key)?;
        validate_key("row key", &entity.row_key)?;

        let mut partitions =
            self.tables
                .get_mut(table)
                .ok_or_else(|| StorageError::TableNotFound {
                    table: table.to_string(),
                })?;

        entity.timestamp = chrono::Utc::now();
        partitions
            .entry(entity.partition_key.clone())
            .or_default()
            .insert(entity.row_key.clone(), entity);
        Ok(())
    }

    /// Removes an entity. Returns true if it existed.
    pub fn delete(&self, table: &str, partition_key: &str, row_key: &str) -> StorageResult<bool> {
        let mut partitions =
            self.tables
                .get_mut(table)
                .ok_or_else(|| StorageError::TableNotFound {
                    table: table.to_string(),
                })?;
        Ok(partitions
            .get_mut(partition_key)
            .is_some_and(|rows| rows.remove(row_key).is_some()))
    }

    fn check_filter(&self, filter: &RowKeyFilter) -> StorageResult<()> {
        if filter.is_empty() {
            return Err(StorageError::InvalidFilter {
                message: "filter has no clauses".to_string(),
            });
        }
        let encoded_len = filter.encoded_len();
        if encoded_len > self.max_request_length {
            return Err(StorageError::InvalidFilter {
                message: format!(
                    "encoded filter length {encoded_len} exceeds limit of {}",
                    self.max_request_length
                ),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    #[instrument(skip(self, filter), fields(clauses = filter.len()))]
    async fn query(
        &self,
        table: &str,
        partition_key: &str,
        filter: &RowKeyFilter,
    ) -> StorageResult<Vec<TableEntity>> {
        self.check_filter(filter)?;

        let partitions = self
            .tables
            .get(table)
            .ok_or_else(|| StorageError::TableNotFound {
                table: table.to_string(),
            })?;

        let wanted = filter.key_set();
        let matched: Vec<TableEntity> = partitions
            .get(partition_key)
            .map(|rows| {
                rows.values()
                    .filter(|e| wanted.contains(e.row_key.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(matched = matched.len(), "filtered partition query");
        Ok(matched)
    }

    async fn read_all(&self, table: &str, partition_key: &str) -> StorageResult<Vec<TableEntity>> {
        let partitions = self
            .tables
            .get(table)
            .ok_or_else(|| StorageError::TableNotFound {
                table: table.to_string(),
            })?;

        Ok(partitions
            .get(partition_key)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> StorageResult<Option<TableEntity>> {
        let partitions = self
            .tables
            .get(table)
            .ok_or_else(|| StorageError::TableNotFound {
                table: table.to_string(),
            })?;

        Ok(partitions
            .get(partition_key)
            .and_then(|rows| rows.get(row_key))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> MemoryKeyValueStore {
        let store = MemoryKeyValueStore::new();
        store.create_table("TeamData").unwrap();
        for (id, name) in [("t1", "Sales"), ("t2", "Marketing"), ("t3", "Legal")] {
            store
                .upsert(
                    "TeamData",
                    TableEntity::new("TeamData", id).with_property("Name", name),
                )
                .unwrap();
        }
        store
            .upsert(
                "TeamData",
                TableEntity::new("Other", "t1").with_property("Name", "Elsewhere"),
            )
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_query_returns_only_matching_rows_in_partition() {
        let store = seeded_store();
        let filter = RowKeyFilter::any_of(["t3", "t1", "missing"]);

        let rows = store.query("TeamData", "TeamData", &filter).await.unwrap();

        let keys: Vec<_> = rows.iter().map(|r| r.row_key.as_str()).collect();
        assert_eq!(keys, vec!["t1", "t3"]);
        assert!(rows.iter().all(|r| r.partition_key == "TeamData"));
    }

    #[tokio::test]
    async fn test_query_rejects_empty_filter() {
        let store = seeded_store();
        let result = store
            .query("TeamData", "TeamData", &RowKeyFilter::default())
            .await;
        assert!(matches!(result, Err(StorageError::InvalidFilter { .. })));
    }

    #[tokio::test]
    async fn test_query_rejects_filter_over_request_limit() {
        let store = MemoryKeyValueStore::new().with_max_request_length(64);
        store.create_table("TeamData").unwrap();

        let filter = RowKeyFilter::any_of(["t1", "t2", "t3", "t4", "t5"]);
        let result = store.query("TeamData", "TeamData", &filter).await;

        match result {
            Err(StorageError::InvalidFilter { message }) => {
                assert!(message.contains("exceeds limit"));
            }
            other => panic!("expected InvalidFilter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_table_is_an_error() {
        let store = MemoryKeyValueStore::new();
        let result = store.read_all("Missing", "TeamData").await;
        assert!(matches!(result, Err(StorageError::TableNotFound { .. })));
    }

    #[tokio::test]
    async fn test_read_all_is_partition_scoped() {
        let store = seeded_store();
        let rows = store.read_all("TeamData", "TeamData").await.unwrap();
        assert_eq!(rows.len(), 3);

        let other = store.read_all("TeamData", "Other").await.unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].property("Name"), Some("Elsewhere"));

        let empty = store.read_all("TeamData", "Nobody").await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let store = seeded_store();
        store
            .upsert(
                "TeamData",
                TableEntity::new("TeamData", "t1").with_property("Name", "Sales EMEA"),
            )
            .unwrap();

        let row = store.get("TeamData", "TeamData", "t1").await.unwrap().unwrap();
        assert_eq!(row.property("Name"), Some("Sales EMEA"));
        assert_eq!(store.read_all("TeamData", "TeamData").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let store = seeded_store();
        assert!(store.delete("TeamData", "TeamData", "t2").unwrap());
        assert!(!store.delete("TeamData", "TeamData", "t2").unwrap());
        assert!(store.get("TeamData", "TeamData", "t2").await.unwrap().is_none());
    }

    #[test]
    fn test_create_table_twice_fails() {
        let store = MemoryKeyValueStore::new();
        store.create_table("TeamData").unwrap();
        assert!(matches!(
            store.create_table("TeamData"),
            Err(StorageError::TableAlreadyExists { .. })
        ));
        assert!(store.ensure_table("TeamData").is_ok());
    }
}
