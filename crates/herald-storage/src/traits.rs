//! KeyValueStore trait definition.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};
use crate::filter::RowKeyFilter;

/// Maximum length for table names.
const MAX_TABLE_NAME_LENGTH: usize = 63;

/// Maximum length for partition and row keys.
const MAX_KEY_LENGTH: usize = 1024;

/// A raw record as returned by the table service.
///
/// Attribute values are kept as strings; interpreting them is up to the
/// repository that owns the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntity {
    pub partition_key: String,
    pub row_key: String,
    /// Last modification time reported by the service.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub properties: HashMap<String, String>,
}

impl TableEntity {
    /// Creates a record with no attributes, stamped with the current time.
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            timestamp: chrono::Utc::now(),
            properties: HashMap::new(),
        }
    }

    /// Adds an attribute.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Returns an attribute value by name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// Abstract interface to a partitioned key-value table service.
///
/// All reads are scoped to a single partition. Implementations must be
/// thread-safe (Send + Sync); retry and backoff policy, if any, belongs to
/// the implementation.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Reads entities in `partition_key` whose row key matches `filter`.
    async fn query(
        &self,
        table: &str,
        partition_key: &str,
        filter: &RowKeyFilter,
    ) -> StorageResult<Vec<TableEntity>>;

    /// Reads every entity in `partition_key`.
    async fn read_all(&self, table: &str, partition_key: &str) -> StorageResult<Vec<TableEntity>>;

    /// Point read of a single entity.
    async fn get(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> StorageResult<Option<TableEntity>>;
}

/// Validates a table name: alphanumeric, starting with a letter, 3-63 chars.
pub fn validate_table_name(table: &str) -> StorageResult<()> {
    if table.len() < 3 || table.len() > MAX_TABLE_NAME_LENGTH {
        return Err(StorageError::InvalidInput {
            message: format!(
                "table name must be 3-{MAX_TABLE_NAME_LENGTH} characters, got {}",
                table.len()
            ),
        });
    }
    let mut chars = table.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_with_letter || !table.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StorageError::InvalidInput {
            message: format!("table name '{table}' must be alphanumeric and start with a letter"),
        });
    }
    Ok(())
}

/// Validates a partition or row key.
///
/// The table service forbids `/`, `\`, `#`, `?` and control characters in keys.
pub fn validate_key(kind: &str, key: &str) -> StorageResult<()> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(StorageError::InvalidInput {
            message: format!("{kind} exceeds maximum length of {MAX_KEY_LENGTH}"),
        });
    }
    if key
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '#' | '?') || c.is_control())
    {
        return Err(StorageError::InvalidInput {
            message: format!("{kind} '{key}' contains a forbidden character"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_validation() {
        assert!(validate_table_name("TeamData").is_ok());
        assert!(validate_table_name("ab").is_err());
        assert!(validate_table_name("1Team").is_err());
        assert!(validate_table_name("Team-Data").is_err());
        assert!(validate_table_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_key_validation_rejects_forbidden_characters() {
        assert!(validate_key("row key", "19:abc@thread.skype").is_ok());
        assert!(validate_key("row key", "a/b").is_err());
        assert!(validate_key("row key", "a#b").is_err());
        assert!(validate_key("row key", "a\nb").is_err());
    }

    #[test]
    fn test_table_entity_properties() {
        let entity = TableEntity::new("TeamData", "team-1").with_property("Name", "Sales");
        assert_eq!(entity.property("Name"), Some("Sales"));
        assert_eq!(entity.property("ServiceUrl"), None);
    }
}
