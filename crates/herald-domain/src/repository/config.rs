//! Configuration for the team data repository.

use crate::error::{DomainError, DomainResult};

/// Table holding team data.
pub const TEAM_DATA_TABLE: &str = "TeamData";

/// Partition holding every team the bot has been installed in.
pub const TEAM_DATA_PARTITION: &str = "TeamData";

/// Binds a repository to one table and one partition.
///
/// Fixed at construction; a repository never reads outside its partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub table_name: String,
    pub partition_key: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            table_name: TEAM_DATA_TABLE.to_string(),
            partition_key: TEAM_DATA_PARTITION.to_string(),
        }
    }
}

impl RepositoryConfig {
    pub fn new(table_name: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key: partition_key.into(),
        }
    }

    /// Rejects blank table or partition names.
    pub fn validate(&self) -> DomainResult<()> {
        if self.table_name.trim().is_empty() {
            return Err(DomainError::InvalidConfig {
                message: "table name cannot be empty".to_string(),
            });
        }
        if self.partition_key.trim().is_empty() {
            return Err(DomainError::InvalidConfig {
                message: "partition key cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
