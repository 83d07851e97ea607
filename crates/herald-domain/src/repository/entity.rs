//! Team data entity.

use std::collections::HashMap;

use herald_storage::TableEntity;

const NAME: &str = "Name";
const SERVICE_URL: &str = "ServiceUrl";
const TENANT_ID: &str = "TenantId";

/// A team the bot is installed in, as stored in the team data table.
///
/// The row key is the team id. Attributes the repository does not interpret
/// are kept in `other` untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDataEntity {
    pub partition_key: String,
    /// Team id (row key).
    pub team_id: String,
    /// Display name. Empty when the record has no `Name` attribute.
    pub name: String,
    pub service_url: Option<String>,
    pub tenant_id: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub other: HashMap<String, String>,
}

impl From<TableEntity> for TeamDataEntity {
    fn from(mut record: TableEntity) -> Self {
        let name = record.properties.remove(NAME).unwrap_or_default();
        let service_url = record.properties.remove(SERVICE_URL);
        let tenant_id = record.properties.remove(TENANT_ID);
        Self {
            partition_key: record.partition_key,
            team_id: record.row_key,
            name,
            service_url,
            tenant_id,
            timestamp: record.timestamp,
            other: record.properties,
        }
    }
}

impl From<TeamDataEntity> for TableEntity {
    fn from(entity: TeamDataEntity) -> Self {
        let mut properties = entity.other;
        properties.insert(NAME.to_string(), entity.name);
        if let Some(url) = entity.service_url {
            properties.insert(SERVICE_URL.to_string(), url);
        }
        if let Some(tenant) = entity.tenant_id {
            properties.insert(TENANT_ID.to_string(), tenant);
        }
        Self {
            partition_key: entity.partition_key,
            row_key: entity.team_id,
            timestamp: entity.timestamp,
            properties,
        }
    }
}
