//! Batched lookup repository for team data.
//!
//! Resolves large sets of team ids into entities. The table service carries
//! the filter in the request URL, so an id set is split into chunks of at most
//! [`MAX_IDS_PER_FILTER`] ids and each chunk becomes one
//! `RowKey eq '..' or RowKey eq '..'` query.
//!
//! # Ordering
//!
//! - `get_by_ids` returns entities in chunk order, then in store order within
//!   a chunk. It does not follow the input order.
//! - `get_all_sorted_by_name` sorts by `(name, team_id)` and keeps every
//!   entity, including distinct teams that share a display name.

mod config;
mod entity;

pub use config::{RepositoryConfig, TEAM_DATA_PARTITION, TEAM_DATA_TABLE};
pub use entity::TeamDataEntity;

use std::sync::Arc;

use herald_storage::{KeyValueStore, RowKeyFilter};
use tracing::{debug, instrument};

use crate::error::DomainResult;

/// Maximum number of ids per filter expression.
///
/// Team ids run to about 60 characters; 20 of them keep the encoded filter
/// under the service's 2048 character URL limit.
pub const MAX_IDS_PER_FILTER: usize = 20;

/// Number of store queries needed to resolve `id_count` ids.
pub fn batch_count(id_count: usize) -> usize {
    id_count.div_ceil(MAX_IDS_PER_FILTER)
}

/// Repository of team data stored in one partition of a table.
pub struct BatchedLookupRepository<S> {
    store: Arc<S>,
    config: RepositoryConfig,
}

impl<S> BatchedLookupRepository<S>
where
    S: KeyValueStore,
{
    /// Creates a repository bound to the default team data table and partition.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            config: RepositoryConfig::default(),
        }
    }

    /// Creates a repository bound to the given table and partition.
    pub fn with_config(store: Arc<S>, config: RepositoryConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Resolves team ids to entities.
    ///
    /// Ids are queried in consecutive chunks of [`MAX_IDS_PER_FILTER`], one
    /// chunk at a time. Unknown ids are skipped. An error on any chunk aborts
    /// the remaining chunks and is returned on its own.
    ///
    /// An absent id set (`Option::None`) is passed as an empty iterator, e.g.
    /// `ids.into_iter().flatten()`.
    #[instrument(skip(self, ids), fields(partition = %self.config.partition_key))]
    pub async fn get_by_ids<I, T>(&self, ids: I) -> DomainResult<Vec<TeamDataEntity>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let ids: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let batches = batch_count(ids.len());
        let mut entities = Vec::with_capacity(ids.len());

        for (index, chunk) in ids.chunks(MAX_IDS_PER_FILTER).enumerate() {
            let filter = RowKeyFilter::any_of(chunk.iter().map(String::as_str));
            debug!(
                batch = index + 1,
                batches,
                ids = chunk.len(),
                "querying team data batch"
            );

            let rows = self
                .store
                .query(&self.config.table_name, &self.config.partition_key, &filter)
                .await?;

            entities.extend(rows.into_iter().map(TeamDataEntity::from));
        }

        debug!(
            requested = ids.len(),
            found = entities.len(),
            "resolved team data by ids"
        );
        Ok(entities)
    }

    /// Resolves team ids to display names, sorted ascending.
    ///
    /// Unknown ids are skipped, so the result can be shorter than the input.
    pub async fn get_names_by_ids<I, T>(&self, ids: I) -> DomainResult<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut names: Vec<String> = self
            .get_by_ids(ids)
            .await?
            .into_iter()
            .map(|entity| entity.name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Reads a single team by id.
    pub async fn get_by_id(&self, team_id: &str) -> DomainResult<Option<TeamDataEntity>> {
        let row = self
            .store
            .get(&self.config.table_name, &self.config.partition_key, team_id)
            .await?;
        Ok(row.map(TeamDataEntity::from))
    }

    /// Reads every team in the partition, in store order.
    pub async fn get_all(&self) -> DomainResult<Vec<TeamDataEntity>> {
        let rows = self
            .store
            .read_all(&self.config.table_name, &self.config.partition_key)
            .await?;
        Ok(rows.into_iter().map(TeamDataEntity::from).collect())
    }

    /// Reads every team in the partition, sorted by name then team id.
    ///
    /// Teams that share a display name are all returned, ordered by team id.
    #[instrument(skip(self), fields(partition = %self.config.partition_key))]
    pub async fn get_all_sorted_by_name(&self) -> DomainResult<Vec<TeamDataEntity>> {
        let mut entities = self.get_all().await?;
        sort_by_name(&mut entities);
        Ok(entities)
    }

    /// Reads every team in the partition, keeping one team per display name.
    ///
    /// For a name shared by several teams, the one with the smallest team id
    /// survives. Use only where name-level uniqueness is what the caller wants;
    /// the dropped teams are still in the store.
    pub async fn get_all_distinct_by_name(&self) -> DomainResult<Vec<TeamDataEntity>> {
        let mut entities = self.get_all_sorted_by_name().await?;
        let before = entities.len();
        entities.dedup_by(|later, earlier| later.name == earlier.name);
        if entities.len() < before {
            debug!(
                collapsed = before - entities.len(),
                "dropped teams sharing a display name"
            );
        }
        Ok(entities)
    }
}

/// Sorts by display name, breaking ties on team id.
fn sort_by_name(entities: &mut [TeamDataEntity]) {
    entities.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.team_id.cmp(&b.team_id)));
}
