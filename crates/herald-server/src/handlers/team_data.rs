//! Team data handler gated by group membership.

use std::sync::Arc;

use herald_domain::{
    AuthorizationContext, AuthorizationRequirement, BatchedLookupRepository, CallerContext,
    DenialReason, DirectoryClient, DomainError, GroupMembershipAuthorizer, TeamDataEntity,
    TokenProvider,
};
use herald_storage::KeyValueStore;
use tracing::{info, instrument};

use crate::config::{ConfigLoadError, ServerConfig};

/// Errors returned by gated handlers.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The caller failed the group-membership requirement.
    #[error("forbidden: {reason}")]
    Forbidden { reason: DenialReason },

    /// Lookup failed after access was granted.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Serves team data to members of the configured group.
pub struct TeamDataHandler<S, T, D> {
    repository: BatchedLookupRepository<S>,
    authorizer: GroupMembershipAuthorizer<T, D>,
    requirement: AuthorizationRequirement,
}

impl<S, T, D> TeamDataHandler<S, T, D>
where
    S: KeyValueStore,
    T: TokenProvider,
    D: DirectoryClient,
{
    pub fn new(
        repository: BatchedLookupRepository<S>,
        authorizer: GroupMembershipAuthorizer<T, D>,
        requirement: AuthorizationRequirement,
    ) -> Self {
        Self {
            repository,
            authorizer,
            requirement,
        }
    }

    /// Wires a handler from the server configuration.
    pub fn from_config(
        config: &ServerConfig,
        store: Arc<S>,
        token_provider: Arc<T>,
        directory: Arc<D>,
    ) -> Result<Self, ConfigLoadError> {
        let repository =
            BatchedLookupRepository::with_config(store, config.storage.repository_config())
                .map_err(|e| ConfigLoadError::Invalid {
                    message: e.to_string(),
                })?;
        let requirement = config.authorization.requirement()?;
        let authorizer = GroupMembershipAuthorizer::new(token_provider, directory);
        Ok(Self::new(repository, authorizer, requirement))
    }

    /// Every team, sorted by name.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn list_teams(&self, caller: &CallerContext) -> HandlerResult<Vec<TeamDataEntity>> {
        self.authorize(caller).await?;
        let teams = self.repository.get_all_sorted_by_name().await?;
        info!(teams = teams.len(), "listed teams");
        Ok(teams)
    }

    /// Sorted display names of the given teams.
    #[instrument(skip(self, caller, team_ids), fields(user_id = %caller.user_id, requested = team_ids.len()))]
    pub async fn team_names(
        &self,
        caller: &CallerContext,
        team_ids: &[String],
    ) -> HandlerResult<Vec<String>> {
        self.authorize(caller).await?;
        Ok(self.repository.get_names_by_ids(team_ids).await?)
    }

    async fn authorize(&self, caller: &CallerContext) -> HandlerResult<()> {
        let mut context = AuthorizationContext::new([self.requirement.clone()]);
        let decision = self
            .authorizer
            .handle(&mut context, &self.requirement, caller)
            .await;

        if context.is_granted() {
            return Ok(());
        }
        // Undecided counts as denied.
        let reason = decision
            .denial_reason()
            .or_else(|| context.failures().first().copied())
            .unwrap_or(DenialReason::NotAMember);
        Err(HandlerError::Forbidden { reason })
    }
}
