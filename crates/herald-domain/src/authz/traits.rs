//! Collaborator traits needed by the authorizer.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::DomainResult;

use super::types::{CallerContext, GroupMembership};

/// Exchanges the caller's session for a delegated access token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquires a token for `scopes` on behalf of `caller`.
    ///
    /// `Ok(None)` means the provider ran but had no token to give, which the
    /// authorizer treats as an invalid session.
    async fn acquire_token(
        &self,
        caller: &CallerContext,
        scopes: &[String],
    ) -> DomainResult<Option<SecretString>>;
}

/// Reads group memberships from the directory.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Returns every group the token's subject belongs to.
    ///
    /// Implementations follow paging themselves; the list must be complete.
    async fn list_memberships(&self, token: &SecretString) -> DomainResult<Vec<GroupMembership>>;
}
