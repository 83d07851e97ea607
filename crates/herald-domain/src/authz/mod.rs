//! Group-membership authorization.
//!
//! The authorizer decides whether the caller belongs to one configured
//! directory group, reading the caller's memberships live on every attempt.
//!
//! # Flow
//!
//! ```text
//! Start ─► TokenAcquired ─► MembershipFetched ─► Granted | NotGranted
//! ```
//!
//! Each attempt runs once, with no retries and no cached memberships. The
//! token and membership calls are awaited on the caller's task; dropping the
//! returned future cancels whichever call is pending.
//!
//! # Failure Handling
//!
//! Every failure denies. The reasons stay distinct in logs:
//!
//! - no usable token: [`DenialReason::InvalidSession`], logged as an error
//! - token provider error: [`DenialReason::TokenUnavailable`]
//! - directory error: [`DenialReason::DirectoryUnavailable`]
//! - group not in memberships: [`DenialReason::NotAMember`]

mod context;
mod traits;
mod types;

pub use context::AuthorizationContext;
pub use traits::{DirectoryClient, TokenProvider};
pub use types::{
    AuthorizationDecision, AuthorizationRequirement, CallerContext, DenialReason, GroupMembership,
};

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument, warn};

/// Grants access to members of a directory group.
pub struct GroupMembershipAuthorizer<T, D> {
    token_provider: Arc<T>,
    directory: Arc<D>,
}

impl<T, D> GroupMembershipAuthorizer<T, D>
where
    T: TokenProvider,
    D: DirectoryClient,
{
    pub fn new(token_provider: Arc<T>, directory: Arc<D>) -> Self {
        Self {
            token_provider,
            directory,
        }
    }

    /// Decides whether `caller` is a member of the requirement's group.
    #[instrument(
        skip(self, requirement, caller),
        fields(user_id = %caller.user_id, group_id = %requirement.required_group_id())
    )]
    pub async fn authorize(
        &self,
        requirement: &AuthorizationRequirement,
        caller: &CallerContext,
    ) -> AuthorizationDecision {
        let token = match self.acquire_token(requirement, caller).await {
            Ok(token) => token,
            Err(reason) => return AuthorizationDecision::Denied(reason),
        };

        let memberships = match self.directory.list_memberships(&token).await {
            Ok(memberships) => memberships,
            Err(e) => {
                warn!(error = %e, "directory lookup failed, denying");
                return AuthorizationDecision::Denied(DenialReason::DirectoryUnavailable);
            }
        };

        let required = requirement.required_group_id();
        if memberships.iter().any(|m| m.group_id == required) {
            debug!(groups = memberships.len(), "caller is a member of the required group");
            AuthorizationDecision::Granted
        } else {
            warn!(
                groups = memberships.len(),
                "caller is not a member of the required group"
            );
            AuthorizationDecision::Denied(DenialReason::NotAMember)
        }
    }

    /// Evaluates `requirement` and reports the outcome to `context`.
    ///
    /// A grant calls [`AuthorizationContext::succeed`]; every denial calls
    /// [`AuthorizationContext::fail`]. The requirement is never left undecided.
    pub async fn handle(
        &self,
        context: &mut AuthorizationContext,
        requirement: &AuthorizationRequirement,
        caller: &CallerContext,
    ) -> AuthorizationDecision {
        let decision = self.authorize(requirement, caller).await;
        match decision {
            AuthorizationDecision::Granted => context.succeed(requirement),
            AuthorizationDecision::Denied(reason) => context.fail(reason),
        }
        decision
    }

    async fn acquire_token(
        &self,
        requirement: &AuthorizationRequirement,
        caller: &CallerContext,
    ) -> Result<SecretString, DenialReason> {
        match self
            .token_provider
            .acquire_token(caller, requirement.scopes())
            .await
        {
            Ok(Some(token)) if !token.expose_secret().trim().is_empty() => Ok(token),
            Ok(_) => {
                error!("no usable access token for caller session");
                Err(DenialReason::InvalidSession)
            }
            Err(e) => {
                warn!(error = %e, "token acquisition failed, denying");
                Err(DenialReason::TokenUnavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests;
