//! Data types for group-membership authorization.

use std::fmt;

use secrecy::SecretString;

/// Requires the caller to be a member of one directory group.
///
/// `scopes` are the delegated permissions requested when acquiring the token
/// used to read the caller's memberships (e.g. `GroupMember.Read.All`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequirement {
    scopes: Vec<String>,
    required_group_id: String,
}

impl AuthorizationRequirement {
    pub fn new<I, T>(scopes: I, required_group_id: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
            required_group_id: required_group_id.into(),
        }
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn required_group_id(&self) -> &str {
        &self.required_group_id
    }
}

/// The authenticated caller of the current request.
#[derive(Debug)]
pub struct CallerContext {
    /// Directory object id of the signed-in user.
    pub user_id: String,
    pub tenant_id: Option<String>,
    /// Incoming bearer assertion, exchanged by the token provider for a
    /// delegated token.
    pub assertion: Option<SecretString>,
}

impl CallerContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            tenant_id: None,
            assertion: None,
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_assertion(mut self, assertion: SecretString) -> Self {
        self.assertion = Some(assertion);
        self
    }
}

/// A group the caller belongs to, as reported by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMembership {
    pub group_id: String,
    pub display_name: Option<String>,
}

impl GroupMembership {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// Why an authorization attempt did not grant access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialReason {
    /// The token provider returned no usable token. Points at a broken or
    /// misconfigured caller session rather than a legitimate denial.
    InvalidSession,
    /// The token provider failed outright.
    TokenUnavailable,
    /// The directory failed to return memberships.
    DirectoryUnavailable,
    /// Memberships were read and the required group is not among them.
    NotAMember,
}

impl DenialReason {
    /// True when the denial signals a broken session rather than a verdict
    /// about the caller's memberships.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::InvalidSession)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidSession => "invalid_session",
            Self::TokenUnavailable => "token_unavailable",
            Self::DirectoryUnavailable => "directory_unavailable",
            Self::NotAMember => "not_a_member",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one authorization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Granted,
    Denied(DenialReason),
}

impl AuthorizationDecision {
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// The denial reason, if any.
    pub fn denial_reason(self) -> Option<DenialReason> {
        match self {
            Self::Granted => None,
            Self::Denied(reason) => Some(reason),
        }
    }
}
