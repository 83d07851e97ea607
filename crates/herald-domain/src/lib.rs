//! herald-domain: Team data lookup and access gating
//!
//! This crate contains the core logic including:
//! - Batched lookup of team data by id over a key-value table store
//! - Group-membership authorization against an external directory
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                herald-domain                 │
//! ├─────────────────────────────────────────────┤
//! │  repository/ - Batched team data lookups    │
//! │  authz/      - Group-membership gate        │
//! └─────────────────────────────────────────────┘
//! ```

pub mod authz;
pub mod error;
pub mod repository;

// Re-export commonly used types at the crate root
pub use authz::{
    AuthorizationContext, AuthorizationDecision, AuthorizationRequirement, CallerContext,
    DenialReason, DirectoryClient, GroupMembership, GroupMembershipAuthorizer, TokenProvider,
};
pub use error::{DomainError, DomainResult};
pub use repository::{BatchedLookupRepository, RepositoryConfig, TeamDataEntity};
