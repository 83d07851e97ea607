//! Tests for the group-membership authorizer.
//!
//! Organized by functionality:
//! - Membership decisions
//! - Fail-closed handling of collaborator errors
//! - Decision point reporting
//! - Non-blocking waits and cancellation
