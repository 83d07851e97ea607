//! Request handlers.
//!
//! Handlers combine the team data repository with the group-membership gate:
//! every operation authorizes the caller first and reads storage only on a
//! grant.

mod team_data;

pub use team_data::{HandlerError, HandlerResult, TeamDataHandler};
