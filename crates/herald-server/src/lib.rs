//! herald-server: Configuration, logging and request handlers
//!
//! This crate wires the domain layer into a running service:
//! - Layered configuration (defaults, YAML file, environment)
//! - Structured logging setup
//! - Team data handlers gated by group membership
//! - Startup wiring from configuration
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                herald-server                 │
//! ├─────────────────────────────────────────────┤
//! │  config.rs      - Configuration management  │
//! │  observability/ - Logging setup             │
//! │  handlers/      - Gated team data handlers  │
//! │  startup.rs     - Service startup           │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod handlers;
pub mod observability;
pub mod startup;

// Re-exports for convenience
pub use config::{ConfigLoadError, ServerConfig};
pub use handlers::{HandlerError, HandlerResult, TeamDataHandler};
pub use startup::{start, HeraldService, StartupError};
