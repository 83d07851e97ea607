//! Observability setup.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingConfig};
