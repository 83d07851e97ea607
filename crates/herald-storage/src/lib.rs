//! herald-storage: Table storage abstraction layer
//!
//! This crate provides the storage abstraction for herald, including:
//! - KeyValueStore trait for partition-scoped reads
//! - Row-key filter expressions with request-length accounting
//! - In-memory implementation for testing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               herald-storage                 │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs - KeyValueStore trait, records   │
//! │  filter.rs - RowKey OR-filter builder       │
//! │  memory.rs - In-memory implementation       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod filter;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use filter::RowKeyFilter;
pub use memory::{MemoryKeyValueStore, DEFAULT_MAX_REQUEST_LENGTH};
pub use traits::{KeyValueStore, TableEntity};
