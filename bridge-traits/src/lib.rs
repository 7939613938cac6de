//! # Host Bridge Traits
//!
//! Contracts between the sync engine and the systems it replicates between.
//!
//! ## Overview
//!
//! The engine never talks to git, an API server or a log pipeline directly.
//! Each capability it consumes is a trait in this crate, implemented by the
//! host and injected at call time.
//!
//! ## Traits
//!
//! ### Replication
//! - [`VersionedRepository`](repository::VersionedRepository) - File-level diffs and point reads
//! - [`RepositoryResources`](resources::RepositoryResources) - Resource and folder mutations
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should map "path does not exist" to
//! [`BridgeError::FileNotFound`](error::BridgeError::FileNotFound); the engine
//! relies on it to detect directories that vanished from the source.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so one implementation can serve
//! several concurrent sync passes.

pub mod error;
pub mod repository;
pub mod resources;
pub mod time;

pub use error::BridgeError;

pub use repository::{FileAction, FileInfo, VersionedFileChange, VersionedRepository};
pub use resources::{
    GroupVersionKind, RemovedResource, RenamedResource, RepositoryResources, WrittenResource,
};
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, SystemClock};
