//! Workspace facade crate.
//!
//! Re-exports the individual workspace crates so host applications can depend
//! on `repo-sync-workspace` alone instead of wiring `bridge-traits`,
//! `core-runtime`, `core-quota` and `core-sync` one by one.

pub use bridge_traits;
pub use core_quota;
pub use core_runtime;
pub use core_sync;

pub use core_sync::incremental_sync;
