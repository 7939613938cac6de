//! # Repository Sync Engine
//!
//! Replicates a versioned file repository into a resource store.
//!
//! ## Overview
//!
//! An incremental pass takes the diff between the last synced ref and the
//! current one and applies it change by change:
//! - Ordering the diff so deletions and renames run first (`change`)
//! - Gating creations on the repository's resource quota (`core_quota`)
//! - Creating folders for directories that hold no resource files (`paths`)
//! - Removing folders whose directory vanished from the source
//! - Recording every outcome and tripping on an error budget (`progress`)
//!
//! ## Components
//!
//! - **Incremental Sync** (`incremental`): The orchestrator and per-action handlers
//! - **Job Progress** (`progress`): Recorder contract and in-memory recorder
//! - **Job State** (`job`): Job identifiers, states and summaries
//! - **Pull Condition** (`condition`): Status condition derived from a finished job

pub mod change;
pub mod condition;
pub mod error;
pub mod incremental;
pub mod job;
pub mod paths;
pub mod progress;
pub mod result;

pub use change::{action_priority, sort_changes_by_action_priority};
pub use condition::{evaluate_pull_condition, PullCondition};
pub use error::{PathError, ResourceError, Result, ResultWarning, SyncError, TooManyErrors};
pub use incremental::incremental_sync;
pub use job::{JobId, JobState, JobSummary};
pub use progress::{JobProgress, JobProgressRecorder};
pub use result::JobResourceResult;
