//! # Job Progress
//!
//! The recorder receives every per-file outcome of a sync pass. Besides
//! bookkeeping it owns two policies the orchestrator consults before each
//! item:
//!
//! - the **error budget**: [`JobProgressRecorder::too_many_errors`] trips once
//!   more failures were recorded than the configured maximum;
//! - the **directory-failure memo**: directories whose folder could not be
//!   created, or that still hold a resource whose deletion failed, are
//!   remembered for the rest of the pass so dependent work is skipped.
//!
//! A recorder instance is scoped to one pass and discarded afterwards.

use async_trait::async_trait;
use bridge_traits::{Clock, FileAction, SystemClock};
use chrono::{DateTime, Utc};
use core_runtime::config::{SyncConfig, DEFAULT_MAX_ERRORS};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::condition::{REASON_COMPLETED_WITH_WARNINGS, REASON_QUOTA_EXCEEDED};
use crate::error::{ResourceError, TooManyErrors};
use crate::job::{JobId, JobState, JobSummary};
use crate::paths::containing_dir;
use crate::result::JobResourceResult;

/// Sink for the progress and outcomes of one sync pass.
#[async_trait]
pub trait JobProgressRecorder: Send + Sync {
    async fn set_total(&self, total: usize);

    async fn set_message(&self, message: &str);

    /// Message that describes the pass as a whole, e.g. why it did nothing.
    async fn set_final_message(&self, message: &str);

    async fn record(&self, result: JobResourceResult);

    /// `Err` once the error budget is exhausted.
    fn too_many_errors(&self) -> Result<(), TooManyErrors>;

    /// Whether a folder that would contain `path` already failed creation.
    fn has_dir_path_failed_creation(&self, path: &str) -> bool;

    /// Whether a deletion inside `dir` failed during this pass.
    fn has_dir_path_failed_deletion(&self, dir: &str) -> bool;
}

#[derive(Debug)]
struct ProgressState {
    state: JobState,
    total: usize,
    processed: usize,
    message: String,
    final_message: Option<String>,
    errors: Vec<String>,
    warnings: Vec<String>,
    reasons: Vec<String>,
    failed_creations: BTreeSet<String>,
    failed_deletions: BTreeSet<String>,
    results: Vec<JobResourceResult>,
}

/// In-memory [`JobProgressRecorder`].
pub struct JobProgress {
    id: JobId,
    max_errors: usize,
    clock: Arc<dyn Clock>,
    started_at: DateTime<Utc>,
    inner: Mutex<ProgressState>,
}

impl JobProgress {
    pub fn new(max_errors: usize) -> Self {
        Self::with_clock(max_errors, Arc::new(SystemClock))
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.max_errors)
    }

    pub fn with_clock(max_errors: usize, clock: Arc<dyn Clock>) -> Self {
        let started_at = clock.now();
        Self {
            id: JobId::new(),
            max_errors,
            clock,
            started_at,
            inner: Mutex::new(ProgressState {
                state: JobState::Pending,
                total: 0,
                processed: 0,
                message: String::new(),
                final_message: None,
                errors: Vec::new(),
                warnings: Vec::new(),
                reasons: Vec::new(),
                failed_creations: BTreeSet::new(),
                failed_deletions: BTreeSet::new(),
                results: Vec::new(),
            }),
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn state(&self) -> JobState {
        self.lock().state
    }

    /// Every result recorded so far, in order.
    pub fn results(&self) -> Vec<JobResourceResult> {
        self.lock().results.clone()
    }

    /// Close the pass and derive its final state.
    pub fn summary(&self) -> JobSummary {
        let mut inner = self.lock();
        let state = if !inner.errors.is_empty() {
            JobState::Error
        } else if !inner.warnings.is_empty() {
            JobState::Warning
        } else {
            JobState::Success
        };
        inner.state = state;

        JobSummary {
            id: self.id,
            state,
            message: inner
                .final_message
                .clone()
                .unwrap_or_else(|| inner.message.clone()),
            errors: inner.errors.clone(),
            warnings: inner.warnings.clone(),
            reasons: inner.reasons.clone(),
            total: inner.total,
            processed: inner.processed,
            started_at: self.started_at,
            finished_at: self.clock.now(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProgressState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for JobProgress {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ERRORS)
    }
}

#[async_trait]
impl JobProgressRecorder for JobProgress {
    async fn set_total(&self, total: usize) {
        let mut inner = self.lock();
        inner.total = total;
        inner.state = JobState::Working;
    }

    async fn set_message(&self, message: &str) {
        self.lock().message = message.to_string();
    }

    async fn set_final_message(&self, message: &str) {
        self.lock().final_message = Some(message.to_string());
    }

    async fn record(&self, result: JobResourceResult) {
        let mut inner = self.lock();
        // `total` counts changes only.
        if !result.is_folder_removal() {
            inner.processed += 1;
        }

        if let Some(error) = &result.error {
            inner.errors.push(error.to_string());

            if let ResourceError::Folder { dir, .. } = error {
                debug!(dir = %dir, "marking directory as failed creation");
                inner.failed_creations.insert(dir.clone());
            }
            if result.action == FileAction::Deleted {
                let dir = containing_dir(&result.path).to_string();
                debug!(dir = %dir, "marking directory as failed deletion");
                inner.failed_deletions.insert(dir);
            }
        }

        if let Some(warning) = &result.warning {
            inner.warnings.push(warning.to_string());
            let reason = if warning.is_quota_exceeded() {
                REASON_QUOTA_EXCEEDED
            } else {
                REASON_COMPLETED_WITH_WARNINGS
            };
            if !inner.reasons.iter().any(|r| r == reason) {
                inner.reasons.push(reason.to_string());
            }
        }

        inner.results.push(result);
    }

    fn too_many_errors(&self) -> Result<(), TooManyErrors> {
        let count = self.lock().errors.len();
        if count > self.max_errors {
            return Err(TooManyErrors::exceeded(count));
        }
        Ok(())
    }

    fn has_dir_path_failed_creation(&self, path: &str) -> bool {
        self.lock()
            .failed_creations
            .iter()
            .any(|dir| path.starts_with(dir.as_str()))
    }

    fn has_dir_path_failed_deletion(&self, dir: &str) -> bool {
        self.lock()
            .failed_deletions
            .iter()
            .any(|failed| failed.starts_with(dir))
    }
}
