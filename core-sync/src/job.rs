//! # Sync Job State
//!
//! Identifiers, states and the end-of-pass summary of a sync job.
//!
//! ## State Machine
//!
//! ```text
//! Pending → Working → Success
//!              ├────→ Warning
//!              └────→ Error
//! ```
//!
//! The orchestrator never picks the final state itself. It is derived from
//! the recorded results by [`JobProgress::summary`](crate::JobProgress::summary).

use crate::{Result, SyncError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a sync job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    /// Create a new random job ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a job ID from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self> {
        Ok(Self(
            Uuid::parse_str(s).map_err(|e| SyncError::InvalidJobId(e.to_string()))?,
        ))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for JobId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// State Types
// ============================================================================

/// Lifecycle state of a sync job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Created, no change applied yet
    Pending,
    /// Changes are being replicated
    Working,
    /// Every change applied cleanly
    Success,
    /// Finished, some results carry warnings
    Warning,
    /// Finished, at least one result failed
    Error,
}

impl JobState {
    /// Check if this state represents a finished job
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Success | JobState::Warning | JobState::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Working => "working",
            JobState::Success => "success",
            JobState::Warning => "warning",
            JobState::Error => "error",
        }
    }
}

impl FromStr for JobState {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(JobState::Pending),
            "working" => Ok(JobState::Working),
            "success" => Ok(JobState::Success),
            "warning" => Ok(JobState::Warning),
            "error" => Ok(JobState::Error),
            _ => Err(SyncError::InvalidState(s.to_string())),
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Aggregated outcome of a sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: JobId,
    pub state: JobState,
    /// Final message if one was set, otherwise the latest progress message
    pub message: String,
    /// Rendered per-item errors, in recording order
    pub errors: Vec<String>,
    /// Rendered per-item warnings, in recording order
    pub warnings: Vec<String>,
    /// Distinct warning reasons, used by pull-condition evaluation
    pub reasons: Vec<String>,
    /// Changes in the diff
    pub total: usize,
    /// Changes applied so far; orphaned-folder removals are not counted
    pub processed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl JobSummary {
    pub fn duration_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_round_trip() {
        let id = JobId::new();
        let parsed = JobId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);

        assert!(matches!(
            JobId::from_string("not-a-uuid"),
            Err(SyncError::InvalidJobId(_))
        ));
    }

    #[test]
    fn test_state_strings() {
        for state in [
            JobState::Pending,
            JobState::Working,
            JobState::Success,
            JobState::Warning,
            JobState::Error,
        ] {
            assert_eq!(state.as_str().parse::<JobState>().unwrap(), state);
        }
        assert!("done".parse::<JobState>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Working.is_terminal());
        assert!(JobState::Success.is_terminal());
        assert!(JobState::Warning.is_terminal());
        assert!(JobState::Error.is_terminal());
    }

    #[test]
    fn test_state_serde() {
        let json = serde_json::to_string(&JobState::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
