//! Pull status condition derived from a finished job.

use serde::{Deserialize, Serialize};

use crate::job::JobState;

/// Condition type reported for pull operations.
pub const CONDITION_TYPE_PULL_STATUS: &str = "PullStatus";

pub const REASON_SUCCESS: &str = "Success";
pub const REASON_FAILURE: &str = "Failure";
pub const REASON_QUOTA_EXCEEDED: &str = "QuotaExceeded";
pub const REASON_COMPLETED_WITH_WARNINGS: &str = "CompletedWithWarnings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: bool,
    pub reason: String,
    pub message: String,
}

impl PullCondition {
    fn new(status: bool, reason: &str, message: &str) -> Self {
        Self {
            condition_type: CONDITION_TYPE_PULL_STATUS.to_string(),
            status,
            reason: reason.to_string(),
            message: message.to_string(),
        }
    }
}

/// Build the pull condition for a job that ended in `state`.
///
/// `reasons` are the distinct warning reasons of the job; a quota reason
/// takes precedence over generic warnings.
pub fn evaluate_pull_condition<S: AsRef<str>>(state: JobState, reasons: &[S]) -> PullCondition {
    match state {
        JobState::Success => {
            PullCondition::new(true, REASON_SUCCESS, "Pull completed successfully")
        }
        JobState::Warning => {
            if reasons
                .iter()
                .any(|reason| reason.as_ref() == REASON_QUOTA_EXCEEDED)
            {
                PullCondition::new(
                    false,
                    REASON_QUOTA_EXCEEDED,
                    "Pull completed with quota exceeded",
                )
            } else {
                PullCondition::new(
                    false,
                    REASON_COMPLETED_WITH_WARNINGS,
                    "Pull completed with warnings",
                )
            }
        }
        _ => PullCondition::new(false, REASON_FAILURE, "Pull completed with errors"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_REASONS: &[&str] = &[];

    #[test]
    fn test_success() {
        let condition = evaluate_pull_condition(JobState::Success, NO_REASONS);

        assert!(condition.status);
        assert_eq!(condition.condition_type, CONDITION_TYPE_PULL_STATUS);
        assert_eq!(condition.reason, REASON_SUCCESS);
        assert_eq!(condition.message, "Pull completed successfully");
    }

    #[test]
    fn test_warning_with_quota_reason() {
        let reasons = vec![
            REASON_COMPLETED_WITH_WARNINGS.to_string(),
            REASON_QUOTA_EXCEEDED.to_string(),
        ];
        let condition = evaluate_pull_condition(JobState::Warning, reasons.as_slice());

        assert!(!condition.status);
        assert_eq!(condition.reason, REASON_QUOTA_EXCEEDED);
        assert_eq!(condition.message, "Pull completed with quota exceeded");
    }

    #[test]
    fn test_warning_without_quota_reason() {
        let condition = evaluate_pull_condition(JobState::Warning, NO_REASONS);

        assert!(!condition.status);
        assert_eq!(condition.reason, REASON_COMPLETED_WITH_WARNINGS);
        assert_eq!(condition.message, "Pull completed with warnings");
    }

    #[test]
    fn test_error_and_unfinished_states_fail() {
        for state in [JobState::Error, JobState::Working, JobState::Pending] {
            let condition = evaluate_pull_condition(state, &[REASON_QUOTA_EXCEEDED]);

            assert!(!condition.status);
            assert_eq!(condition.reason, REASON_FAILURE);
            assert_eq!(condition.message, "Pull completed with errors");
        }
    }
}
