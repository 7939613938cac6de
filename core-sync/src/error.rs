use bridge_traits::BridgeError;
use core_quota::QuotaExceededError;
use thiserror::Error;

/// Errors that abort a sync pass.
///
/// Everything else that can go wrong with a single file ends up in a
/// [`JobResourceResult`](crate::JobResourceResult) instead.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("compare files error: {0}")]
    CompareFiles(#[source] BridgeError),

    #[error("context canceled")]
    Cancelled,

    #[error(transparent)]
    TooManyErrors(#[from] TooManyErrors),

    #[error("Invalid job ID: {0}")]
    InvalidJobId(String),

    #[error("Invalid job state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// Error budget exhausted. Returned by the progress recorder and passed
/// through the orchestrator unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TooManyErrors {
    message: String,
}

impl TooManyErrors {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Budget tripped after `count` recorded errors.
    pub fn exceeded(count: usize) -> Self {
        Self::new(format!("too many errors: {}", count))
    }
}

/// Per-file failure stored on a result.
///
/// Causes are kept as rendered strings so results stay cheap to clone and
/// compare.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("writing resource from file {path}: {cause}")]
    Write { path: String, cause: String },

    #[error("removing resource from file {path}: {cause}")]
    Remove { path: String, cause: String },

    #[error("renaming resource file from {previous_path} to {path}: {cause}")]
    Rename {
        previous_path: String,
        path: String,
        cause: String,
    },

    /// Materialising the folder for `dir` failed.
    #[error("{cause}")]
    Folder { dir: String, cause: String },

    #[error("removing orphaned folder {folder} for {dir}: {cause}")]
    FolderRemoval {
        dir: String,
        folder: String,
        cause: String,
    },
}

impl ResourceError {
    pub fn write(path: &str, cause: &BridgeError) -> Self {
        Self::Write {
            path: path.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn remove(path: &str, cause: &BridgeError) -> Self {
        Self::Remove {
            path: path.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn rename(previous_path: &str, path: &str, cause: &BridgeError) -> Self {
        Self::Rename {
            previous_path: previous_path.to_string(),
            path: path.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn folder(dir: &str, cause: &BridgeError) -> Self {
        Self::Folder {
            dir: dir.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn folder_removal(dir: &str, folder: &str, cause: &BridgeError) -> Self {
        Self::FolderRemoval {
            dir: dir.to_string(),
            folder: folder.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Non-fatal condition stored on a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultWarning {
    #[error(transparent)]
    QuotaExceeded(#[from] QuotaExceededError),

    #[error("skipping {path}: its folder already failed creation in this pass")]
    ParentFolderFailed { path: String },
}

impl ResultWarning {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, ResultWarning::QuotaExceeded(_))
    }
}

/// Rejection reason for a repository path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path must be relative: {0}")]
    Absolute(String),

    #[error("path contains an empty segment: {0}")]
    EmptySegment(String),

    #[error("path escapes the repository: {0}")]
    Traversal(String),

    #[error("hidden path segment {segment} in {path}")]
    Hidden { path: String, segment: String },

    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_files_message() {
        let err = SyncError::CompareFiles(BridgeError::OperationFailed("compare error".into()));
        assert_eq!(err.to_string(), "compare files error: compare error");
    }

    #[test]
    fn test_cancelled_message() {
        assert_eq!(SyncError::Cancelled.to_string(), "context canceled");
    }

    #[test]
    fn test_too_many_errors_is_transparent() {
        let err: SyncError = TooManyErrors::new("too many errors occurred").into();
        assert_eq!(err.to_string(), "too many errors occurred");
        assert_eq!(TooManyErrors::exceeded(21).to_string(), "too many errors: 21");
    }

    #[test]
    fn test_resource_error_messages() {
        let cause = BridgeError::OperationFailed("permission denied".into());

        assert_eq!(
            ResourceError::write("dashboards/a.json", &cause).to_string(),
            "writing resource from file dashboards/a.json: permission denied"
        );
        assert_eq!(
            ResourceError::remove("dashboards/a.json", &cause).to_string(),
            "removing resource from file dashboards/a.json: permission denied"
        );
        assert_eq!(
            ResourceError::rename("a/old.json", "a/new.json", &cause).to_string(),
            "renaming resource file from a/old.json to a/new.json: permission denied"
        );
        assert_eq!(
            ResourceError::folder("a/", &cause).to_string(),
            "permission denied"
        );
    }

    #[test]
    fn test_quota_warning_is_transparent() {
        let warning = ResultWarning::from(QuotaExceededError::new("dashboards/test.json"));

        assert!(warning.is_quota_exceeded());
        assert_eq!(
            warning.to_string(),
            "resource quota exceeded, skipping creation of dashboards/test.json"
        );
    }
}
