//! Versioned Repository Abstractions
//!
//! A versioned repository is the external source of truth (typically a git
//! repository) whose files are replicated into the internal resource store.
//! The engine only needs two capabilities from it: a file-level diff between
//! two revisions and a point read used to check whether a directory survived.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BridgeError, Result};

/// Action attached to a single entry of a file-level diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    /// File exists at the current ref but not at the previous one
    Created,
    /// File content changed between the refs
    Updated,
    /// File existed at the previous ref and is gone now
    Deleted,
    /// File moved from `previous_path` to `path`
    Renamed,
    /// Diff layer decided the file does not represent a resource
    Ignored,
}

impl FileAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileAction::Created => "created",
            FileAction::Updated => "updated",
            FileAction::Deleted => "deleted",
            FileAction::Renamed => "renamed",
            FileAction::Ignored => "ignored",
        }
    }
}

impl FromStr for FileAction {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "created" => Ok(FileAction::Created),
            "updated" => Ok(FileAction::Updated),
            "deleted" => Ok(FileAction::Deleted),
            "renamed" => Ok(FileAction::Renamed),
            "ignored" => Ok(FileAction::Ignored),
            _ => Err(BridgeError::OperationFailed(format!(
                "unknown file action: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a diff between two revisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedFileChange {
    pub action: FileAction,
    /// Path at the current ref (for deletions, the removed path)
    pub path: String,
    /// Source path of a rename, empty otherwise
    #[serde(default)]
    pub previous_path: String,
    /// Revision the new content lives at
    #[serde(default, rename = "ref")]
    pub reference: String,
    /// Revision the old content lives at
    #[serde(default, rename = "previous_ref")]
    pub previous_reference: String,
}

impl VersionedFileChange {
    /// A bare change carrying only an action and a path
    pub fn new(action: FileAction, path: impl Into<String>) -> Self {
        Self {
            action,
            path: path.into(),
            previous_path: String::new(),
            reference: String::new(),
            previous_reference: String::new(),
        }
    }

    pub fn with_ref(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_previous(
        mut self,
        previous_path: impl Into<String>,
        previous_reference: impl Into<String>,
    ) -> Self {
        self.previous_path = previous_path.into();
        self.previous_reference = previous_reference.into();
        self
    }

    pub fn with_previous_ref(mut self, previous_reference: impl Into<String>) -> Self {
        self.previous_reference = previous_reference.into();
        self
    }
}

/// Content of a file (or listing of a directory) read from the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub path: String,
    pub data: Vec<u8>,
    /// Revision the content was read at, empty for the working state
    pub reference: String,
    pub hash: Option<String>,
}

/// Versioned file source
///
/// Implementations are expected to return [`BridgeError::FileNotFound`] from
/// [`read`](VersionedRepository::read) when the path is absent so callers can
/// tell a missing directory from a transport failure.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::repository::VersionedRepository;
///
/// async fn changed(repo: &dyn VersionedRepository) -> usize {
///     repo.compare_files("abc123", "def456").await.map(|c| c.len()).unwrap_or(0)
/// }
/// ```
#[async_trait]
pub trait VersionedRepository: Send + Sync {
    /// File-level diff between two revisions, in repository order
    async fn compare_files(
        &self,
        previous_ref: &str,
        current_ref: &str,
    ) -> Result<Vec<VersionedFileChange>>;

    /// Read a file or directory; an empty `reference` reads the current state
    async fn read(&self, path: &str, reference: &str) -> Result<FileInfo>;
}
