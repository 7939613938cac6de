//! Resource Store Abstractions
//!
//! The resource store is the internal side of replication: it turns a
//! repository file into a typed resource, removes it again, and manages the
//! folder resources that mirror repository directories.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Group/version/kind triple identifying a resource type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupVersionKind {
    pub group: String,
    #[serde(default)]
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}/{}", self.group, self.kind)
        } else {
            write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
        }
    }
}

/// Resource written from a repository file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenResource {
    pub name: String,
    pub gvk: GroupVersionKind,
}

/// Resource removed because its backing file disappeared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedResource {
    pub name: String,
    /// Folder resource that contained the removed resource, if any
    pub folder: Option<String>,
    pub gvk: GroupVersionKind,
}

/// Resource moved to a new path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamedResource {
    pub name: String,
    /// Folder resource the resource lived in before the move, if any
    pub previous_folder: Option<String>,
    pub gvk: GroupVersionKind,
}

/// Internal resource store driven by repository files
///
/// All calls may block on I/O. Implementations must be safe to share between
/// concurrent sync passes of different repositories. When a failure happens
/// after the file was parsed, wrap it with [`BridgeError::for_resource`] so
/// the failed result still names the resource.
///
/// [`BridgeError::for_resource`]: crate::error::BridgeError::for_resource
#[async_trait]
pub trait RepositoryResources: Send + Sync {
    /// Parse the file at `path@reference` and create or replace its resource
    async fn write_resource_from_file(&self, path: &str, reference: &str)
        -> Result<WrittenResource>;

    /// Delete the resource that was backed by `path@reference`
    async fn remove_resource_from_file(
        &self,
        path: &str,
        reference: &str,
    ) -> Result<RemovedResource>;

    /// Remove the old resource and write the new one in a single operation
    async fn rename_resource_file(
        &self,
        previous_path: &str,
        previous_reference: &str,
        path: &str,
        reference: &str,
    ) -> Result<RenamedResource>;

    /// Make sure a folder resource exists for every segment of `dir`,
    /// returning the identifier of the innermost folder
    async fn ensure_folder_path_exist(&self, dir: &str) -> Result<String>;

    /// Delete a folder resource by identifier
    async fn remove_folder(&self, folder: &str) -> Result<()>;
}
