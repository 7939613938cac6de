//! Outcome of applying one change.

use bridge_traits::{FileAction, GroupVersionKind};

use crate::error::{ResourceError, ResultWarning};

/// API group recorded for folder results.
pub const FOLDER_GROUP: &str = "folders";
/// Kind recorded for folder results.
pub const FOLDER_KIND: &str = "Folder";

/// What happened to a single path during a sync pass.
///
/// A result carries at most one of `error` and `warning`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResourceResult {
    pub path: String,
    pub name: String,
    pub group: String,
    pub kind: String,
    pub action: FileAction,
    pub error: Option<ResourceError>,
    pub warning: Option<ResultWarning>,
}

impl JobResourceResult {
    /// Path-only result.
    pub fn new(path: impl Into<String>, action: FileAction) -> Self {
        Self {
            path: path.into(),
            name: String::new(),
            group: String::new(),
            kind: String::new(),
            action,
            error: None,
            warning: None,
        }
    }

    /// Result for a folder resource mirroring directory `dir`.
    pub fn folder(dir: impl Into<String>, action: FileAction) -> Self {
        let mut result = Self::new(dir, action);
        result.group = FOLDER_GROUP.to_string();
        result.kind = FOLDER_KIND.to_string();
        result
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_resource(mut self, name: impl Into<String>, gvk: &GroupVersionKind) -> Self {
        self.name = name.into();
        self.group = gvk.group.clone();
        self.kind = gvk.kind.clone();
        self
    }

    pub fn with_error(mut self, error: ResourceError) -> Self {
        self.error = Some(error);
        self.warning = None;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<ResultWarning>) -> Self {
        self.warning = Some(warning.into());
        self.error = None;
        self
    }

    /// Whether this records the removal of an orphaned folder rather than
    /// one of the pass's changes.
    pub fn is_folder_removal(&self) -> bool {
        self.action == FileAction::Deleted && self.group == FOLDER_GROUP && self.kind == FOLDER_KIND
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_warning(&self) -> bool {
        self.warning.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_quota::QuotaExceededError;

    #[test]
    fn test_resource_result() {
        let gvk = GroupVersionKind::new("dashboards", "v1", "Dashboard");
        let result = JobResourceResult::new("dashboards/old.json", FileAction::Deleted)
            .with_resource("old-dashboard", &gvk);

        assert_eq!(result.name, "old-dashboard");
        assert_eq!(result.group, "dashboards");
        assert_eq!(result.kind, "Dashboard");
        assert!(!result.is_error());
    }

    #[test]
    fn test_error_and_warning_are_exclusive() {
        let result = JobResourceResult::new("dashboards/a.json", FileAction::Ignored)
            .with_warning(QuotaExceededError::new("dashboards/a.json"))
            .with_error(ResourceError::Folder {
                dir: "dashboards/".into(),
                cause: "boom".into(),
            });

        assert!(result.is_error());
        assert!(!result.is_warning());
    }

    #[test]
    fn test_folder_result() {
        let result = JobResourceResult::folder("unsupported/path/", FileAction::Created);

        assert_eq!(result.path, "unsupported/path/");
        assert_eq!(result.kind, FOLDER_KIND);
        assert_eq!(result.group, FOLDER_GROUP);
        assert!(result.name.is_empty());
        assert!(!result.is_folder_removal());
        assert!(JobResourceResult::folder("old/", FileAction::Deleted)
            .with_name("folder-uid")
            .is_folder_removal());
    }
}
