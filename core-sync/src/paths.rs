//! Repository path rules.
//!
//! Paths are relative and slash separated. A trailing `/` marks a directory.

use crate::error::PathError;

const RESOURCE_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

pub fn is_dir(path: &str) -> bool {
    path.ends_with('/')
}

/// Directory holding `path`, with trailing slash. Empty for the root.
///
/// ```
/// use core_sync::paths::parent_dir;
///
/// assert_eq!(parent_dir("a/b/c.json"), "a/b/");
/// assert_eq!(parent_dir("a/b/"), "a/");
/// assert_eq!(parent_dir("c.json"), "");
/// ```
pub fn parent_dir(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "",
    }
}

/// `path` itself for directories, its parent otherwise.
pub fn containing_dir(path: &str) -> &str {
    if is_dir(path) {
        path
    } else {
        parent_dir(path)
    }
}

/// Check that `path` can back a resource (files) or a folder (directories).
pub fn validate_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if path.starts_with('/') {
        return Err(PathError::Absolute(path.to_string()));
    }

    let trimmed = path.strip_suffix('/').unwrap_or(path);
    for segment in trimmed.split('/') {
        if segment.is_empty() {
            return Err(PathError::EmptySegment(path.to_string()));
        }
        if segment == ".." || segment == "." {
            return Err(PathError::Traversal(path.to_string()));
        }
        if segment.starts_with('.') {
            return Err(PathError::Hidden {
                path: path.to_string(),
                segment: segment.to_string(),
            });
        }
    }

    if is_dir(path) {
        return Ok(());
    }

    let supported = trimmed
        .rsplit_once('.')
        .map(|(_, ext)| {
            RESOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false);

    if supported {
        Ok(())
    } else {
        Err(PathError::UnsupportedExtension(path.to_string()))
    }
}

pub fn is_path_supported(path: &str) -> bool {
    validate_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("dashboards/old.json"), "dashboards/");
        assert_eq!(parent_dir("a/b/c.json"), "a/b/");
        assert_eq!(parent_dir("a/b/"), "a/");
        assert_eq!(parent_dir("a/"), "");
        assert_eq!(parent_dir("root.json"), "");
        assert_eq!(parent_dir(""), "");
    }

    #[test]
    fn test_containing_dir() {
        assert_eq!(containing_dir("unsupported/path/file.txt"), "unsupported/path/");
        assert_eq!(containing_dir("unsupported/path/"), "unsupported/path/");
        assert_eq!(containing_dir("file.txt"), "");
    }

    #[test]
    fn test_supported_files() {
        assert!(is_path_supported("dashboards/test.json"));
        assert!(is_path_supported("alerts/alert.yaml"));
        assert!(is_path_supported("alerts/alert.YML"));
        assert!(is_path_supported("top.json"));
    }

    #[test]
    fn test_supported_dirs() {
        assert!(is_path_supported("unsupported/path/"));
        assert!(is_path_supported("a/"));
    }

    #[test]
    fn test_rejected_paths() {
        assert_eq!(validate_path(""), Err(PathError::Empty));
        assert!(matches!(validate_path("/etc/a.json"), Err(PathError::Absolute(_))));
        assert!(matches!(validate_path("a//b.json"), Err(PathError::EmptySegment(_))));
        assert!(matches!(validate_path("a/../b.json"), Err(PathError::Traversal(_))));
        assert!(matches!(
            validate_path("unsupported/path/file.txt"),
            Err(PathError::UnsupportedExtension(_))
        ));
        assert!(matches!(validate_path("README"), Err(PathError::UnsupportedExtension(_))));

        match validate_path(".unsupported/path/") {
            Err(PathError::Hidden { segment, .. }) => assert_eq!(segment, ".unsupported"),
            other => panic!("expected hidden segment error, got {:?}", other),
        }
    }
}
