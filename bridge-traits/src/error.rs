use thiserror::Error;

use crate::resources::GroupVersionKind;

/// Errors surfaced by repository and resource-store implementations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The requested path does not exist at the given ref.
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("{0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file was parsed into a resource but the store operation on it
    /// failed. Displays as the underlying error.
    #[error("{source}")]
    Resource {
        name: String,
        gvk: GroupVersionKind,
        #[source]
        source: Box<BridgeError>,
    },
}

impl BridgeError {
    /// Whether this error means the path is absent from the source.
    pub fn is_not_found(&self) -> bool {
        match self {
            BridgeError::FileNotFound(_) => true,
            BridgeError::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            BridgeError::Resource { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Attach the identity of the resource `source` happened to.
    pub fn for_resource(
        name: impl Into<String>,
        gvk: GroupVersionKind,
        source: BridgeError,
    ) -> Self {
        BridgeError::Resource {
            name: name.into(),
            gvk,
            source: Box::new(source),
        }
    }

    /// Name and type of the affected resource, when the store knows them.
    pub fn resource(&self) -> Option<(&str, &GroupVersionKind)> {
        match self {
            BridgeError::Resource { name, gvk, .. } => Some((name.as_str(), gvk)),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(BridgeError::FileNotFound("dashboards/".to_string()).is_not_found());
        assert!(BridgeError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)).is_not_found());
        assert!(!BridgeError::OperationFailed("boom".to_string()).is_not_found());
        assert_eq!(
            BridgeError::OperationFailed("write failed".to_string()).to_string(),
            "write failed"
        );
    }

    #[test]
    fn test_resource_error_keeps_identity() {
        let gvk = GroupVersionKind::new("dashboards", "v1", "Dashboard");
        let err = BridgeError::for_resource(
            "test-dashboard",
            gvk.clone(),
            BridgeError::OperationFailed("write failed".to_string()),
        );

        assert_eq!(err.to_string(), "write failed");
        assert_eq!(err.resource(), Some(("test-dashboard", &gvk)));
        assert!(BridgeError::OperationFailed("x".to_string()).resource().is_none());

        let missing = BridgeError::for_resource(
            "gone",
            gvk,
            BridgeError::FileNotFound("a/gone.json".to_string()),
        );
        assert!(missing.is_not_found());
    }
}
