use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Warning raised when a creation is skipped because the repository's
/// resource quota is full.
///
/// Kept as a distinct type so job aggregation can tell quota pressure apart
/// from other warnings.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("resource quota exceeded, skipping creation of {path}")]
pub struct QuotaExceededError {
    pub path: String,
}

impl QuotaExceededError {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}
