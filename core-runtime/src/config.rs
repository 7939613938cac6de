//! # Sync Configuration Module
//!
//! Provides configuration for incremental repository sync passes.
//!
//! ## Overview
//!
//! A [`SyncConfig`] sizes the two budgets a sync pass runs under:
//!
//! - the **error budget** (`max_errors`): once more item failures than this
//!   have been recorded, the progress recorder trips and the pass aborts;
//! - the **resource quota** (`quota_limit`, `initial_quota_usage`): an
//!   approximate cap on how many resources one repository may own. A limit
//!   of `0` means unconstrained.
//!
//! The config is built with [`SyncConfig::builder`] or loaded from JSON with
//! [`SyncConfig::from_json`]. Both paths validate fail-fast.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::SyncConfig;
//!
//! let config = SyncConfig::builder()
//!     .max_errors(50)
//!     .quota_limit(1000)
//!     .initial_quota_usage(12)
//!     .build()
//!     .expect("valid config");
//!
//! assert!(config.has_quota());
//! ```
//!
//! ```
//! use core_runtime::config::SyncConfig;
//!
//! let config = SyncConfig::from_json(r#"{ "quota_limit": 10 }"#).unwrap();
//! assert_eq!(config.max_errors, 20);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of tolerated item failures per sync pass.
pub const DEFAULT_MAX_ERRORS: usize = 20;

/// Settings for one repository's sync passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Number of recorded item errors tolerated before a pass aborts
    pub max_errors: usize,

    /// Maximum number of resources the repository may own (0 = unlimited)
    pub quota_limit: i64,

    /// Resources already owned when the tracker is created
    pub initial_quota_usage: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_errors: DEFAULT_MAX_ERRORS,
            quota_limit: 0,
            initial_quota_usage: 0,
        }
    }
}

impl SyncConfig {
    /// Creates a new builder for constructing a `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Parses and validates a JSON config document.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(document: &str) -> Result<Self> {
        let config: SyncConfig = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Whether a resource quota is enforced.
    pub fn has_quota(&self) -> bool {
        self.quota_limit > 0
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The error budget allows at least one failure
    /// - Quota limit and usage are not negative
    pub fn validate(&self) -> Result<()> {
        if self.max_errors == 0 {
            return Err(Error::Config(
                "Error budget must allow at least one failure".to_string(),
            ));
        }

        if self.quota_limit < 0 {
            return Err(Error::Config(format!(
                "Quota limit must be >= 0 (0 means unlimited), got {}",
                self.quota_limit
            )));
        }

        if self.initial_quota_usage < 0 {
            return Err(Error::Config(format!(
                "Initial quota usage must be >= 0, got {}",
                self.initial_quota_usage
            )));
        }

        Ok(())
    }
}

/// Builder for constructing [`SyncConfig`] instances.
///
/// Unset fields keep their defaults; [`build()`](SyncConfigBuilder::build)
/// validates the result.
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    max_errors: Option<usize>,
    quota_limit: Option<i64>,
    initial_quota_usage: Option<i64>,
}

impl SyncConfigBuilder {
    /// Sets the error budget.
    ///
    /// Default: 20
    pub fn max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = Some(max_errors);
        self
    }

    /// Sets the resource quota limit. `0` disables the quota.
    pub fn quota_limit(mut self, limit: i64) -> Self {
        self.quota_limit = Some(limit);
        self
    }

    /// Sets how many resources the repository already owns.
    pub fn initial_quota_usage(mut self, usage: i64) -> Self {
        self.initial_quota_usage = Some(usage);
        self
    }

    /// Builds the final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the resulting config fails validation.
    pub fn build(self) -> Result<SyncConfig> {
        let defaults = SyncConfig::default();
        let config = SyncConfig {
            max_errors: self.max_errors.unwrap_or(defaults.max_errors),
            quota_limit: self.quota_limit.unwrap_or(defaults.quota_limit),
            initial_quota_usage: self
                .initial_quota_usage
                .unwrap_or(defaults.initial_quota_usage),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SyncConfig::builder().build().unwrap();

        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.max_errors, DEFAULT_MAX_ERRORS);
        assert!(!config.has_quota());
    }

    #[test]
    fn test_builder_with_quota() {
        let config = SyncConfig::builder()
            .quota_limit(10)
            .initial_quota_usage(9)
            .max_errors(3)
            .build()
            .unwrap();

        assert!(config.has_quota());
        assert_eq!(config.quota_limit, 10);
        assert_eq!(config.initial_quota_usage, 9);
        assert_eq!(config.max_errors, 3);
    }

    #[test]
    fn test_validate_rejects_zero_error_budget() {
        let result = SyncConfig::builder().max_errors(0).build();

        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("at least one failure")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_quota() {
        let result = SyncConfig::builder().quota_limit(-1).build();
        assert!(matches!(result, Err(Error::Config(_))));

        let result = SyncConfig::builder().initial_quota_usage(-5).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_json_partial_document() {
        let config = SyncConfig::from_json(r#"{"quota_limit": 10, "initial_quota_usage": 4}"#)
            .unwrap();

        assert_eq!(config.quota_limit, 10);
        assert_eq!(config.initial_quota_usage, 4);
        assert_eq!(config.max_errors, DEFAULT_MAX_ERRORS);
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        assert!(matches!(
            SyncConfig::from_json(r#"{"max_errors": 0}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SyncConfig::from_json("not json"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_config_serializes_round_trip() {
        let config = SyncConfig::builder().quota_limit(5).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();

        assert_eq!(SyncConfig::from_json(&json).unwrap(), config);
    }
}
