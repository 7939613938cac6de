//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the sync engine:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other crates depend on. It
//! owns the logging conventions (`tracing` + `tracing-subscriber`) and the
//! validated [`SyncConfig`](config::SyncConfig) that sizes quotas and error
//! budgets.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{SyncConfig, SyncConfigBuilder};
pub use error::{Error, Result};
