//! # Core Quota
//!
//! Best-effort resource quota for repository sync.
//!
//! The quota is approximate and non-transactional: creations reserve a slot
//! with [`QuotaTracker::try_acquire`], confirmed deletions hand it back with
//! [`QuotaTracker::release`]. Nothing is refunded when a write fails after a
//! slot was granted.

pub mod error;
pub mod tracker;

pub use error::QuotaExceededError;
pub use tracker::{InMemoryQuotaTracker, QuotaTracker};
