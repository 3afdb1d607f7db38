//! Domain model for posts, users and the acting principal.
//!
//! # Invariants
//! - Every post and user is identified by a non-nil UUID.
//! - Post deletion is a `deleted_at` marker; rows are only erased by an
//!   explicit administrative purge.
//! - Timestamps are UTC with millisecond precision, matching storage.

pub mod post;
pub mod user;
pub mod validation;

use chrono::{DateTime, Utc};

/// Truncates an instant to whole milliseconds, the storage precision.
pub fn to_storage_precision(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}
