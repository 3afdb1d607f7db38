//! Post domain model.
//!
//! # Responsibility
//! - Define the canonical post record and its soft-delete lifecycle.
//! - Own write-side validation (`Post::validate`).
//!
//! # Invariants
//! - `id` is never nil.
//! - `updated_at >= created_at`.
//! - A post is visible iff `deleted_at` is `None`.

use super::to_storage_precision;
use super::user::UserId;
use super::validation::{validate_content, validate_title, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PostId = Uuid;

/// Title/body pair submitted by create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Applies the title and content rules; title is checked first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_content(&self.content)
    }
}

/// Stored blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Creates a post with a fresh id, stamped `created_at = updated_at = at`.
    ///
    /// Does not validate; repositories call [`Post::validate`] before writing.
    pub fn new(author_id: UserId, draft: PostDraft, at: DateTime<Utc>) -> Self {
        let at = to_storage_precision(at);
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title,
            content: draft.content,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId);
        }
        validate_title(&self.title)?;
        validate_content(&self.content)
    }

    /// Replaces title and body and bumps `updated_at`.
    pub fn apply(&mut self, draft: PostDraft, at: DateTime<Utc>) {
        self.title = draft.title;
        self.content = draft.content;
        self.updated_at = to_storage_precision(at).max(self.created_at);
    }

    /// Sets the deletion marker; an already deleted post keeps its first one.
    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(to_storage_precision(at));
        }
    }

    /// Clears the deletion marker.
    pub fn restore(&mut self) {
        self.deleted_at = None;
    }

    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}
