//! Ownership-based authorization for post mutations.
//!
//! # Invariants
//! - Only a post's author may update or soft-delete it.
//! - Restore and permanent erase are administrative actions.
//! - Checks deny by default: any action not granted below is forbidden.

use crate::model::post::{Post, PostId};
use crate::model::user::{Principal, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mutation a principal may attempt on an existing post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostAction {
    Update,
    Delete,
    Restore,
    ForceDelete,
}

impl PostAction {
    /// Stable id used in log lines and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::ForceDelete => "force_delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    Forbidden {
        action: PostAction,
        post_id: PostId,
        user_id: UserId,
    },
}

impl Display for PolicyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forbidden {
                action,
                post_id,
                user_id,
            } => write!(
                f,
                "user {user_id} may not {} post {post_id}",
                action.as_str()
            ),
        }
    }
}

impl Error for PolicyError {}

/// Authorization rules for posts.
pub struct PostPolicy;

impl PostPolicy {
    pub fn can_update(principal: &Principal, post: &Post) -> bool {
        post.is_authored_by(principal.user_id)
    }

    pub fn can_delete(principal: &Principal, post: &Post) -> bool {
        post.is_authored_by(principal.user_id)
    }

    pub fn can_restore(principal: &Principal, _post: &Post) -> bool {
        principal.is_admin()
    }

    pub fn can_force_delete(principal: &Principal, _post: &Post) -> bool {
        principal.is_admin()
    }

    /// Returns `Ok(())` when `principal` may perform `action` on `post`.
    pub fn authorize(
        action: PostAction,
        principal: &Principal,
        post: &Post,
    ) -> Result<(), PolicyError> {
        let allowed = match action {
            PostAction::Update => Self::can_update(principal, post),
            PostAction::Delete => Self::can_delete(principal, post),
            PostAction::Restore => Self::can_restore(principal, post),
            PostAction::ForceDelete => Self::can_force_delete(principal, post),
        };

        if allowed {
            Ok(())
        } else {
            Err(PolicyError::Forbidden {
                action,
                post_id: post.id,
                user_id: principal.user_id,
            })
        }
    }
}
