//! Core domain logic for the blog.
//! This crate is the single source of truth for business invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use calendar::{CalendarCell, CalendarError, CalendarGrid, CalendarRequest, MonthRef};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::post::{Post, PostDraft, PostId};
pub use model::user::{Principal, Role, User, UserId};
pub use model::validation::ValidationError;
pub use policy::{PolicyError, PostAction, PostPolicy};
pub use repo::post_repo::{
    PostListQuery, PostRepository, RepoError, RepoResult, SqlitePostRepository,
};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use service::post_service::{PostService, PostServiceError, PostServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
