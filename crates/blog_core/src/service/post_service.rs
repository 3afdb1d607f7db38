//! Post use-case service.
//!
//! # Responsibility
//! - Create, read, update and soft-delete posts on behalf of a principal.
//! - Administrative restore and permanent erase.
//! - Feed the month query into the calendar grid builder.
//!
//! # Invariants
//! - Every mutation of an existing post passes `PostPolicy::authorize`.
//! - Drafts are validated before any SQL runs.
//! - The calendar sees only visible posts, oldest first.

use crate::calendar::{CalendarError, CalendarGrid, CalendarRequest, MonthRef};
use crate::model::post::{Post, PostDraft, PostId};
use crate::model::user::Principal;
use crate::model::validation::ValidationError;
use crate::policy::{PolicyError, PostAction, PostPolicy};
use crate::repo::post_repo::{PostListQuery, PostRepository, RepoError};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PostServiceResult<T> = Result<T, PostServiceError>;

#[derive(Debug)]
pub enum PostServiceError {
    PostNotFound(PostId),
    Forbidden(PolicyError),
    Validation(ValidationError),
    Calendar(CalendarError),
    Repo(RepoError),
    /// Write succeeded but read-back disagreed.
    InconsistentState(&'static str),
}

impl Display for PostServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::Forbidden(err) => write!(f, "forbidden: {err}"),
            Self::Validation(err) => write!(f, "validation failed on `{}`: {err}", err.field()),
            Self::Calendar(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent post state: {details}"),
        }
    }
}

impl Error for PostServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Forbidden(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Calendar(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::PostNotFound(_) | Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for PostServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::PostNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for PostServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PolicyError> for PostServiceError {
    fn from(value: PolicyError) -> Self {
        Self::Forbidden(value)
    }
}

impl From<CalendarError> for PostServiceError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

/// Post service facade over a repository implementation.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Publishes a new post authored by `principal`.
    pub fn create_post(&self, principal: &Principal, draft: PostDraft) -> PostServiceResult<Post> {
        draft.validate()?;
        let post = Post::new(principal.user_id, draft, Utc::now());
        let id = self.repo.create_post(&post)?;

        info!(
            "event=post_create module=service status=ok post_id={} author_id={}",
            id, principal.user_id
        );
        self.read_back(id, "created post not found in read-back")
    }

    /// Gets one visible post.
    pub fn get_post(&self, id: PostId) -> PostServiceResult<Post> {
        self.repo
            .get_post(id, false)?
            .ok_or(PostServiceError::PostNotFound(id))
    }

    pub fn list_posts(&self, query: &PostListQuery) -> PostServiceResult<Vec<Post>> {
        Ok(self.repo.list_posts(query)?)
    }

    /// Replaces title and content. Author only.
    pub fn update_post(
        &self,
        principal: &Principal,
        id: PostId,
        draft: PostDraft,
    ) -> PostServiceResult<Post> {
        let mut post = self.get_post(id)?;
        self.authorize(PostAction::Update, principal, &post)?;
        draft.validate()?;

        post.apply(draft, Utc::now());
        self.repo.update_post(&post)?;

        info!("event=post_update module=service status=ok post_id={id}");
        self.read_back(id, "updated post not found in read-back")
    }

    /// Soft-deletes a visible post. Author only.
    pub fn delete_post(&self, principal: &Principal, id: PostId) -> PostServiceResult<()> {
        let mut post = self.get_post(id)?;
        self.authorize(PostAction::Delete, principal, &post)?;

        post.soft_delete(Utc::now());
        self.repo.save_deletion_marker(&post)?;
        info!("event=post_delete module=service status=ok post_id={id} mode=soft");
        Ok(())
    }

    /// Clears the soft-delete marker. Admin only.
    pub fn restore_post(&self, principal: &Principal, id: PostId) -> PostServiceResult<Post> {
        let mut post = self.load_any(id)?;
        self.authorize(PostAction::Restore, principal, &post)?;

        post.restore();
        self.repo.save_deletion_marker(&post)?;
        info!("event=post_restore module=service status=ok post_id={id}");
        self.read_back(id, "restored post not visible in read-back")
    }

    /// Erases the post row, deleted or not. Admin only.
    pub fn force_delete_post(&self, principal: &Principal, id: PostId) -> PostServiceResult<()> {
        let post = self.load_any(id)?;
        self.authorize(PostAction::ForceDelete, principal, &post)?;

        self.repo.force_delete_post(id)?;
        info!("event=post_delete module=service status=ok post_id={id} mode=force");
        Ok(())
    }

    /// Month grid of visible posts created in `month`.
    pub fn calendar(&self, month: MonthRef) -> PostServiceResult<CalendarGrid> {
        let (start, end) = month.utc_bounds();
        let posts = self.repo.list_created_between(start, end)?;
        let grid = CalendarGrid::for_month(month, posts);

        info!(
            "event=calendar_build module=service status=ok month={} posts={}",
            month,
            grid.post_count()
        );
        Ok(grid)
    }

    /// Resolves `request` against `today`, then builds the month grid.
    pub fn calendar_for(
        &self,
        request: CalendarRequest,
        today: NaiveDate,
    ) -> PostServiceResult<CalendarGrid> {
        let month = request.resolve(today)?;
        self.calendar(month)
    }

    fn load_any(&self, id: PostId) -> PostServiceResult<Post> {
        self.repo
            .get_post(id, true)?
            .ok_or(PostServiceError::PostNotFound(id))
    }

    fn read_back(&self, id: PostId, details: &'static str) -> PostServiceResult<Post> {
        self.repo
            .get_post(id, false)?
            .ok_or(PostServiceError::InconsistentState(details))
    }

    fn authorize(
        &self,
        action: PostAction,
        principal: &Principal,
        post: &Post,
    ) -> PostServiceResult<()> {
        PostPolicy::authorize(action, principal, post).map_err(|err| {
            warn!(
                "event=post_authorize module=service status=denied action={} post_id={} user_id={}",
                action.as_str(),
                post.id,
                principal.user_id
            );
            PostServiceError::from(err)
        })
    }
}
