//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `posts` table, including the soft-delete lifecycle.
//! - The month-range query feeding the calendar view.
//!
//! # Invariants
//! - Writes call `Post::validate()` before SQL mutations.
//! - Reads reject malformed persisted rows instead of masking them.
//! - Default reads hide rows with a `deleted_at` marker.

use super::ensure_schema_ready;
use crate::db::DbError;
use crate::model::post::{Post, PostId};
use crate::model::user::UserId;
use crate::model::validation::ValidationError;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const POST_SELECT_SQL: &str = "SELECT
    id,
    author_id,
    title,
    content,
    created_at,
    updated_at,
    deleted_at
FROM posts";

const POST_COLUMNS: &[&str] = &[
    "id",
    "author_id",
    "title",
    "content",
    "created_at",
    "updated_at",
    "deleted_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for post and user persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(Uuid),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Listing options; newest posts first.
#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    pub author_id: Option<UserId>,
    pub include_deleted: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for posts.
pub trait PostRepository {
    fn create_post(&self, post: &Post) -> RepoResult<PostId>;
    /// Persists title, content and `updated_at` of an existing, visible post.
    fn update_post(&self, post: &Post) -> RepoResult<()>;
    fn get_post(&self, id: PostId, include_deleted: bool) -> RepoResult<Option<Post>>;
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    /// Visible posts with `start <= created_at < end`, oldest first.
    fn list_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Post>>;
    /// Persists `post.deleted_at` as set by `Post::soft_delete`/`Post::restore`.
    fn save_deletion_marker(&self, post: &Post) -> RepoResult<()>;
    /// Erases the row regardless of its soft-delete state.
    fn force_delete_post(&self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &[("posts", POST_COLUMNS)])?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, post: &Post) -> RepoResult<PostId> {
        post.validate()?;

        self.conn.execute(
            "INSERT INTO posts (
                id,
                author_id,
                title,
                content,
                created_at,
                updated_at,
                deleted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                post.id.to_string(),
                post.author_id.to_string(),
                post.title.as_str(),
                post.content.as_str(),
                post.created_at.timestamp_millis(),
                post.updated_at.timestamp_millis(),
                post.deleted_at.map(|at| at.timestamp_millis()),
            ],
        )?;

        Ok(post.id)
    }

    fn update_post(&self, post: &Post) -> RepoResult<()> {
        post.validate()?;

        let changed = self.conn.execute(
            "UPDATE posts
             SET
                title = ?1,
                content = ?2,
                updated_at = ?3
             WHERE id = ?4
               AND deleted_at IS NULL;",
            params![
                post.title.as_str(),
                post.content.as_str(),
                post.updated_at.timestamp_millis(),
                post.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(post.id));
        }
        Ok(())
    }

    fn get_post(&self, id: PostId, include_deleted: bool) -> RepoResult<Option<Post>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POST_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 1 OR deleted_at IS NULL);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), i64::from(include_deleted)])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_post_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let mut sql = format!("{POST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND deleted_at IS NULL");
        }
        if let Some(author_id) = query.author_id {
            sql.push_str(" AND author_id = ?");
            bind_values.push(Value::Text(author_id.to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        match query.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ?");
                bind_values.push(Value::Integer(i64::from(limit)));
            }
            None if query.offset > 0 => sql.push_str(" LIMIT -1"),
            None => {}
        }
        if query.offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }
        Ok(posts)
    }

    fn list_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Post>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POST_SELECT_SQL}
             WHERE deleted_at IS NULL
               AND created_at >= ?1
               AND created_at < ?2
             ORDER BY created_at ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query(params![start.timestamp_millis(), end.timestamp_millis()])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }
        Ok(posts)
    }

    fn save_deletion_marker(&self, post: &Post) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE posts SET deleted_at = ?2 WHERE id = ?1;",
            params![
                post.id.to_string(),
                post.deleted_at.map(|at| at.timestamp_millis()),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(post.id));
        }
        Ok(())
    }

    fn force_delete_post(&self, id: PostId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM posts WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let id = parse_uuid(row.get("id")?, "posts.id")?;
    let author_id = parse_uuid(row.get("author_id")?, "posts.author_id")?;
    let deleted_at = match row.get::<_, Option<i64>>("deleted_at")? {
        Some(millis) => Some(parse_millis(millis, "posts.deleted_at")?),
        None => None,
    };

    let post = Post {
        id,
        author_id,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: parse_millis(row.get("created_at")?, "posts.created_at")?,
        updated_at: parse_millis(row.get("updated_at")?, "posts.updated_at")?,
        deleted_at,
    };
    post.validate()?;
    Ok(post)
}

pub(crate) fn parse_uuid(value: String, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp `{value}` out of range in {column}"))
    })
}
