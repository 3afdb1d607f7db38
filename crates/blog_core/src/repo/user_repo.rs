//! User repository contract and SQLite implementation.
//!
//! Emails are unique after normalization; inserting a duplicate surfaces
//! as a `RepoError::Db` constraint failure.

use super::ensure_schema_ready;
use super::post_repo::{parse_millis, parse_uuid, RepoResult};
use crate::model::user::{normalize_email, User, UserId};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT id, name, email, is_admin, created_at FROM users";
const USER_COLUMNS: &[&str] = &["id", "name", "email", "is_admin", "created_at"];

pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, &[("users", USER_COLUMNS)])?;
        Ok(Self { conn })
    }

    fn query_one(&self, column: &'static str, value: String) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE {column} = ?1;"))?;
        let mut rows = stmt.query([value])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (id, name, email, is_admin, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.id.to_string(),
                user.name.as_str(),
                normalize_email(&user.email),
                i64::from(user.is_admin),
                user.created_at.timestamp_millis(),
            ],
        )?;
        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.query_one("id", id.to_string())
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.query_one("email", normalize_email(email))
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let user = User {
        id: parse_uuid(row.get("id")?, "users.id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        is_admin: row.get::<_, i64>("is_admin")? == 1,
        created_at: parse_millis(row.get("created_at")?, "users.created_at")?,
    };
    user.validate()?;
    Ok(user)
}
