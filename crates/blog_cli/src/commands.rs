//! Subcommand dispatch onto the core services.

use crate::config::{ActingUser, CalendarArgs, Command, DraftArgs, PostCommand, UserCommand};
use crate::render::render_calendar;
use anyhow::{anyhow, Context, Result};
use blog_core::{
    CalendarRequest, Post, PostDraft, PostId, PostListQuery, PostService, Principal,
    SqlitePostRepository, SqliteUserRepository, User, UserId, UserRepository,
};
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// JSON shape of `post show`/`post list`: the stored post plus its author's
/// display name (`null` when the author row is gone).
#[derive(Serialize)]
struct PostView<'a> {
    #[serde(flatten)]
    post: &'a Post,
    author_name: Option<String>,
}

/// Executes `command` and returns the text to print.
pub fn run(conn: &Connection, command: Command) -> Result<String> {
    match command {
        Command::User(UserCommand::Add { name, email, admin }) => add_user(conn, name, &email, admin),
        Command::Post(command) => run_post(conn, command),
        Command::Calendar(args) => calendar(conn, args),
    }
}

fn add_user(conn: &Connection, name: String, email: &str, admin: bool) -> Result<String> {
    let users = SqliteUserRepository::try_new(conn)?;
    let mut user = User::new(name, email, Utc::now());
    user.is_admin = admin;
    let id = users
        .create_user(&user)
        .with_context(|| format!("failed to add user `{}`", user.email))?;
    Ok(id.to_string())
}

fn run_post(conn: &Connection, command: PostCommand) -> Result<String> {
    let service = PostService::new(SqlitePostRepository::try_new(conn)?);

    match command {
        PostCommand::Create { acting, draft } => {
            let principal = resolve_principal(conn, &acting)?;
            let post = service.create_post(&principal, to_draft(draft))?;
            Ok(post.id.to_string())
        }
        PostCommand::Show { id } => {
            let post = service.get_post(parse_post_id(&id)?)?;
            let views = with_author_names(conn, std::slice::from_ref(&post))?;
            Ok(serde_json::to_string_pretty(&views[0])?)
        }
        PostCommand::List {
            author,
            include_deleted,
            limit,
            offset,
        } => {
            let author_id = match author {
                Some(user) => Some(resolve_user(conn, &user)?.id),
                None => None,
            };
            let posts = service.list_posts(&PostListQuery {
                author_id,
                include_deleted,
                limit,
                offset,
            })?;
            Ok(serde_json::to_string_pretty(&with_author_names(conn, &posts)?)?)
        }
        PostCommand::Update { id, acting, draft } => {
            let principal = resolve_principal(conn, &acting)?;
            let post = service.update_post(&principal, parse_post_id(&id)?, to_draft(draft))?;
            Ok(serde_json::to_string_pretty(&post)?)
        }
        PostCommand::Delete { id, acting } => {
            let principal = resolve_principal(conn, &acting)?;
            service.delete_post(&principal, parse_post_id(&id)?)?;
            Ok(format!("deleted {id}"))
        }
        PostCommand::Restore { id, acting } => {
            let principal = resolve_principal(conn, &acting)?;
            let post = service.restore_post(&principal, parse_post_id(&id)?)?;
            Ok(format!("restored {}", post.id))
        }
        PostCommand::Purge { id, acting } => {
            let principal = resolve_principal(conn, &acting)?;
            service.force_delete_post(&principal, parse_post_id(&id)?)?;
            Ok(format!("purged {id}"))
        }
    }
}

fn calendar(conn: &Connection, args: CalendarArgs) -> Result<String> {
    let service = PostService::new(SqlitePostRepository::try_new(conn)?);
    let request = CalendarRequest {
        year: args.year,
        month: args.month,
    };
    let today = Utc::now().date_naive();
    let grid = service.calendar_for(request, today)?;
    Ok(render_calendar(&grid, today))
}

fn with_author_names<'a>(conn: &Connection, posts: &'a [Post]) -> Result<Vec<PostView<'a>>> {
    let users = SqliteUserRepository::try_new(conn)?;
    let mut names: HashMap<UserId, Option<String>> = HashMap::new();
    let mut views = Vec::with_capacity(posts.len());
    for post in posts {
        let author_name = match names.get(&post.author_id) {
            Some(name) => name.clone(),
            None => {
                let name = users.get_user(post.author_id)?.map(|user| user.name);
                names.insert(post.author_id, name.clone());
                name
            }
        };
        views.push(PostView { post, author_name });
    }
    Ok(views)
}

fn to_draft(args: DraftArgs) -> PostDraft {
    PostDraft::new(args.title, args.content)
}

fn parse_post_id(value: &str) -> Result<PostId> {
    Uuid::parse_str(value.trim()).with_context(|| format!("invalid post id `{value}`"))
}

fn resolve_principal(conn: &Connection, acting: &ActingUser) -> Result<Principal> {
    let user = resolve_user(conn, &acting.user)?;
    Ok(Principal::from(&user))
}

/// Looks a user up by UUID, falling back to email.
fn resolve_user(conn: &Connection, key: &str) -> Result<User> {
    let users = SqliteUserRepository::try_new(conn)?;
    let found = match Uuid::parse_str(key.trim()) {
        Ok(id) => users.get_user(id)?,
        Err(_) => users.find_by_email(key)?,
    };
    found.ok_or_else(|| anyhow!("unknown user `{key}`"))
}
