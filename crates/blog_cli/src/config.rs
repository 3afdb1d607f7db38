//! Command-line configuration.
//!
//! Defaults are resolved here, at the process boundary: the database path,
//! the log level for the build mode, and the calendar month (today, UTC).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "blog.sqlite3";

/// Minimal blog with a month calendar of posts.
#[derive(Parser, Debug)]
#[command(name = "blog", version)]
#[command(about = "Create, edit and browse blog posts by month")]
pub struct CliConfig {
    /// SQLite database file
    #[arg(long, global = true, default_value = DEFAULT_DB_FILE_NAME)]
    pub db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (defaults to debug in debug builds, info otherwise)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn effective_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| blog_core::default_log_level())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Manage posts
    #[command(subcommand)]
    Post(PostCommand),
    /// Show posts of one month as a calendar
    Calendar(CalendarArgs),
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a user and print its id
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Grant restore/purge rights
        #[arg(long)]
        admin: bool,
    },
}

/// Acting user, by id or email.
#[derive(Args, Debug, Clone)]
pub struct ActingUser {
    #[arg(long = "as", value_name = "USER")]
    pub user: String,
}

#[derive(Args, Debug, Clone)]
pub struct DraftArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub content: String,
}

#[derive(Subcommand, Debug)]
pub enum PostCommand {
    /// Publish a new post
    Create {
        #[command(flatten)]
        acting: ActingUser,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Print one post as JSON
    Show { id: String },
    /// Print posts as JSON, newest first
    List {
        /// Only posts by this user (id or email)
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        include_deleted: bool,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Replace title and content of your post
    Update {
        id: String,
        #[command(flatten)]
        acting: ActingUser,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Soft-delete your post
    Delete {
        id: String,
        #[command(flatten)]
        acting: ActingUser,
    },
    /// Restore a soft-deleted post (admin)
    Restore {
        id: String,
        #[command(flatten)]
        acting: ActingUser,
    },
    /// Permanently erase a post (admin)
    Purge {
        id: String,
        #[command(flatten)]
        acting: ActingUser,
    },
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct CalendarArgs {
    /// Defaults to the current year
    #[arg(long, allow_negative_numbers = true)]
    pub year: Option<i32>,
    /// 1-12; defaults to the current month
    #[arg(long)]
    pub month: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::{CliConfig, Command, PostCommand, DEFAULT_DB_FILE_NAME};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        CliConfig::command().debug_assert();
    }

    #[test]
    fn calendar_defaults_leave_month_unset() {
        let config = CliConfig::try_parse_from(["blog", "calendar"]).unwrap();
        assert_eq!(config.db.to_str(), Some(DEFAULT_DB_FILE_NAME));
        match config.command {
            Command::Calendar(args) => {
                assert_eq!(args.year, None);
                assert_eq!(args.month, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let config = CliConfig::try_parse_from([
            "blog",
            "post",
            "update",
            "abc",
            "--as",
            "alice@example.com",
            "--title",
            "t",
            "--content",
            "c",
            "--db",
            "/tmp/other.sqlite3",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(config.db.to_str(), Some("/tmp/other.sqlite3"));
        assert_eq!(config.effective_log_level(), "warn");
        match config.command {
            Command::Post(PostCommand::Update { id, acting, draft }) => {
                assert_eq!(id, "abc");
                assert_eq!(acting.user, "alice@example.com");
                assert_eq!(draft.title, "t");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn mutations_require_acting_user() {
        assert!(CliConfig::try_parse_from(["blog", "post", "delete", "abc"]).is_err());
    }
}
