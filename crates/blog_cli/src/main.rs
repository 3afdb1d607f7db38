//! `blog` command-line front end.
//!
//! # Responsibility
//! - Parse arguments, start logging, open the database.
//! - Resolve the acting user and default calendar month at the boundary.

mod commands;
mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use config::CliConfig;
use log::info;

fn main() -> Result<()> {
    let config = CliConfig::parse();

    if let Some(log_dir) = config.log_dir.as_deref() {
        let log_dir = log_dir
            .to_str()
            .context("--log-dir must be valid UTF-8")?;
        blog_core::init_logging(config.effective_log_level(), log_dir)?;
    }

    let conn = blog_core::db::open_db(&config.db)
        .with_context(|| format!("failed to open database `{}`", config.db.display()))?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        blog_core::core_version()
    );

    let output = commands::run(&conn, config.command)?;
    if !output.is_empty() {
        println!("{}", output.trim_end());
    }
    Ok(())
}
