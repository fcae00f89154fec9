mod cli;
mod tui;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::db::Database;

pub(crate) use cli::as_cli;
pub(crate) use tui::as_tui;

/// Open the configured database for one session.
pub(crate) fn open_database(config: &Config) -> Result<Database> {
    Database::open(&config.database, config.busy_timeout).with_context(|| {
        format!(
            "Could not open {} (create a sample with `acctdash seed <path>`)",
            config.database.display()
        )
    })
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

/// `~/acctdash-<what>-<date>.csv`, used when an export has no explicit path.
pub(crate) fn default_export_path(what: &str) -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    let date = chrono::Local::now().format("%Y-%m-%d");
    format!("{home}/acctdash-{what}-{date}.csv")
}
