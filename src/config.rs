use anyhow::{Context, Result};
use dotenv::dotenv;
use std::path::PathBuf;
use std::time::Duration;

use crate::run::shellexpand;

pub(crate) const DATABASE_VAR: &str = "ACCTDASH_DATABASE";
pub(crate) const BUSY_TIMEOUT_VAR: &str = "ACCTDASH_BUSY_TIMEOUT_MS";
pub(crate) const LOG_VAR: &str = "ACCTDASH_LOG";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 2000;
const DEFAULT_DB_FILE: &str = "accounts.db";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub(crate) database: PathBuf,
    pub(crate) busy_timeout: Duration,
    /// Home of the default database and the TUI log file.
    pub(crate) data_dir: PathBuf,
}

impl Config {
    /// Resolve settings from `--db`, then the environment (after loading
    /// `.env`), then the platform data directory.
    pub(crate) fn load(db_override: Option<&str>) -> Result<Self> {
        dotenv().ok();
        let proj_dirs = directories::ProjectDirs::from("com", "acctdash", "acctdash")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::from_lookup(db_override, proj_dirs.data_dir().to_path_buf(), |key| {
            std::env::var(key).ok()
        })
    }

    pub(crate) fn from_lookup(
        db_override: Option<&str>,
        data_dir: PathBuf,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let database = db_override
            .map(str::to_string)
            .or_else(|| lookup(DATABASE_VAR).filter(|v| !v.trim().is_empty()))
            .map(|p| PathBuf::from(shellexpand(p.trim())))
            .unwrap_or_else(|| data_dir.join(DEFAULT_DB_FILE));

        let busy_timeout_ms = match lookup(BUSY_TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{BUSY_TIMEOUT_VAR} must be milliseconds, got '{raw}'"))?,
            None => DEFAULT_BUSY_TIMEOUT_MS,
        };

        Ok(Self {
            database,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
            data_dir,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
