mod analytics;
mod config;
mod db;
mod error;
mod export;
mod models;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::fs::OpenOptions;

use config::Config;

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let db_override = take_db_flag(&mut args)?;
    let config = Config::load(db_override.as_deref())?;

    let tui = args.len() == 1;
    init_logging(&config, tui)?;

    if tui {
        run::as_tui(&config)
    } else {
        run::as_cli(&args, &config)
    }
}

/// Pull `--db <path>` (or `--db=<path>`) out of the argument list.
fn take_db_flag(args: &mut Vec<String>) -> Result<Option<String>> {
    if let Some(pos) = args.iter().position(|a| a.starts_with("--db=")) {
        let arg = args.remove(pos);
        return Ok(arg.strip_prefix("--db=").map(str::to_string));
    }
    match args.iter().position(|a| a == "--db") {
        Some(pos) if pos + 1 < args.len() => {
            let value = args.remove(pos + 1);
            args.remove(pos);
            Ok(Some(value))
        }
        Some(_) => anyhow::bail!("--db requires a path"),
        None => Ok(None),
    }
}

fn init_logging(config: &Config, tui: bool) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::new().filter_or(config::LOG_VAR, "warn"));

    // Raw-mode terminals can't share stderr with the log
    if tui {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                config.data_dir.display()
            )
        })?;
        let path = config.data_dir.join("acctdash.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
