use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use rust_decimal::Decimal;

use super::app::{App, ExplorerView, Screen};
use crate::analytics::FilterSpec;
use crate::db::Database;
use crate::error::Error;
use crate::export;
use crate::models::AccountType;
use crate::run::{default_export_path, shellexpand};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit acctdash", cmd_quit, r);
    register_command!("quit", "Quit acctdash", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("a", "Go to Account Details", cmd_details, r);
    register_command!("details", "Go to Account Details", cmd_details, r);
    register_command!("e", "Go to Data Explorer", cmd_explorer, r);
    register_command!("explorer", "Go to Data Explorer", cmd_explorer, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!(
        "account",
        "Show an account (e.g. :account ACC-10008)",
        cmd_account,
        r
    );
    register_command!(
        "type",
        "Filter explorer by type (e.g. :type Savings, :type all)",
        cmd_type,
        r
    );
    register_command!(
        "range",
        "Filter explorer by balance (e.g. :range 1000 10000, :range clear)",
        cmd_range,
        r
    );
    register_command!(
        "filter",
        "Filter explorer (e.g. :filter Balance gt 5000, :filter clear)",
        cmd_filter,
        r
    );
    register_command!("clear", "Clear all explorer filters", cmd_clear, r);
    register_command!(
        "sql",
        "Run a read-only query (e.g. :sql SELECT * FROM AccountSummary)",
        cmd_sql,
        r
    );
    register_command!(
        "export",
        "Export the explorer view to CSV (e.g. :export ~/accounts.csv)",
        cmd_export,
        r
    );
    register_command!("tables", "List database tables", cmd_tables, r);
    register_command!(
        "columns",
        "Show a table's columns (e.g. :columns Accounts)",
        cmd_columns,
        r
    );
    register_command!("r", "Reload from the database", cmd_refresh, r);
    register_command!("refresh", "Reload from the database", cmd_refresh, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_error(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1)
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn is_clear(args: &str) -> bool {
    matches!(args.to_ascii_lowercase().as_str(), "" | "all" | "clear" | "none")
}

/// `$1,000.50` and `1000.5` both parse.
fn parse_money(s: &str) -> Option<Decimal> {
    let cleaned: String = s.chars().filter(|c| *c != '$' && *c != ',').collect();
    Decimal::from_str(&cleaned).ok()
}

fn show_accounts(app: &mut App) {
    app.screen = Screen::Explorer;
    app.explorer_view = ExplorerView::Accounts;
    app.set_status(format!(
        "{} of {} accounts",
        app.filtered.len(),
        app.accounts.len()
    ));
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_details(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Details;
    Ok(())
}

fn cmd_explorer(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Explorer;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_account(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :account <number>");
        return Ok(());
    }
    app.select_account_number(db, args)?;
    app.screen = Screen::Details;
    app.set_status(format!("Showing {}", args.trim()));
    Ok(())
}

fn cmd_type(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let filter = if is_clear(args) {
        None
    } else {
        // Prefer a type that exists, matched loosely; otherwise take it as typed
        let known = app
            .breakdown
            .iter()
            .map(|b| &b.account_type)
            .find(|t| t.as_str().eq_ignore_ascii_case(args))
            .cloned();
        Some(known.unwrap_or_else(|| AccountType::parse(args)))
    };
    app.update_filters(|a| a.type_filter = filter)?;
    show_accounts(app);
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let range = if is_clear(args) {
        None
    } else {
        let bounds: Vec<&str> = args.split_whitespace().collect();
        match bounds.as_slice() {
            [low, high] => {
                let low = parse_money(low)
                    .ok_or_else(|| Error::invalid_filter(format!("'{low}' is not an amount")))?;
                let high = parse_money(high)
                    .ok_or_else(|| Error::invalid_filter(format!("'{high}' is not an amount")))?;
                Some((low, high))
            }
            _ => {
                app.set_status("Usage: :range <min> <max> or :range clear");
                return Ok(());
            }
        }
    };
    app.update_filters(|a| a.balance_range = range)?;
    show_accounts(app);
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let spec = if is_clear(args) {
        None
    } else {
        Some(FilterSpec::parse(args)?)
    };
    app.update_filters(|a| a.custom_filter = spec)?;
    show_accounts(app);
    Ok(())
}

fn cmd_clear(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.update_filters(|a| {
        a.type_filter = None;
        a.balance_range = None;
        a.custom_filter = None;
    })?;
    show_accounts(app);
    Ok(())
}

fn cmd_sql(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :sql SELECT ...");
        return Ok(());
    }
    let table = db.run_custom_query(args)?;
    let count = table.len();
    app.query_result = Some(table);
    app.last_query = args.to_string();
    app.screen = Screen::Explorer;
    app.explorer_view = ExplorerView::Query;
    app.explorer_index = 0;
    app.explorer_scroll = 0;
    app.set_status(format!(
        "Query returned {count} row{}",
        if count == 1 { "" } else { "s" }
    ));
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let query = app
        .query_result
        .as_ref()
        .filter(|_| app.explorer_view == ExplorerView::Query);
    let path = if args.is_empty() {
        default_export_path(if query.is_some() { "query" } else { "accounts" })
    } else {
        shellexpand(args)
    };

    let count = match query {
        Some(table) => export::export_table(Path::new(&path), table)?,
        None => export::export_accounts(Path::new(&path), &app.filtered)?,
    };
    app.set_status(format!("Exported {count} rows to {path}"));
    Ok(())
}

fn cmd_tables(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.set_status("");
    app.refresh_tables(db);
    app.screen = Screen::Explorer;
    app.explorer_view = ExplorerView::Tables;
    app.explorer_index = 0;
    app.explorer_scroll = 0;
    if !app.status_is_error {
        app.set_status(format!("{} tables", app.tables.len()));
    }
    Ok(())
}

fn cmd_columns(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :columns <table>");
        return Ok(());
    }
    let columns = db.table_columns(args)?;
    app.set_status(format!("{args}: {}", columns.join(", ")));
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.set_status("");
    app.refresh_all(db);
    if !app.status_is_error {
        app.set_status(format!("Reloaded {} accounts", app.accounts.len()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
