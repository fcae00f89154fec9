use anyhow::Result;
use std::path::Path;

use super::{default_export_path, open_database, shellexpand};
use crate::analytics::{self, FilterSpec};
use crate::config::Config;
use crate::db::Database;
use crate::export;
use crate::models::{Account, Table, TIMESTAMP_FORMAT};
use crate::ui::util::{format_amount, truncate};

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    match args[1].as_str() {
        "accounts" | "ls" => cli_accounts(config),
        "account" | "a" => cli_account(&args[2..], config),
        "summary" | "s" => cli_summary(config),
        "overview" | "o" => cli_overview(config),
        "filter" | "f" => cli_filter(&args[2..], config),
        "query" | "sql" => cli_query(&args[2..], config),
        "export" => cli_export(&args[2..], config),
        "tables" => cli_tables(config),
        "seed" => cli_seed(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("acctdash {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("acctdash - read-only account analytics");
    println!();
    println!("Usage: acctdash [--db <path>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Launch interactive TUI");
    println!("  accounts                        List all accounts");
    println!("  account <id|number>             Show one account against its peers");
    println!("  summary                         Per-type totals from AccountSummary");
    println!("  overview                        Totals, distribution and top balances");
    println!("  filter <field> <op> <value> [<upper>]");
    println!("                                  e.g. filter Balance range 1000 10000");
    println!("  query <sql>                     Run a read-only SELECT");
    println!("  export [path]                   Export accounts to CSV");
    println!("    --query <sql>                 Export a query result instead");
    println!("  tables                          List tables and their columns");
    println!("  seed <path>                     Create a sample database at a new path");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
    println!();
    println!("Environment: ACCTDASH_DATABASE, ACCTDASH_BUSY_TIMEOUT_MS, ACCTDASH_LOG");
}

/// Open the database and make sure `Accounts` is readable.
fn open_accounts(config: &Config) -> Result<Database> {
    let db = open_database(config)?;
    db.check_connection()?;
    Ok(db)
}

fn cli_accounts(config: &Config) -> Result<()> {
    let db = open_accounts(config)?;
    let accounts = db.fetch_all_accounts()?;
    db.close()?;

    if accounts.is_empty() {
        println!("No accounts");
        return Ok(());
    }
    print_accounts(&accounts);
    Ok(())
}

fn cli_account(args: &[String], config: &Config) -> Result<()> {
    let Some(key) = args.first() else {
        anyhow::bail!("Usage: acctdash account <id|number>");
    };

    let db = open_accounts(config)?;
    let account = match key.parse::<i64>() {
        Ok(id) => db.fetch_account_by_id(id)?,
        Err(_) => db.fetch_account_by_number(key)?,
    };
    let all = db.fetch_all_accounts()?;
    db.close()?;

    let cmp = analytics::balance_comparison(&account, &all);
    println!("{} ({})", account.number, account.account_type);
    println!("{}", "─".repeat(40));
    println!("  ID:            {}", account.id);
    println!("  Balance:       {}", format_amount(account.balance));
    println!("  Created:       {}", account.created.format(TIMESTAMP_FORMAT));
    println!("  Last Updated:  {}", account.last_updated.format(TIMESTAMP_FORMAT));
    println!();
    println!("  Type Average:  {}", format_amount(cmp.type_average));
    println!("  Overall Avg:   {}", format_amount(cmp.overall_average));
    println!(
        "  Percentile:    {:.1}% of {} accounts",
        cmp.percentile * 100.0,
        account.account_type
    );
    Ok(())
}

fn cli_summary(config: &Config) -> Result<()> {
    let db = open_accounts(config)?;
    let mut summaries = db.fetch_summary_by_type()?;
    db.close()?;
    summaries.sort_by(|a, b| b.total_balance.cmp(&a.total_balance));

    println!(
        "{:<14} {:>5} {:>16} {:>16} {:>14} {:>16}",
        "Type", "Count", "Total", "Average", "Min", "Max"
    );
    println!("{}", "─".repeat(86));
    for s in &summaries {
        println!(
            "{:<14} {:>5} {:>16} {:>16} {:>14} {:>16}",
            truncate(s.account_type.as_str(), 14),
            s.count,
            format_amount(s.total_balance),
            format_amount(s.average_balance),
            format_amount(s.min_balance),
            format_amount(s.max_balance),
        );
    }
    Ok(())
}

fn cli_overview(config: &Config) -> Result<()> {
    let db = open_accounts(config)?;
    let accounts = db.fetch_all_accounts()?;
    db.close()?;

    let m = analytics::compute_overview_metrics(&accounts);
    println!("Overview");
    println!("{}", "─".repeat(40));
    println!("  Accounts:        {}", m.total_accounts);
    println!("  Total Balance:   {}", format_amount(m.total_balance));
    println!("  Average Balance: {}", format_amount(m.average_balance));
    for (account_type, count) in &m.count_by_type {
        println!("    {:<14} {count}", account_type.as_str());
    }

    if let Some(d) = analytics::balance_distribution(&accounts) {
        println!();
        println!("Distribution");
        println!(
            "  Min {}  Q1 {}  Median {}  Q3 {}  Max {}",
            format_amount(d.min),
            format_amount(d.q1),
            format_amount(d.median),
            format_amount(d.q3),
            format_amount(d.max),
        );
    }

    let top = analytics::top_by_balance(&accounts, 5);
    if !top.is_empty() {
        println!();
        println!("Top {} by Balance", top.len());
        print_accounts(&top);
    }
    Ok(())
}

fn cli_filter(args: &[String], config: &Config) -> Result<()> {
    // Re-quote so values with spaces survive tokenizing
    let input = args
        .iter()
        .map(|a| format!("\"{a}\""))
        .collect::<Vec<_>>()
        .join(" ");
    let spec = FilterSpec::parse(&input)?;

    let db = open_accounts(config)?;
    let accounts = db.fetch_all_accounts()?;
    db.close()?;

    let matched = analytics::filter_accounts(&accounts, &spec)?;
    if matched.is_empty() {
        println!("No accounts match {spec}");
    } else {
        print_accounts(&matched);
    }
    Ok(())
}

fn cli_query(args: &[String], config: &Config) -> Result<()> {
    let sql = args.join(" ");
    if sql.trim().is_empty() {
        anyhow::bail!("Usage: acctdash query <sql>");
    }
    let db = open_database(config)?;
    let table = db.run_custom_query(&sql)?;
    db.close()?;
    print_table(&table);
    Ok(())
}

fn cli_export(args: &[String], config: &Config) -> Result<()> {
    let query = args
        .windows(2)
        .find(|w| w[0] == "--query")
        .map(|w| w[1].clone());

    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            default_export_path(if query.is_some() { "query" } else { "accounts" })
        });

    let count = match query {
        Some(sql) => {
            let db = open_database(config)?;
            let table = db.run_custom_query(&sql)?;
            db.close()?;
            export::export_table(Path::new(&output_path), &table)?
        }
        None => {
            let db = open_accounts(config)?;
            let accounts = db.fetch_all_accounts()?;
            db.close()?;
            export::export_accounts(Path::new(&output_path), &accounts)?
        }
    };
    println!("Exported {count} rows to {output_path}");
    Ok(())
}

fn cli_tables(config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let tables = db.list_tables()?;
    if tables.is_empty() {
        println!("No tables");
    }
    for table in &tables {
        let columns = db.table_columns(table)?;
        println!("{table}: {}", columns.join(", "));
    }
    db.close()?;
    Ok(())
}

fn cli_seed(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        anyhow::bail!("Usage: acctdash seed <path>");
    };
    let path = shellexpand(path);
    let count = Database::seed(Path::new(&path))?;
    println!("Seeded {count} accounts into {path}");
    Ok(())
}

fn print_accounts(accounts: &[Account]) {
    println!(
        "{:<6} {:<14} {:<12} {:>16}  Last Updated",
        "ID", "Number", "Type", "Balance"
    );
    println!("{}", "─".repeat(72));
    for a in accounts {
        println!(
            "{:<6} {:<14} {:<12} {:>16}  {}",
            a.id,
            truncate(&a.number, 14),
            truncate(a.account_type.as_str(), 12),
            format_amount(a.balance),
            a.last_updated.format(TIMESTAMP_FORMAT),
        );
    }
}

const MAX_CELL: usize = 30;

fn print_table(table: &Table) {
    if table.is_empty() {
        println!("{}", table.columns.join("  "));
        println!("(0 rows)");
        return;
    }
    // A single row reads better vertically
    if let (1, Some(record)) = (table.len(), table.record(0)) {
        let width = table.columns.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        for (name, value) in record.iter() {
            println!("{name:<width$}  {value}");
        }
        return;
    }

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| truncate(&v.to_string(), MAX_CELL)).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .filter_map(|r| r.get(i))
                .map(|s| s.chars().count())
                .chain(std::iter::once(c.chars().count().min(MAX_CELL)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<String>| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };
    println!(
        "{}",
        line(table.columns.iter().map(|c| truncate(c, MAX_CELL)).collect())
    );
    let rule = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    println!("{}", "─".repeat(rule));
    for row in cells {
        println!("{}", line(row));
    }
    println!("({} row{})", table.len(), if table.len() == 1 { "" } else { "s" });
}
