//! CSV output for account listings and ad-hoc query results.

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::{Account, Table, TIMESTAMP_FORMAT};

const ACCOUNT_HEADER: [&str; 6] = [
    "AccountID",
    "AccountNumber",
    "Balance",
    "AccountType",
    "CreatedDate",
    "LastUpdated",
];

/// Write `accounts` with a header row. Returns the number of data rows.
pub(crate) fn write_accounts_csv<W: Write>(writer: W, accounts: &[Account]) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(ACCOUNT_HEADER)?;
    for a in accounts {
        wtr.write_record([
            a.id.to_string(),
            a.number.clone(),
            format!("{:.2}", a.balance),
            a.account_type.to_string(),
            a.created.format(TIMESTAMP_FORMAT).to_string(),
            a.last_updated.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(accounts.len())
}

/// Write a query result. The header is emitted even when there are no rows.
pub(crate) fn write_table_csv<W: Write>(writer: W, table: &Table) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(table.len())
}

pub(crate) fn export_accounts(path: &Path, accounts: &[Account]) -> Result<usize> {
    let file = std::fs::File::create(path).map_err(csv::Error::from)?;
    let count = write_accounts_csv(file, accounts)?;
    log::info!("exported {count} accounts to {}", path.display());
    Ok(count)
}

pub(crate) fn export_table(path: &Path, table: &Table) -> Result<usize> {
    let file = std::fs::File::create(path).map_err(csv::Error::from)?;
    let count = write_table_csv(file, table)?;
    log::info!("exported {count} rows to {}", path.display());
    Ok(count)
}
