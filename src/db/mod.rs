mod guard;
mod schema;

use log::{debug, info, warn};
use rusqlite::{params, Batch, Connection, OpenFlags, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::*;

use guard::validate_read_only;

/// One session's handle on the accounts database.
///
/// Every read goes through an explicit `&Database`; the connection is opened
/// read-only and closed when the handle is dropped or `close`d.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::Connection(format!("{}: {e}", path.display())))?;
        conn.busy_timeout(busy_timeout)
            .map_err(|e| Error::Connection(e.to_string()))?;
        let db = Self::read_only(conn)?;
        info!("opened {} read-only", path.display());
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::SCHEMA)?;
        conn.execute_batch(schema::SEED)?;
        Self::read_only(conn)
    }

    fn read_only(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA query_only = ON;")
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Create a fresh database file from the static schema and seed scripts.
    /// This is the only place the crate writes, and it refuses to touch an
    /// existing file.
    pub(crate) fn seed(path: &Path) -> Result<usize> {
        if path.exists() {
            return Err(Error::Connection(format!(
                "{} already exists; refusing to overwrite",
                path.display()
            )));
        }
        let mut conn =
            Connection::open(path).map_err(|e| Error::Connection(format!("{}: {e}", path.display())))?;
        let tx = conn.transaction()?;
        tx.execute_batch(schema::SCHEMA)?;
        tx.execute_batch(schema::SEED)?;
        let count: i64 = tx.query_row("SELECT COUNT(*) FROM Accounts", [], |row| row.get(0))?;
        tx.commit()?;
        info!("seeded {} with {count} accounts", path.display());
        Ok(count as usize)
    }

    /// Release the connection, surfacing any close error.
    pub(crate) fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| Error::Connection(e.to_string()))
    }

    /// Confirm the `Accounts` table is reachable and readable.
    pub(crate) fn check_connection(&self) -> Result<()> {
        self.conn
            .query_row("SELECT COUNT(*) FROM Accounts", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(|e| {
                warn!("connection check failed: {e}");
                Error::Connection(e.to_string())
            })
    }

    // ── Accounts ──────────────────────────────────────────────

    pub(crate) fn fetch_all_accounts(&self) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM Accounts ORDER BY AccountID ASC",
            schema::ACCOUNT_COLUMNS
        ))?;
        let rows = stmt.query_map([], account_from_row)?;
        let accounts = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("fetched {} accounts", accounts.len());
        Ok(accounts)
    }

    pub(crate) fn fetch_account_by_id(&self, id: i64) -> Result<Account> {
        let result = self.conn.query_row(
            &format!(
                "SELECT {} FROM Accounts WHERE AccountID = ?1",
                schema::ACCOUNT_COLUMNS
            ),
            params![id],
            account_from_row,
        );
        match result {
            Ok(a) => Ok(a),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::account_not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn fetch_account_by_number(&self, number: &str) -> Result<Account> {
        let result = self.conn.query_row(
            &format!(
                "SELECT {} FROM Accounts WHERE AccountNumber = ?1",
                schema::ACCOUNT_COLUMNS
            ),
            params![number],
            account_from_row,
        );
        match result {
            Ok(a) => Ok(a),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::account_not_found(number)),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn fetch_account_numbers(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT AccountNumber FROM Accounts ORDER BY AccountID ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Highest balances first; ties keep `AccountID` order.
    pub(crate) fn fetch_top_accounts(&self, limit: usize) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM Accounts ORDER BY Balance DESC, AccountID ASC LIMIT ?1",
            schema::ACCOUNT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![limit as i64], account_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Analytics ─────────────────────────────────────────────

    /// Rows of the `AccountSummary` view, in whatever order the engine yields.
    pub(crate) fn fetch_summary_by_type(&self) -> Result<Vec<AccountTypeSummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM AccountSummary",
            schema::SUMMARY_COLUMNS
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(AccountTypeSummary {
                account_type: AccountType::parse(&row.get::<_, String>(0)?),
                count: row.get(1)?,
                total_balance: decimal_at(row, 2)?.round_dp(2),
                average_balance: decimal_at(row, 3)?.normalize(),
                min_balance: decimal_at(row, 4)?.round_dp(2),
                max_balance: decimal_at(row, 5)?.round_dp(2),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Explorer ──────────────────────────────────────────────

    /// Run caller-supplied SQL after checking it is a plain read.
    pub(crate) fn run_custom_query(&self, sql: &str) -> Result<Table> {
        if let Err(e) = validate_read_only(sql) {
            warn!("rejected ad-hoc query: {e}");
            return Err(e);
        }

        let mut batch = Batch::new(&self.conn, sql);
        let mut stmt = batch
            .next()
            .map_err(|e| Error::QueryExecution(e.to_string()))?
            .ok_or_else(|| Error::RejectedQuery("query is empty".into()))?;
        if batch
            .next()
            .map_err(|e| Error::QueryExecution(e.to_string()))?
            .is_some()
        {
            warn!("rejected ad-hoc query: more than one statement");
            return Err(Error::RejectedQuery(
                "only one statement can be run at a time".into(),
            ));
        }
        if !stmt.readonly() {
            warn!("rejected ad-hoc query: statement is not read-only");
            return Err(Error::RejectedQuery(
                "statement would modify the database".into(),
            ));
        }

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();
        let mut rows = stmt
            .query([])
            .map_err(|e| Error::QueryExecution(e.to_string()))?;

        let mut table = Table {
            columns,
            rows: Vec::new(),
        };
        while let Some(row) = rows
            .next()
            .map_err(|e| Error::QueryExecution(e.to_string()))?
        {
            let values = (0..width)
                .map(|i| row.get_ref(i).map(Value::from))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::QueryExecution(e.to_string()))?;
            table.rows.push(values);
        }
        debug!("ad-hoc query returned {} rows", table.len());
        Ok(table)
    }

    /// User tables, excluding SQLite internals.
    pub(crate) fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Column names of a table returned by `list_tables`.
    pub(crate) fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        // Identifiers cannot be bound as parameters, so only known names get
        // interpolated.
        let name = self
            .list_tables()?
            .into_iter()
            .find(|t| t.eq_ignore_ascii_case(table))
            .ok_or_else(|| Error::NotFound {
                kind: "Table",
                key: table.to_string(),
            })?;
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT name FROM pragma_table_info('{name}')"))?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        number: row.get(1)?,
        balance: decimal_at(row, 2)?,
        account_type: AccountType::parse(&row.get::<_, String>(3)?),
        created: timestamp_at(row, 4)?,
        last_updated: timestamp_at(row, 5)?,
    })
}

fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<chrono::NaiveDateTime> {
    let text: String = row.get(idx)?;
    parse_timestamp(&text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("invalid timestamp '{text}'").into(),
        )
    })
}

#[cfg(test)]
mod tests;
