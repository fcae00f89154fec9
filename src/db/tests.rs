#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn summary_for<'a>(rows: &'a [AccountTypeSummary], t: &AccountType) -> &'a AccountTypeSummary {
    rows.iter().find(|r| &r.account_type == t).unwrap()
}

// ── Connection ────────────────────────────────────────────────

#[test]
fn test_open_missing_file_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.db");
    let result = Database::open(&path, Duration::from_millis(100));
    assert!(matches!(result, Err(Error::Connection(_))));
}

#[test]
fn test_check_connection_on_seeded_db() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.check_connection().is_ok());
}

#[test]
fn test_check_connection_without_accounts_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE Other (id INTEGER);")
        .unwrap();

    let db = Database::open(&path, Duration::from_millis(100)).unwrap();
    assert!(matches!(db.check_connection(), Err(Error::Connection(_))));
    assert_eq!(db.list_tables().unwrap(), vec!["Other".to_string()]);
}

#[test]
fn test_check_connection_not_a_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.db");
    std::fs::write(&path, b"this is definitely not an sqlite file, just text padding it out").unwrap();

    match Database::open(&path, Duration::from_millis(100)) {
        Ok(db) => assert!(matches!(db.check_connection(), Err(Error::Connection(_)))),
        Err(e) => assert!(matches!(e, Error::Connection(_))),
    }
}

#[test]
fn test_seed_then_open_read_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.db");
    assert_eq!(Database::seed(&path).unwrap(), 10);

    let db = Database::open(&path, Duration::from_millis(100)).unwrap();
    db.check_connection().unwrap();
    assert_eq!(db.fetch_all_accounts().unwrap().len(), 10);
    db.close().unwrap();
}

#[test]
fn test_seed_refuses_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.db");
    Database::seed(&path).unwrap();
    assert!(matches!(Database::seed(&path), Err(Error::Connection(_))));
}

#[test]
fn test_connection_is_read_only() {
    let db = Database::open_in_memory().unwrap();
    let result = db
        .conn
        .execute("UPDATE Accounts SET Balance = 0 WHERE AccountID = 1", []);
    assert!(result.is_err());
    let acct = db.fetch_account_by_id(1).unwrap();
    assert_eq!(acct.balance, dec!(2500.50));
}

// ── fetch_all_accounts ────────────────────────────────────────

#[test]
fn test_fetch_all_accounts_ordered_by_id() {
    let db = Database::open_in_memory().unwrap();
    let accounts = db.fetch_all_accounts().unwrap();
    assert!(accounts.windows(2).all(|w| w[0].id < w[1].id));
}

#[test]
fn test_fetch_all_accounts_matches_row_count() {
    let db = Database::open_in_memory().unwrap();
    let count: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM Accounts", [], |row| row.get(0))
        .unwrap();
    assert_eq!(db.fetch_all_accounts().unwrap().len() as i64, count);
}

#[test]
fn test_fetch_all_accounts_decodes_fields() {
    let db = Database::open_in_memory().unwrap();
    let accounts = db.fetch_all_accounts().unwrap();
    let first = &accounts[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.number, "ACC-10001");
    assert_eq!(first.balance, dec!(2500.50));
    assert_eq!(first.account_type, AccountType::Checking);
    assert_eq!(
        first.created.format(TIMESTAMP_FORMAT).to_string(),
        "2023-01-15 09:30:00"
    );
    assert_eq!(
        first.last_updated.format(TIMESTAMP_FORMAT).to_string(),
        "2024-03-01 10:00:00"
    );
}

#[test]
fn test_decimal_precision_preserved() {
    let db = Database::open_in_memory().unwrap();
    let accounts = db.fetch_all_accounts().unwrap();
    let balances: Vec<Decimal> = accounts.iter().map(|a| a.balance).collect();
    assert!(balances.contains(&dec!(103230.95)));
    assert!(balances.contains(&dec!(325.80)));
    assert!(balances.contains(&dec!(750.25)));
}

// ── fetch_account_by_id / number ──────────────────────────────

#[test]
fn test_fetch_account_by_id_matches_listing() {
    let db = Database::open_in_memory().unwrap();
    for account in db.fetch_all_accounts().unwrap() {
        assert_eq!(db.fetch_account_by_id(account.id).unwrap(), account);
    }
}

#[test]
fn test_fetch_account_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    let err = db.fetch_account_by_id(99999).unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: "Account", .. }));
    assert!(err.to_string().contains("99999"));
}

#[test]
fn test_fetch_account_by_number() {
    let db = Database::open_in_memory().unwrap();
    let acct = db.fetch_account_by_number("ACC-10008").unwrap();
    assert_eq!(acct.balance, dec!(950.00));
    assert_eq!(acct.account_type, AccountType::Savings);
    assert!(matches!(
        db.fetch_account_by_number("ACC-00000"),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn test_fetch_account_numbers() {
    let db = Database::open_in_memory().unwrap();
    let numbers = db.fetch_account_numbers().unwrap();
    assert_eq!(numbers.len(), 10);
    assert_eq!(numbers.first().unwrap(), "ACC-10001");
    assert_eq!(numbers.last().unwrap(), "ACC-10010");
}

#[test]
fn test_fetch_top_accounts() {
    let db = Database::open_in_memory().unwrap();
    let top = db.fetch_top_accounts(5).unwrap();
    let numbers: Vec<&str> = top.iter().map(|a| a.number.as_str()).collect();
    assert_eq!(
        numbers,
        vec!["ACC-10004", "ACC-10003", "ACC-10009", "ACC-10010", "ACC-10002"]
    );
}

// ── fetch_summary_by_type ─────────────────────────────────────

#[test]
fn test_summary_by_type_covers_every_type() {
    let db = Database::open_in_memory().unwrap();
    let rows = db.fetch_summary_by_type().unwrap();
    assert_eq!(rows.len(), 4);
    let total: i64 = rows.iter().map(|r| r.count).sum();
    assert_eq!(total, 10);
}

#[test]
fn test_summary_by_type_savings() {
    let db = Database::open_in_memory().unwrap();
    let rows = db.fetch_summary_by_type().unwrap();
    let savings = summary_for(&rows, &AccountType::Savings);
    assert_eq!(savings.count, 3);
    assert_eq!(savings.total_balance, dec!(6951.00));
    assert_eq!(savings.average_balance, dec!(2317));
    assert_eq!(savings.min_balance, dec!(750.25));
    assert_eq!(savings.max_balance, dec!(5250.75));
}

#[test]
fn test_summary_by_type_checking() {
    let db = Database::open_in_memory().unwrap();
    let rows = db.fetch_summary_by_type().unwrap();
    let checking = summary_for(&rows, &AccountType::Checking);
    assert_eq!(checking.count, 4);
    assert_eq!(checking.total_balance, dec!(13826.30));
    assert_eq!(checking.min_balance, dec!(325.80));
    assert_eq!(checking.max_balance, dec!(10000));
}

// ── Balance precision ─────────────────────────────────────────

fn writable_schema() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(schema::SCHEMA).unwrap();
    conn
}

#[test]
fn test_largest_balance_reads_back_exactly() {
    let conn = writable_schema();
    conn.execute(
        "INSERT INTO Accounts (AccountNumber, Balance, AccountType) VALUES ('ACC-1', 9999999999999.99, 'Savings'), ('ACC-2', -9999999999999.99, 'Savings')",
        [],
    )
    .unwrap();
    let db = Database::read_only(conn).unwrap();
    let accounts = db.fetch_all_accounts().unwrap();
    assert_eq!(accounts[0].balance, dec!(9999999999999.99));
    assert_eq!(accounts[1].balance, dec!(-9999999999999.99));
}

#[test]
fn test_balance_beyond_fifteen_digits_is_refused() {
    let conn = writable_schema();
    let result = conn.execute(
        "INSERT INTO Accounts (AccountNumber, Balance, AccountType) VALUES ('ACC-1', 1234567890123456.78, 'Savings')",
        [],
    );
    assert!(result.is_err());
    let result = conn.execute(
        "INSERT INTO Accounts (AccountNumber, Balance, AccountType) VALUES ('ACC-2', 10000000000000, 'Savings')",
        [],
    );
    assert!(result.is_err());
}

// ── run_custom_query ──────────────────────────────────────────

#[test]
fn test_custom_query_returns_columns_and_rows() {
    let db = Database::open_in_memory().unwrap();
    let table = db
        .run_custom_query(
            "SELECT AccountNumber, Balance, AccountType FROM Accounts WHERE Balance > 5000 ORDER BY Balance DESC",
        )
        .unwrap();
    assert_eq!(table.columns, vec!["AccountNumber", "Balance", "AccountType"]);
    assert_eq!(table.len(), 5);
    let first = table.record(0).unwrap();
    assert_eq!(first.get("AccountNumber"), Some(&Value::Text("ACC-10004".into())));
}

#[test]
fn test_custom_query_empty_result_keeps_columns() {
    let db = Database::open_in_memory().unwrap();
    let table = db
        .run_custom_query("SELECT AccountNumber FROM Accounts WHERE Balance < 0")
        .unwrap();
    assert!(table.is_empty());
    assert_eq!(table.columns, vec!["AccountNumber"]);
}

#[test]
fn test_custom_query_typed_values() {
    let db = Database::open_in_memory().unwrap();
    let table = db
        .run_custom_query("SELECT COUNT(*) AS n, NULL AS empty, 'x' AS label FROM Accounts")
        .unwrap();
    let rec = table.record(0).unwrap();
    assert_eq!(rec.get("n"), Some(&Value::Integer(10)));
    assert_eq!(rec.get("empty"), Some(&Value::Null));
    assert_eq!(rec.get("label"), Some(&Value::Text("x".into())));
}

#[test]
fn test_custom_query_rejects_writes_before_execution() {
    let db = Database::open_in_memory().unwrap();
    for sql in [
        "DROP TABLE Accounts",
        "SELECT 1; delete from Accounts",
        "update Accounts set Balance = 0",
        "/* harmless */ INSERT INTO Accounts (AccountNumber, AccountType) VALUES ('X', 'Y')",
        "SELECT * FROM Accounts --\n alter table Accounts add column z",
    ] {
        assert!(
            matches!(db.run_custom_query(sql), Err(Error::RejectedQuery(_))),
            "expected rejection: {sql}"
        );
    }
    assert_eq!(db.fetch_all_accounts().unwrap().len(), 10);
}

#[test]
fn test_custom_query_malformed_sql() {
    let db = Database::open_in_memory().unwrap();
    let err = db.run_custom_query("SELECT FROM WHERE").unwrap_err();
    assert!(matches!(err, Error::QueryExecution(_)));
}

#[test]
fn test_custom_query_refuses_trailing_statements() {
    let db = Database::open_in_memory().unwrap();
    for sql in ["SELECT 1; SELECT 2", "SELECT 1;\n/* next */ SELECT AccountID FROM Accounts"] {
        assert!(
            matches!(db.run_custom_query(sql), Err(Error::RejectedQuery(_))),
            "expected rejection: {sql}"
        );
    }
}

#[test]
fn test_custom_query_allows_trailing_semicolon_and_comment() {
    let db = Database::open_in_memory().unwrap();
    let table = db.run_custom_query("SELECT 1 AS one;  -- done\n").unwrap();
    assert_eq!(table.rows, vec![vec![Value::Integer(1)]]);
}

#[test]
fn test_custom_query_unknown_table_message_verbatim() {
    let db = Database::open_in_memory().unwrap();
    let err = db.run_custom_query("SELECT * FROM Missing").unwrap_err();
    match err {
        Error::QueryExecution(msg) => assert!(msg.contains("no such table: Missing")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_custom_query_idempotent() {
    let db = Database::open_in_memory().unwrap();
    let sql = "SELECT AccountType, SUM(Balance) FROM Accounts GROUP BY AccountType ORDER BY 1";
    assert_eq!(db.run_custom_query(sql).unwrap(), db.run_custom_query(sql).unwrap());
}

#[test]
fn test_reads_are_idempotent() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.fetch_all_accounts().unwrap(), db.fetch_all_accounts().unwrap());
    assert_eq!(
        db.fetch_account_by_id(3).unwrap(),
        db.fetch_account_by_id(3).unwrap()
    );
    let mut a = db.fetch_summary_by_type().unwrap();
    let mut b = db.fetch_summary_by_type().unwrap();
    a.sort_by(|x, y| x.account_type.as_str().cmp(y.account_type.as_str()));
    b.sort_by(|x, y| x.account_type.as_str().cmp(y.account_type.as_str()));
    assert_eq!(a, b);
}

// ── Table finder ──────────────────────────────────────────────

#[test]
fn test_list_tables() {
    let db = Database::open_in_memory().unwrap();
    let tables = db.list_tables().unwrap();
    assert_eq!(tables, vec!["Accounts".to_string()]);
}

#[test]
fn test_table_columns() {
    let db = Database::open_in_memory().unwrap();
    let cols = db.table_columns("accounts").unwrap();
    assert_eq!(
        cols,
        vec![
            "AccountID",
            "AccountNumber",
            "Balance",
            "AccountType",
            "CreatedDate",
            "LastUpdated"
        ]
    );
}

#[test]
fn test_table_columns_unknown_table() {
    let db = Database::open_in_memory().unwrap();
    let err = db.table_columns("Accounts; DROP TABLE Accounts").unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: "Table", .. }));
}
