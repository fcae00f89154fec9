/// Table and view definitions, shared with whatever seeds the database.
pub(crate) const SCHEMA: &str = include_str!("../../sql/schema.sql");

/// The ten-row sample dataset.
pub(crate) const SEED: &str = include_str!("../../sql/seed.sql");

/// Column list for every typed `Accounts` read. `Balance` carries NUMERIC
/// affinity, so fractional values are stored as doubles. SQLite renders
/// those with 15 significant digits, which the schema's range check keeps
/// exact on the way into `Decimal`.
pub(crate) const ACCOUNT_COLUMNS: &str =
    "AccountID, AccountNumber, CAST(Balance AS TEXT), AccountType, CreatedDate, LastUpdated";

pub(crate) const SUMMARY_COLUMNS: &str = "AccountType, AccountCount,
    CAST(TotalBalance AS TEXT), CAST(AverageBalance AS TEXT),
    CAST(MinBalance AS TEXT), CAST(MaxBalance AS TEXT)";
