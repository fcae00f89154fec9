use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Account category as stored in `Accounts.AccountType`.
///
/// The column is free text, so anything outside the well-known set is kept
/// verbatim in `Other` rather than coerced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountType {
    Checking,
    Savings,
    Investment,
    Retirement,
    Other(String),
}

impl AccountType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Checking => "Checking",
            Self::Savings => "Savings",
            Self::Investment => "Investment",
            Self::Retirement => "Retirement",
            Self::Other(s) => s,
        }
    }

    /// Exact match against the stored text, mirroring SQL `GROUP BY` semantics.
    pub fn parse(s: &str) -> Self {
        match s {
            "Checking" => Self::Checking,
            "Savings" => Self::Savings,
            "Investment" => Self::Investment,
            "Retirement" => Self::Retirement,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub number: String,
    pub balance: Decimal,
    pub account_type: AccountType,
    pub created: NaiveDateTime,
    pub last_updated: NaiveDateTime,
}

impl Account {
    pub fn is_peer_of(&self, other: &Account) -> bool {
        self.account_type == other.account_type
    }
}

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a stored timestamp. SQLite's `CURRENT_TIMESTAMP` writes
/// `YYYY-MM-DD HH:MM:SS`; ISO-8601 with a `T` separator and fractional
/// seconds is accepted too.
pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}
