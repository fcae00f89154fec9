use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{parse_timestamp, Account};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AccountField {
    Id,
    Number,
    Balance,
    Type,
    Created,
    LastUpdated,
}

impl AccountField {
    pub(crate) fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accountid" | "id" => Ok(Self::Id),
            "accountnumber" | "number" => Ok(Self::Number),
            "balance" => Ok(Self::Balance),
            "accounttype" | "type" => Ok(Self::Type),
            "createddate" | "created" => Ok(Self::Created),
            "lastupdated" | "updated" => Ok(Self::LastUpdated),
            other => Err(Error::invalid_filter(format!("unknown field '{other}'"))),
        }
    }

    pub(crate) fn column(&self) -> &'static str {
        match self {
            Self::Id => "AccountID",
            Self::Number => "AccountNumber",
            Self::Balance => "Balance",
            Self::Type => "AccountType",
            Self::Created => "CreatedDate",
            Self::LastUpdated => "LastUpdated",
        }
    }

    fn key(&self, account: &Account) -> Key {
        match self {
            Self::Id => Key::Int(account.id),
            Self::Number => Key::Text(account.number.clone()),
            Self::Balance => Key::Money(account.balance),
            Self::Type => Key::Text(account.account_type.as_str().to_string()),
            Self::Created => Key::Time(account.created),
            Self::LastUpdated => Key::Time(account.last_updated),
        }
    }

    fn operand(&self, raw: &str) -> Result<Key> {
        let raw = raw.trim();
        let bad = || {
            Error::invalid_filter(format!(
                "'{raw}' is not a valid value for {}",
                self.column()
            ))
        };
        match self {
            Self::Id => raw.parse().map(Key::Int).map_err(|_| bad()),
            Self::Number | Self::Type => Ok(Key::Text(raw.to_string())),
            Self::Balance => {
                let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
                Decimal::from_str(&cleaned).map(Key::Money).map_err(|_| bad())
            }
            Self::Created | Self::LastUpdated => parse_timestamp(raw)
                .or_else(|| {
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
                .map(Key::Time)
                .ok_or_else(bad),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterOp {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Range,
}

impl FilterOp {
    pub(crate) fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equals" | "eq" | "=" | "==" => Ok(Self::Equals),
            "not-equals" | "ne" | "!=" | "<>" => Ok(Self::NotEquals),
            "greater-than" | "gt" | ">" => Ok(Self::GreaterThan),
            "less-than" | "lt" | "<" => Ok(Self::LessThan),
            "range" | "between" => Ok(Self::Range),
            other => Err(Error::invalid_filter(format!("unknown operator '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilterValue {
    Single(String),
    /// Inclusive lower and upper bound.
    Range(String, String),
}

/// A declarative `(field, operator, value)` filter as the user wrote it.
/// Field and operator are only validated when the filter is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilterSpec {
    pub(crate) field: String,
    pub(crate) operator: String,
    pub(crate) value: FilterValue,
}

impl FilterSpec {
    pub(crate) fn new(field: &str, operator: &str, value: &str) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: FilterValue::Single(value.into()),
        }
    }

    pub(crate) fn range(field: &str, low: &str, high: &str) -> Self {
        Self {
            field: field.into(),
            operator: "range".into(),
            value: FilterValue::Range(low.into(), high.into()),
        }
    }

    /// Parse `<field> <op> <value> [<upper>]`, e.g. `Balance range 1000 10000`
    /// or `AccountType = Savings`. Values may be double-quoted.
    pub(crate) fn parse(input: &str) -> Result<Self> {
        let tokens = tokenize(input);
        match tokens.as_slice() {
            [field, op, value] => Ok(Self::new(field, op, value)),
            [field, op, low, high] => Ok(Self {
                field: field.clone(),
                operator: op.clone(),
                value: FilterValue::Range(low.clone(), high.clone()),
            }),
            _ => Err(Error::invalid_filter(
                "expected <field> <op> <value> [<upper>]",
            )),
        }
    }
}

impl std::fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            FilterValue::Single(v) => write!(f, "{} {} {}", self.field, self.operator, v),
            FilterValue::Range(lo, hi) => {
                write!(f, "{} {} [{}, {}]", self.field, self.operator, lo, hi)
            }
        }
    }
}

fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in input.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[derive(Debug, Clone, PartialEq)]
enum Key {
    Int(i64),
    Money(Decimal),
    Text(String),
    Time(NaiveDateTime),
}

impl Key {
    fn compare(&self, other: &Key) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Money(a), Self::Money(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

enum Predicate {
    Compare(FilterOp, Key),
    Between(Key, Key),
}

struct CompiledFilter {
    field: AccountField,
    predicate: Predicate,
}

impl CompiledFilter {
    fn new(spec: &FilterSpec) -> Result<Self> {
        let op = FilterOp::parse(&spec.operator)?;
        let field = AccountField::parse(&spec.field)?;

        let predicate = match (op, &spec.value) {
            (FilterOp::Range, FilterValue::Range(lo, hi)) => {
                let (lo, hi) = (field.operand(lo)?, field.operand(hi)?);
                if lo.compare(&hi) == Some(Ordering::Greater) {
                    return Err(Error::invalid_filter(
                        "range lower bound is greater than upper bound",
                    ));
                }
                Predicate::Between(lo, hi)
            }
            (FilterOp::Range, FilterValue::Single(_)) => {
                return Err(Error::invalid_filter("range needs a lower and upper bound"))
            }
            (op, FilterValue::Single(v)) => Predicate::Compare(op, field.operand(v)?),
            (_, FilterValue::Range(..)) => {
                return Err(Error::invalid_filter(format!(
                    "operator '{}' takes a single value",
                    spec.operator
                )))
            }
        };

        Ok(Self { field, predicate })
    }

    fn matches(&self, account: &Account) -> bool {
        let key = self.field.key(account);
        match &self.predicate {
            Predicate::Compare(op, operand) => {
                let ord = key.compare(operand);
                match op {
                    FilterOp::Equals => ord == Some(Ordering::Equal),
                    FilterOp::NotEquals => ord != Some(Ordering::Equal),
                    FilterOp::GreaterThan => ord == Some(Ordering::Greater),
                    FilterOp::LessThan => ord == Some(Ordering::Less),
                    FilterOp::Range => false,
                }
            }
            Predicate::Between(lo, hi) => {
                key.compare(lo).is_some_and(|o| o != Ordering::Less)
                    && key.compare(hi).is_some_and(|o| o != Ordering::Greater)
            }
        }
    }
}

/// Keep the accounts matching `spec`, preserving input order.
///
/// The spec is validated up front, so an unknown operator fails even on an
/// empty input.
pub(crate) fn filter_accounts(accounts: &[Account], spec: &FilterSpec) -> Result<Vec<Account>> {
    let filter = CompiledFilter::new(spec)?;
    Ok(accounts
        .iter()
        .filter(|a| filter.matches(a))
        .cloned()
        .collect())
}
