use rust_decimal::Decimal;

use super::AccountType;

/// One row of the `AccountSummary` view.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountTypeSummary {
    pub account_type: AccountType,
    pub count: i64,
    pub total_balance: Decimal,
    pub average_balance: Decimal,
    pub min_balance: Decimal,
    pub max_balance: Decimal,
}
