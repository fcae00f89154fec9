//! In-memory metrics over fetched accounts. Nothing here touches the database.

mod filter;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::{Account, AccountType};

pub(crate) use filter::{filter_accounts, FilterSpec};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OverviewMetrics {
    pub(crate) total_accounts: usize,
    pub(crate) total_balance: Decimal,
    pub(crate) average_balance: Decimal,
    /// Account count per type, in first-seen order.
    pub(crate) count_by_type: Vec<(AccountType, usize)>,
}

impl Default for OverviewMetrics {
    fn default() -> Self {
        Self {
            total_accounts: 0,
            total_balance: Decimal::ZERO,
            average_balance: Decimal::ZERO,
            count_by_type: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TypeBreakdown {
    pub(crate) account_type: AccountType,
    pub(crate) count: usize,
    pub(crate) total_balance: Decimal,
}

/// Five-number summary of balances, for a box plot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BalanceDistribution {
    pub(crate) min: Decimal,
    pub(crate) q1: Decimal,
    pub(crate) median: Decimal,
    pub(crate) q3: Decimal,
    pub(crate) max: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BalanceComparison {
    pub(crate) balance: Decimal,
    pub(crate) type_average: Decimal,
    pub(crate) overall_average: Decimal,
    pub(crate) percentile: f64,
}

pub(crate) fn compute_overview_metrics(accounts: &[Account]) -> OverviewMetrics {
    let total_balance: Decimal = accounts.iter().map(|a| a.balance).sum();
    let count_by_type = type_breakdown(accounts)
        .into_iter()
        .map(|b| (b.account_type, b.count))
        .collect();

    OverviewMetrics {
        total_accounts: accounts.len(),
        total_balance,
        average_balance: average(total_balance, accounts.len()),
        count_by_type,
    }
}

/// Fraction of `peer_group` with a strictly lower balance than `account`.
///
/// Ties never count as lower, so the unique minimum of a group sits at 0.0.
pub(crate) fn compute_account_percentile(account: &Account, peer_group: &[Account]) -> f64 {
    if peer_group.is_empty() {
        return 0.0;
    }
    let lower = peer_group
        .iter()
        .filter(|p| p.balance < account.balance)
        .count();
    lower as f64 / peer_group.len() as f64
}

/// Accounts sharing `account`'s type, the account itself included.
pub(crate) fn peer_group(account: &Account, accounts: &[Account]) -> Vec<Account> {
    accounts
        .iter()
        .filter(|a| a.is_peer_of(account))
        .cloned()
        .collect()
}

/// Count and total balance per type, in first-seen order.
pub(crate) fn type_breakdown(accounts: &[Account]) -> Vec<TypeBreakdown> {
    let mut out: Vec<TypeBreakdown> = Vec::new();
    for account in accounts {
        match out
            .iter_mut()
            .find(|b| b.account_type == account.account_type)
        {
            Some(entry) => {
                entry.count += 1;
                entry.total_balance += account.balance;
            }
            None => out.push(TypeBreakdown {
                account_type: account.account_type.clone(),
                count: 1,
                total_balance: account.balance,
            }),
        }
    }
    out
}

/// The `n` highest balances. Equal balances keep their input order.
pub(crate) fn top_by_balance(accounts: &[Account], n: usize) -> Vec<Account> {
    let mut sorted = accounts.to_vec();
    sorted.sort_by(|a, b| b.balance.cmp(&a.balance));
    sorted.truncate(n);
    sorted
}

pub(crate) fn balance_distribution(accounts: &[Account]) -> Option<BalanceDistribution> {
    let mut balances: Vec<Decimal> = accounts.iter().map(|a| a.balance).collect();
    balances.sort();
    let (min, max) = (*balances.first()?, *balances.last()?);
    Some(BalanceDistribution {
        min,
        q1: quantile(&balances, Decimal::new(25, 2)),
        median: quantile(&balances, Decimal::new(50, 2)),
        q3: quantile(&balances, Decimal::new(75, 2)),
        max,
    })
}

/// This account against its type's average and the overall average.
pub(crate) fn balance_comparison(account: &Account, accounts: &[Account]) -> BalanceComparison {
    let peers = peer_group(account, accounts);
    let peer_total: Decimal = peers.iter().map(|a| a.balance).sum();
    let overall_total: Decimal = accounts.iter().map(|a| a.balance).sum();

    BalanceComparison {
        balance: account.balance,
        type_average: average(peer_total, peers.len()),
        overall_average: average(overall_total, accounts.len()),
        percentile: compute_account_percentile(account, &peers),
    }
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

/// Linearly interpolated quantile of a sorted, non-empty slice.
fn quantile(sorted: &[Decimal], p: Decimal) -> Decimal {
    let pos = p * Decimal::from(sorted.len() - 1);
    let lo = pos.floor();
    let idx = lo.to_usize().unwrap_or(0);
    let frac = pos - lo;
    match sorted.get(idx + 1) {
        Some(next) if !frac.is_zero() => sorted[idx] + (*next - sorted[idx]) * frac,
        _ => sorted[idx],
    }
}

#[cfg(test)]
mod tests;
