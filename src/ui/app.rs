use log::warn;
use rust_decimal::Decimal;

use crate::analytics::{
    self, filter_accounts, BalanceComparison, BalanceDistribution, FilterSpec, OverviewMetrics,
    TypeBreakdown,
};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::*;
use crate::ui::util::{scroll_down, scroll_up};

const TOP_ACCOUNTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Details,
    Explorer,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Details, Self::Explorer]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Details => write!(f, "Account Details"),
            Self::Explorer => write!(f, "Data Explorer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
        }
    }
}

/// What the Data Explorer table is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExplorerView {
    Accounts,
    Query,
    Tables,
}

impl ExplorerView {
    pub(crate) fn next(self) -> Self {
        match self {
            Self::Accounts => Self::Query,
            Self::Query => Self::Tables,
            Self::Tables => Self::Accounts,
        }
    }
}

impl std::fmt::Display for ExplorerView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accounts => write!(f, "Accounts"),
            Self::Query => write!(f, "Query"),
            Self::Tables => write!(f, "Tables"),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) status_is_error: bool,
    pub(crate) show_help: bool,
    pub(crate) database_label: String,

    pub(crate) accounts: Vec<Account>,
    /// False when the `Accounts` table could not be read.
    pub(crate) accounts_available: bool,

    // Dashboard
    pub(crate) overview: OverviewMetrics,
    pub(crate) breakdown: Vec<TypeBreakdown>,
    pub(crate) summaries: Vec<AccountTypeSummary>,
    pub(crate) distribution: Option<BalanceDistribution>,
    pub(crate) top_accounts: Vec<Account>,

    // Account Details
    pub(crate) account_numbers: Vec<String>,
    pub(crate) details_index: usize,
    pub(crate) details_scroll: usize,
    pub(crate) selected_account: Option<Account>,
    pub(crate) comparison: Option<BalanceComparison>,

    // Data Explorer
    pub(crate) explorer_view: ExplorerView,
    pub(crate) type_filter: Option<AccountType>,
    pub(crate) balance_range: Option<(Decimal, Decimal)>,
    pub(crate) custom_filter: Option<FilterSpec>,
    pub(crate) filtered: Vec<Account>,
    pub(crate) query_result: Option<Table>,
    pub(crate) last_query: String,
    pub(crate) tables: Vec<(String, Vec<String>)>,
    pub(crate) explorer_index: usize,
    pub(crate) explorer_scroll: usize,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(database_label: impl Into<String>) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            status_is_error: false,
            show_help: false,
            database_label: database_label.into(),

            accounts: Vec::new(),
            accounts_available: false,

            overview: OverviewMetrics::default(),
            breakdown: Vec::new(),
            summaries: Vec::new(),
            distribution: None,
            top_accounts: Vec::new(),

            account_numbers: Vec::new(),
            details_index: 0,
            details_scroll: 0,
            selected_account: None,
            comparison: None,

            explorer_view: ExplorerView::Accounts,
            type_filter: None,
            balance_range: None,
            custom_filter: None,
            filtered: Vec::new(),
            query_result: None,
            last_query: String::new(),
            tables: Vec::new(),
            explorer_index: 0,
            explorer_scroll: 0,

            visible_rows: 20,
        }
    }

    /// Reload everything. Failures land in the status bar; a missing or
    /// unreadable `Accounts` table sends the user to the table finder.
    pub(crate) fn refresh_all(&mut self, db: &Database) {
        match self.load_accounts(db) {
            Ok(()) => {
                self.accounts_available = true;
                if let Err(e) = self.apply_filters() {
                    self.set_error(e.to_string());
                }
                self.select_account(db);
            }
            Err(e) => {
                warn!("accounts unavailable: {e}");
                self.accounts_available = false;
                self.clear_account_data();
                self.set_error(format!("{e}. Showing available tables."));
                self.refresh_tables(db);
                self.screen = Screen::Explorer;
                self.explorer_view = ExplorerView::Tables;
            }
        }
    }

    fn load_accounts(&mut self, db: &Database) -> Result<()> {
        db.check_connection()?;
        let accounts = db.fetch_all_accounts()?;
        self.summaries = db.fetch_summary_by_type()?;
        self.summaries.sort_by(|a, b| b.total_balance.cmp(&a.total_balance));
        self.top_accounts = db.fetch_top_accounts(TOP_ACCOUNTS)?;
        self.account_numbers = db.fetch_account_numbers()?;

        self.overview = analytics::compute_overview_metrics(&accounts);
        self.breakdown = analytics::type_breakdown(&accounts);
        self.distribution = analytics::balance_distribution(&accounts);
        self.accounts = accounts;

        if self.details_index >= self.account_numbers.len() {
            self.details_index = self.account_numbers.len().saturating_sub(1);
        }
        Ok(())
    }

    fn clear_account_data(&mut self) {
        self.accounts.clear();
        self.filtered.clear();
        self.account_numbers.clear();
        self.overview = OverviewMetrics::default();
        self.breakdown.clear();
        self.summaries.clear();
        self.distribution = None;
        self.top_accounts.clear();
        self.selected_account = None;
        self.comparison = None;
    }

    /// Table names with their columns, for the explorer's table finder.
    pub(crate) fn refresh_tables(&mut self, db: &Database) {
        let loaded = db.list_tables().and_then(|names| {
            names
                .into_iter()
                .map(|name| db.table_columns(&name).map(|cols| (name, cols)))
                .collect::<Result<Vec<_>>>()
        });
        match loaded {
            Ok(tables) => self.tables = tables,
            Err(e) => self.set_error(format!("Could not list tables: {e}")),
        }
    }

    /// Load the account under the details cursor and compare it to its peers.
    pub(crate) fn select_account(&mut self, db: &Database) {
        let Some(number) = self.account_numbers.get(self.details_index) else {
            self.selected_account = None;
            self.comparison = None;
            return;
        };
        match db.fetch_account_by_number(number) {
            Ok(account) => {
                self.comparison = Some(analytics::balance_comparison(&account, &self.accounts));
                self.selected_account = Some(account);
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Move the details cursor to `number` (case-insensitive) and load it.
    pub(crate) fn select_account_number(&mut self, db: &Database, number: &str) -> Result<()> {
        let index = self
            .account_numbers
            .iter()
            .position(|n| n.eq_ignore_ascii_case(number.trim()))
            .ok_or_else(|| Error::account_not_found(number.trim()))?;
        self.details_index = index;
        let page = self.details_page();
        if index < self.details_scroll || index >= self.details_scroll + page {
            self.details_scroll = index.saturating_sub(page / 2);
        }
        self.select_account(db);
        Ok(())
    }

    /// Recompute the explorer's account list from the active filters.
    pub(crate) fn apply_filters(&mut self) -> Result<()> {
        let mut rows = self.accounts.clone();
        if let Some(account_type) = &self.type_filter {
            let spec = FilterSpec::new("AccountType", "equals", account_type.as_str());
            rows = filter_accounts(&rows, &spec)?;
        }
        if let Some((low, high)) = self.balance_range {
            let spec = FilterSpec::range("Balance", &low.to_string(), &high.to_string());
            rows = filter_accounts(&rows, &spec)?;
        }
        if let Some(spec) = &self.custom_filter {
            rows = filter_accounts(&rows, spec)?;
        }
        self.filtered = rows;
        self.explorer_index = 0;
        self.explorer_scroll = 0;
        Ok(())
    }

    /// Change the filters with `update`; on a bad filter the previous ones
    /// are restored and the error returned.
    pub(crate) fn update_filters(&mut self, update: impl FnOnce(&mut Self)) -> Result<()> {
        let previous = (
            self.type_filter.clone(),
            self.balance_range,
            self.custom_filter.clone(),
        );
        update(self);
        if let Err(e) = self.apply_filters() {
            (self.type_filter, self.balance_range, self.custom_filter) = previous;
            self.apply_filters()?;
            return Err(e);
        }
        Ok(())
    }

    /// `AccountNumber` of the highlighted query row, if the result has one.
    pub(crate) fn query_account_number(&self) -> Option<String> {
        let record = self.query_result.as_ref()?.record(self.explorer_index)?;
        match record.get("AccountNumber")? {
            Value::Text(number) => Some(number.clone()),
            _ => None,
        }
    }

    pub(crate) fn has_filters(&self) -> bool {
        self.type_filter.is_some() || self.balance_range.is_some() || self.custom_filter.is_some()
    }

    /// Step the type filter through all, then each type present, then back.
    pub(crate) fn cycle_type_filter(&mut self) -> Result<()> {
        let types: Vec<AccountType> = self.breakdown.iter().map(|b| b.account_type.clone()).collect();
        let next = match &self.type_filter {
            None => types.first().cloned(),
            Some(current) => types
                .iter()
                .position(|t| t == current)
                .and_then(|i| types.get(i + 1).cloned()),
        };
        self.update_filters(|app| app.type_filter = next)
    }

    pub(crate) fn explorer_len(&self) -> usize {
        match self.explorer_view {
            ExplorerView::Accounts => self.filtered.len(),
            ExplorerView::Query => self.query_result.as_ref().map_or(0, Table::len),
            ExplorerView::Tables => self.tables.len(),
        }
    }

    pub(crate) fn details_page(&self) -> usize {
        self.visible_rows.saturating_sub(2).max(1)
    }

    pub(crate) fn explorer_page(&self) -> usize {
        // Filter line plus table header and borders
        self.visible_rows.saturating_sub(4).max(1)
    }

    pub(crate) fn move_down(&mut self, db: &Database) {
        match self.screen {
            Screen::Details => {
                let page = self.details_page();
                let before = self.details_index;
                scroll_down(
                    &mut self.details_index,
                    &mut self.details_scroll,
                    self.account_numbers.len(),
                    page,
                );
                if self.details_index != before {
                    self.select_account(db);
                }
            }
            Screen::Explorer => {
                let page = self.explorer_page();
                let len = self.explorer_len();
                scroll_down(&mut self.explorer_index, &mut self.explorer_scroll, len, page);
            }
            Screen::Dashboard => {}
        }
    }

    pub(crate) fn move_up(&mut self, db: &Database) {
        match self.screen {
            Screen::Details => {
                let before = self.details_index;
                scroll_up(&mut self.details_index, &mut self.details_scroll);
                if self.details_index != before {
                    self.select_account(db);
                }
            }
            Screen::Explorer => scroll_up(&mut self.explorer_index, &mut self.explorer_scroll),
            Screen::Dashboard => {}
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_is_error = false;
    }

    pub(crate) fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_is_error = true;
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
