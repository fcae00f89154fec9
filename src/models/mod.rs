mod account;
mod summary;
mod table;

pub use account::{Account, AccountType};
pub(crate) use account::{parse_timestamp, TIMESTAMP_FORMAT};
pub use summary::AccountTypeSummary;
pub use table::{Table, Value};
