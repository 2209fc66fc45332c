pub mod date;
pub mod money;
pub mod transaction;

pub use date::{normalize_date, DateError, DatePolicy};
pub use money::{parse_brl_balance, parse_brl_decimal, MoneyError};
pub use transaction::{normalize_amount, truncate_memo, TrnType, MEMO_SIZE};
