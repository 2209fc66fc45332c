use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum memo length carried into the output document.
pub const MEMO_SIZE: usize = 24;

/// Transaction direction, derived from the amount's sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrnType {
    Credit,
    Debit,
}

impl fmt::Display for TrnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrnType::Credit => write!(f, "CREDIT"),
            TrnType::Debit => write!(f, "DEBIT"),
        }
    }
}

impl TrnType {
    /// Strictly positive amounts are credits; zero, negative, and
    /// unparseable amounts all classify as debits.
    pub fn classify(amount: &str) -> TrnType {
        match Decimal::from_str(amount.trim()) {
            Ok(value) if value > Decimal::ZERO => TrnType::Credit,
            _ => TrnType::Debit,
        }
    }
}

/// Swap the first decimal comma for a point ("-12,50" → "-12.50").
pub fn normalize_amount(raw: &str) -> String {
    raw.replacen(',', ".", 1)
}

/// Cap memo text at MEMO_SIZE characters; shorter text is untouched.
pub fn truncate_memo(memo: &str) -> String {
    memo.chars().take(MEMO_SIZE).collect()
}
