use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Parse Brazilian-locale currency text ("R$ 1.234,56") into a decimal.
/// Strips the currency symbol and thousands periods before swapping the
/// decimal comma, so "1.234,56" and "1234,56" read the same.
pub fn parse_brl_decimal(s: &str) -> Result<Decimal, MoneyError> {
    let cleaned: String = s
        .replace("R$", "")
        .replace('.', "")
        .replace(',', ".")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    Decimal::from_str(&cleaned).map_err(|_| MoneyError::InvalidAmount(s.to_string()))
}

/// Running-balance variant: blank input means zero, not an error.
pub fn parse_brl_balance(s: &str) -> Result<Decimal, MoneyError> {
    if s.trim().is_empty() {
        return Ok(Decimal::ZERO);
    }
    parse_brl_decimal(s)
}
