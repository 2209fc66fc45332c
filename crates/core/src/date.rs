use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every posted date in the output document uses this fixed 8-digit form.
pub const OFX_DATE_FORMAT: &str = "%Y%m%d";

/// Stand-in emitted for unparseable dates under the lenient policy.
pub const INVALID_DATE: &str = "00000000";

#[derive(Error, Debug, PartialEq)]
pub enum DateError {
    #[error("Invalid date '{value}' for format '{format}'")]
    InvalidDate { value: String, format: String },
}

/// What to do with a row whose posting date does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Emit the `00000000` sentinel inline and keep going.
    #[default]
    Lenient,
    /// Fail the whole batch before any output is produced.
    Strict,
}

/// Translate moment.js-style date tokens (the format language the settings
/// document uses, e.g. "M/D/YY") into chrono specifiers. Longest tokens
/// first, so "YYYY" is not eaten as two "YY".
fn chrono_format(moment_format: &str) -> String {
    let mut out = String::with_capacity(moment_format.len() + 4);
    let mut rest = moment_format;
    while let Some(c) = rest.chars().next() {
        let (spec, eaten) = if rest.starts_with("YYYY") {
            ("%Y", 4)
        } else if rest.starts_with("YY") {
            ("%y", 2)
        } else if rest.starts_with("MM") {
            ("%m", 2)
        } else if rest.starts_with('M') {
            ("%m", 1)
        } else if rest.starts_with("DD") {
            ("%d", 2)
        } else if rest.starts_with('D') {
            ("%d", 1)
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
            continue;
        };
        out.push_str(spec);
        rest = &rest[eaten..];
    }
    out
}

/// Parse a row's posting date with the configured input format and
/// reformat it as YYYYMMDD.
pub fn normalize_date(
    value: &str,
    moment_format: &str,
    policy: DatePolicy,
) -> Result<String, DateError> {
    let format = chrono_format(moment_format);
    match NaiveDate::parse_from_str(value.trim(), &format) {
        Ok(date) => Ok(to_ofx_date(date)),
        Err(_) => match policy {
            DatePolicy::Lenient => Ok(INVALID_DATE.to_string()),
            DatePolicy::Strict => Err(DateError::InvalidDate {
                value: value.to_string(),
                format: moment_format.to_string(),
            }),
        },
    }
}

pub fn to_ofx_date(date: NaiveDate) -> String {
    date.format(OFX_DATE_FORMAT).to_string()
}

/// Binding dates arrive as ISO ("2024-01-02") or already-compact YYYYMMDD.
pub fn parse_binding_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, OFX_DATE_FORMAT))
        .ok()
}
