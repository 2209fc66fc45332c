use regex::Regex;
use std::collections::HashMap;

/// Substitute `{name}` placeholders from `vars`. Placeholders without a
/// binding are left verbatim, so a template can carry tokens that a later
/// pass (or nobody) resolves.
pub fn bind(text: &str, vars: &HashMap<&str, String>) -> String {
    let re = Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap();
    re.replace_all(text, |caps: &regex::Captures| {
        vars.get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    })
    .to_string()
}

/// Top-level substitutions, applied to the raw template text before the
/// document is parsed. All three date fields carry the same canonical
/// YYYYMMDD value.
#[derive(Debug, Clone)]
pub struct HeaderBinding {
    pub bank_id: String,
    pub account_id: String,
    pub curr_date: String,
}

impl HeaderBinding {
    fn vars(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("bankId", self.bank_id.clone()),
            ("accountId", self.account_id.clone()),
            ("currDate", self.curr_date.clone()),
            ("currDateMonthStart", self.curr_date.clone()),
            ("currDateMonthEnd", self.curr_date.clone()),
        ])
    }

    pub fn apply(&self, text: &str) -> String {
        bind(text, &self.vars())
    }
}

/// Per-transaction substitutions; exactly `date` and `id` are recognized.
#[derive(Debug, Clone)]
pub struct TxnBinding {
    pub date: String,
    pub id: String,
}

impl TxnBinding {
    fn vars(&self) -> HashMap<&'static str, String> {
        HashMap::from([("date", self.date.clone()), ("id", self.id.clone())])
    }

    pub fn apply(&self, text: &str) -> String {
        bind(text, &self.vars())
    }
}
