use csv2ofx_core::date::{normalize_date, DateError, DatePolicy};
use csv2ofx_core::transaction::{normalize_amount, truncate_memo, TrnType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rows::RawRow;

/// Raw-row/output field names, fixed by the OFX transaction vocabulary.
pub const FIELD_MEMO: &str = "MEMO";
pub const FIELD_POSTED: &str = "DTPOSTED";
pub const FIELD_AMOUNT: &str = "TRNAMT";
pub const FIELD_TYPE: &str = "TRNTYPE";

/// Output shape of one transaction. Its field names double as the
/// whitelist applied to raw rows, and its field order is preserved all
/// the way into the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnTemplate(pub Map<String, Value>);

impl TxnTemplate {
    fn whitelisted<'a>(&self, row: &'a RawRow, column: &str) -> &'a str {
        if self.0.contains_key(column) {
            row.get(column)
        } else {
            ""
        }
    }
}

/// A normalized transaction awaiting its sequence id: template-shaped
/// ordered fields plus the normalized posting date the sequencer keys on.
/// Every field value is plain text, safe for direct substitution.
#[derive(Debug, Clone)]
pub struct PendingTxn {
    pub date: String,
    pub fields: Vec<(String, String)>,
}

/// Turn one raw row into a template-shaped transaction: whitelist the raw
/// fields, normalize the posting date, classify the amount, cap the memo.
/// Template values (typically `{date}`/`{id}` placeholders) pass through
/// untouched for the later binding step.
pub fn normalize_row(
    row: &RawRow,
    template: &TxnTemplate,
    date_format: &str,
    policy: DatePolicy,
) -> Result<PendingTxn, DateError> {
    let date = normalize_date(template.whitelisted(row, FIELD_POSTED), date_format, policy)?;
    let amount = normalize_amount(template.whitelisted(row, FIELD_AMOUNT));
    let trn_type = TrnType::classify(&amount).to_string();
    let memo = truncate_memo(template.whitelisted(row, FIELD_MEMO));

    let mut fields = Vec::with_capacity(template.0.len());
    for (name, value) in template.0.iter() {
        let text = match name.as_str() {
            FIELD_AMOUNT => amount.clone(),
            FIELD_TYPE => trn_type.clone(),
            FIELD_MEMO => memo.clone(),
            _ => match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        };
        fields.push((name.clone(), text));
    }

    // The required trio exists even when the template omits it.
    let mut ensure = |name: &str, text: &str| {
        if !template.0.contains_key(name) {
            fields.push((name.to_string(), text.to_string()));
        }
    };
    ensure(FIELD_AMOUNT, &amount);
    ensure(FIELD_TYPE, &trn_type);
    ensure(FIELD_MEMO, &memo);

    Ok(PendingTxn { date, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> TxnTemplate {
        let Value::Object(map) = json!({
            "TRNTYPE": "",
            "DTPOSTED": "{date}",
            "TRNAMT": "",
            "FITID": "{date}{id}",
            "MEMO": "",
        }) else {
            unreachable!()
        };
        TxnTemplate(map)
    }

    fn row() -> RawRow {
        RawRow::from_pairs(&[
            ("MEMO", "coffee"),
            ("DTPOSTED", "1/2/24"),
            ("HOUR", "10:00"),
            ("TRNAMT", "-12,50"),
            ("BALAMT", "100,00"),
            ("CARDTYPE", "VISA"),
        ])
    }

    fn field<'a>(txn: &'a PendingTxn, name: &str) -> Option<&'a str> {
        txn.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn fields_outside_template_are_discarded() {
        let txn = normalize_row(&row(), &template(), "M/D/YY", DatePolicy::Lenient).unwrap();
        assert!(field(&txn, "CARDTYPE").is_none());
        assert!(field(&txn, "HOUR").is_none());
        assert!(field(&txn, "BALAMT").is_none());
    }

    #[test]
    fn date_is_normalized_to_eight_digits() {
        let txn = normalize_row(&row(), &template(), "M/D/YY", DatePolicy::Lenient).unwrap();
        assert_eq!(txn.date, "20240102");
        // DTPOSTED keeps its placeholder until the binding step.
        assert_eq!(field(&txn, "DTPOSTED"), Some("{date}"));
    }

    #[test]
    fn debit_row_is_classified_and_amount_dotted() {
        let txn = normalize_row(&row(), &template(), "M/D/YY", DatePolicy::Lenient).unwrap();
        assert_eq!(field(&txn, "TRNAMT"), Some("-12.50"));
        assert_eq!(field(&txn, "TRNTYPE"), Some("DEBIT"));
    }

    #[test]
    fn credit_row_is_classified() {
        let deposit = RawRow::from_pairs(&[
            ("MEMO", "salary"),
            ("DTPOSTED", "1/3/24"),
            ("TRNAMT", "2500,00"),
        ]);
        let txn = normalize_row(&deposit, &template(), "M/D/YY", DatePolicy::Lenient).unwrap();
        assert_eq!(field(&txn, "TRNAMT"), Some("2500.00"));
        assert_eq!(field(&txn, "TRNTYPE"), Some("CREDIT"));
    }

    #[test]
    fn long_memo_is_capped() {
        let verbose = RawRow::from_pairs(&[
            ("MEMO", "grocery store long merchant name"),
            ("DTPOSTED", "1/2/24"),
            ("TRNAMT", "-5,00"),
        ]);
        let txn = normalize_row(&verbose, &template(), "M/D/YY", DatePolicy::Lenient).unwrap();
        assert_eq!(field(&txn, "MEMO"), Some("grocery store long merch"));
    }

    #[test]
    fn field_order_follows_template() {
        let txn = normalize_row(&row(), &template(), "M/D/YY", DatePolicy::Lenient).unwrap();
        let names: Vec<&str> = txn.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["TRNTYPE", "DTPOSTED", "TRNAMT", "FITID", "MEMO"]);
    }

    #[test]
    fn bad_date_lenient_uses_sentinel() {
        let smudged = RawRow::from_pairs(&[("DTPOSTED", "soon"), ("TRNAMT", "-1,00"), ("MEMO", "x")]);
        let txn = normalize_row(&smudged, &template(), "M/D/YY", DatePolicy::Lenient).unwrap();
        assert_eq!(txn.date, "00000000");
    }

    #[test]
    fn bad_date_strict_fails_the_row() {
        let smudged = RawRow::from_pairs(&[("DTPOSTED", "soon"), ("TRNAMT", "-1,00"), ("MEMO", "x")]);
        assert!(normalize_row(&smudged, &template(), "M/D/YY", DatePolicy::Strict).is_err());
    }

    #[test]
    fn sparse_template_still_gets_required_fields() {
        let Value::Object(map) = json!({ "FITID": "{date}{id}" }) else {
            unreachable!()
        };
        let txn = normalize_row(&row(), &TxnTemplate(map), "M/D/YY", DatePolicy::Lenient).unwrap();
        let names: Vec<&str> = txn.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["FITID", "TRNAMT", "TRNTYPE", "MEMO"]);
        // The posting date was not whitelisted, so it reads as unparseable.
        assert_eq!(txn.date, "00000000");
        // TRNAMT was not whitelisted either: empty amount, debit by default.
        assert_eq!(field(&txn, "TRNAMT"), Some(""));
        assert_eq!(field(&txn, "TRNTYPE"), Some("DEBIT"));
    }
}
