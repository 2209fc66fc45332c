use std::io::Read;

use csv2ofx_core::date::{DateError, DatePolicy};
use csv2ofx_core::money::{parse_brl_balance, MoneyError};
use thiserror::Error;

use crate::normalize::{normalize_row, PendingTxn, TxnTemplate};
use crate::ofx::{self, Element, OfxDocument, OfxError};
use crate::rows::{read_rows, CsvError, CsvProfile};
use crate::sequence::DaySequencer;
use crate::template::{HeaderBinding, TxnBinding};

/// Raw-row column the running balance is read from. It is read before the
/// whitelist, so it does not have to appear in the transaction template.
pub const FIELD_BALANCE: &str = "BALAMT";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] CsvError),
    #[error(transparent)]
    Ofx(#[from] OfxError),
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("Bad running balance: {0}")]
    Balance(#[from] MoneyError),
}

/// Everything the transform pipeline needs, already resolved: CSV dialect,
/// date handling, the transaction shape, and the top-level binding.
#[derive(Debug, Clone)]
pub struct StatementConfig {
    pub profile: CsvProfile,
    pub date_format: String,
    pub date_policy: DatePolicy,
    pub txn_template: TxnTemplate,
    pub binding: HeaderBinding,
}

/// Run the whole conversion: bind the template text, parse it, stream the
/// CSV rows through normalization and sequencing, resolve the final
/// balance, splice both into the document, serialize.
///
/// Rows are processed strictly in input order (the sequencer depends on
/// it), and nothing is produced unless every stage succeeds.
pub fn export_statement<R: Read>(
    config: &StatementConfig,
    template_text: &str,
    source: R,
) -> Result<String, ExportError> {
    // Top-level substitutions happen on the raw text, before parsing.
    let bound = config.binding.apply(template_text);
    let mut document = ofx::parse(&bound)?;

    let rows = read_rows(source, &config.profile)?;

    let mut sequencer = DaySequencer::new();
    let mut transactions = Vec::with_capacity(rows.len());
    let mut balance_raw = String::new();

    for row in &rows {
        // Only the last row's balance survives.
        balance_raw = row.get(FIELD_BALANCE).to_string();

        let pending = normalize_row(
            row,
            &config.txn_template,
            &config.date_format,
            config.date_policy,
        )?;
        let binding = TxnBinding {
            id: sequencer.assign(&pending.date),
            date: pending.date.clone(),
        };
        transactions.push(bind_txn(&pending, &binding));
    }

    let balance = parse_brl_balance(&balance_raw)?;

    assemble(&mut document, transactions, &balance.to_string())?;
    Ok(ofx::serialize(&document))
}

/// Expand one normalized transaction into a STMTTRN aggregate, resolving
/// its `{date}`/`{id}` placeholders.
fn bind_txn(pending: &PendingTxn, binding: &TxnBinding) -> Element {
    let children = pending
        .fields
        .iter()
        .map(|(name, value)| Element::leaf(name, binding.apply(value)))
        .collect();
    Element::aggregate("STMTTRN", children)
}

/// Splice the converted transactions and the resolved balance into the
/// parsed template document. The template's own STMTTRN entries go away;
/// its other transaction-list children (DTSTART/DTEND) and everything
/// else in the tree stay exactly as parsed.
pub fn assemble(
    document: &mut OfxDocument,
    transactions: Vec<Element>,
    balance: &str,
) -> Result<(), OfxError> {
    let list = document.transaction_list_mut()?;
    list.retain(|child| child.name != "STMTTRN");
    list.extend(transactions);

    *document.ledger_balance_mut()? = balance.to_string();
    Ok(())
}
