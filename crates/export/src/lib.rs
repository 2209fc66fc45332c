pub mod normalize;
pub mod ofx;
pub mod rows;
pub mod sequence;
pub mod statement;
pub mod template;

pub use normalize::{normalize_row, PendingTxn, TxnTemplate};
pub use ofx::{Element, Node, OfxDocument, OfxError};
pub use rows::{read_rows, CsvError, CsvProfile, RawRow};
pub use sequence::DaySequencer;
pub use statement::{export_statement, ExportError, StatementConfig};
pub use template::{HeaderBinding, TxnBinding};
