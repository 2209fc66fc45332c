use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Dialect of the source export: field separator plus the ordered column
/// names the positional fields map onto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvProfile {
    pub separator: String,
    pub columns: Vec<String>,
}

impl Default for CsvProfile {
    fn default() -> Self {
        CsvProfile {
            separator: ";".to_string(),
            columns: Vec::new(),
        }
    }
}

/// One data line, keyed by configured column name.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    /// Missing columns read as empty, never as a row failure.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> RawRow {
        RawRow {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Read every data row from `source`. The first line is always treated as
/// a header and skipped, whatever it contains; the remaining lines map
/// positionally onto the profile's column names. Rows shorter than the
/// column list leave the trailing columns empty.
pub fn read_rows<R: Read>(source: R, profile: &CsvProfile) -> Result<Vec<RawRow>, CsvError> {
    let delimiter = profile.separator.as_bytes().first().copied().unwrap_or(b';');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(source);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.is_empty() {
            continue;
        }

        let mut fields = HashMap::with_capacity(profile.columns.len());
        for (i, column) in profile.columns.iter().enumerate() {
            fields.insert(column.clone(), record.get(i).unwrap_or("").to_string());
        }
        rows.push(RawRow { fields });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CsvProfile {
        CsvProfile {
            separator: ";".to_string(),
            columns: ["MEMO", "DTPOSTED", "HOUR", "TRNAMT", "BALAMT", "CARDTYPE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    #[test]
    fn maps_fields_positionally() {
        let data = b"MEMO;DTPOSTED;HOUR;TRNAMT;BALAMT;CARDTYPE\ncoffee;1/2/24;10:00;-12,50;100,00;VISA\n";
        let rows = read_rows(data.as_ref(), &profile()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("MEMO"), "coffee");
        assert_eq!(rows[0].get("TRNAMT"), "-12,50");
        assert_eq!(rows[0].get("BALAMT"), "100,00");
    }

    #[test]
    fn first_line_skipped_even_without_header_text() {
        // The first line is data-shaped here, but it is still dropped.
        let data = b"lunch;1/2/24;13:00;-30,00;70,00;VISA\ncoffee;1/2/24;10:00;-12,50;100,00;VISA\n";
        let rows = read_rows(data.as_ref(), &profile()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("MEMO"), "coffee");
    }

    #[test]
    fn short_row_leaves_trailing_columns_empty() {
        let data = b"h1;h2;h3;h4;h5;h6\ncoffee;1/2/24\n";
        let rows = read_rows(data.as_ref(), &profile()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("MEMO"), "coffee");
        assert_eq!(rows[0].get("DTPOSTED"), "1/2/24");
        assert_eq!(rows[0].get("TRNAMT"), "");
        assert_eq!(rows[0].get("CARDTYPE"), "");
    }

    #[test]
    fn unknown_column_reads_empty() {
        let data = b"h1;h2;h3;h4;h5;h6\ncoffee;1/2/24;10:00;-12,50;100,00;VISA\n";
        let rows = read_rows(data.as_ref(), &profile()).unwrap();
        assert_eq!(rows[0].get("NOT_A_COLUMN"), "");
    }

    #[test]
    fn respects_configured_separator() {
        let comma = CsvProfile {
            separator: ",".to_string(),
            columns: profile().columns,
        };
        let data = b"h1,h2,h3,h4,h5,h6\ncoffee,1/2/24,10:00,-12.50,100.00,VISA\n";
        let rows = read_rows(data.as_ref(), &comma).unwrap();
        assert_eq!(rows[0].get("HOUR"), "10:00");
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let rows = read_rows(b"".as_ref(), &profile()).unwrap();
        assert!(rows.is_empty());
    }
}
