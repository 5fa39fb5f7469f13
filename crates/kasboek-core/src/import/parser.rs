//! Delimited-text record parser and the internal-transfer pre-filter

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{Error, Result};

/// One input row keyed by header name, in source column order
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    line: u64,
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new(line: u64, fields: Vec<(String, String)>) -> Self {
        Self { line, fields }
    }

    /// Physical line in the source file (header is line 1)
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Value of the first column named `column`
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// Header plus data records of a parsed file
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl ParsedFile {
    /// Fail unless every column in `columns` appears in the header
    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        let missing: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|c| !self.headers.iter().any(|h| h == c))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Parse(format!(
                "missing column(s) in header: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Parse delimited text whose first line is the header row
///
/// Fields are trimmed and rows with no content are skipped. With `strict`
/// set, every row must have exactly as many fields as the header.
pub fn parse_records(content: &str, delimiter: char, strict: bool) -> Result<ParsedFile> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    if !delimiter.is_ascii() {
        return Err(Error::Parse(format!(
            "unsupported delimiter '{}'",
            delimiter.escape_default()
        )));
    }

    if content.matches('"').count() % 2 != 0 {
        return Err(Error::Parse("unterminated quoted field".to_string()));
    }

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| Error::Parse(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| Error::Parse(e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if is_blank(&record) {
            continue;
        }

        if strict && record.len() != headers.len() {
            return Err(Error::Parse(format!(
                "line {}: expected {} fields, found {}",
                line,
                headers.len(),
                record.len()
            )));
        }

        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        records.push(RawRecord::new(line, fields));
    }

    debug!(
        "Parsed {} records with {} columns",
        records.len(),
        headers.len()
    );

    Ok(ParsedFile { headers, records })
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.is_empty())
}

/// Drop records whose `column` contains any of `markers` (case-sensitive)
///
/// Returns the kept records and how many were dropped.
pub fn filter_transfers(
    records: Vec<RawRecord>,
    column: &str,
    markers: &[String],
) -> (Vec<RawRecord>, usize) {
    if markers.is_empty() {
        return (records, 0);
    }

    let before = records.len();
    let kept: Vec<RawRecord> = records
        .into_iter()
        .filter(|record| {
            let is_transfer = record
                .get(column)
                .map(|value| markers.iter().any(|m| value.contains(m.as_str())))
                .unwrap_or(false);
            if is_transfer {
                debug!("Skipping internal transfer on line {}", record.line());
            }
            !is_transfer
        })
        .collect();

    let skipped = before - kept.len();
    (kept, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ING_SAMPLE: &str = "\"Date\";\"Name / Description\";\"Amount (EUR)\";\"Debit/credit\"
\"20240115\";\"Albert Heijn 1234\";\"45,67\";\"Debit\"
\"20240116\";\"Naar Oranje Spaarrekening V12345\";\"100,00\";\"Debit\"

\"20240117\";\"Salaris ACME BV\";\"2500,00\";\"Credit\"
";

    #[test]
    fn test_parse_semicolon_export() {
        let parsed = parse_records(ING_SAMPLE, ';', true).unwrap();
        assert_eq!(
            parsed.headers,
            vec!["Date", "Name / Description", "Amount (EUR)", "Debit/credit"]
        );
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(
            parsed.records[0].get("Name / Description"),
            Some("Albert Heijn 1234")
        );
        assert_eq!(parsed.records[2].get("Debit/credit"), Some("Credit"));
        assert_eq!(parsed.records[2].line(), 5);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let parsed = parse_records("a , b\n  1 ,  two  \n", ',', true).unwrap();
        assert_eq!(parsed.headers, vec!["a", "b"]);
        assert_eq!(parsed.records[0].get("b"), Some("two"));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let parsed = parse_records("a;b\n\n;\n1;2\n   \n", ';', false).unwrap();
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn test_strict_rejects_short_row() {
        let result = parse_records("a,b,c\n1,2,3\n4,5\n", ',', true);
        match result {
            Err(Error::Parse(msg)) => assert!(msg.contains("line 3")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_lenient_accepts_short_row() {
        let parsed = parse_records("a,b,c\n1,2,3\n4,5\n", ',', false).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].get("c"), None);
    }

    #[test]
    fn test_unterminated_quote() {
        let result = parse_records("a,b\n\"1,2\n", ',', true);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let parsed = parse_records("\u{feff}Date,Amount\n20240101,1\n", ',', true).unwrap();
        assert_eq!(parsed.headers[0], "Date");
    }

    #[test]
    fn test_require_columns() {
        let parsed = parse_records("Date,Amount\n", ',', true).unwrap();
        assert!(parsed.require_columns(&["Date"]).is_ok());
        match parsed.require_columns(&["Date", "Debit/credit"]) {
            Err(Error::Parse(msg)) => assert!(msg.contains("Debit/credit")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_transfers() {
        let parsed = parse_records(ING_SAMPLE, ';', true).unwrap();
        let (kept, skipped) = filter_transfers(
            parsed.records,
            "Name / Description",
            &["Spaarrekening".to_string()],
        );
        assert_eq!(skipped, 1);
        assert_eq!(kept.len(), 2);
        assert!(kept
            .iter()
            .all(|r| !r.get("Name / Description").unwrap().contains("Spaarrekening")));
    }

    #[test]
    fn test_filter_transfers_is_case_sensitive() {
        let parsed = parse_records(ING_SAMPLE, ';', true).unwrap();
        let (kept, skipped) = filter_transfers(
            parsed.records,
            "Name / Description",
            &["spaarrekening".to_string()],
        );
        assert_eq!(skipped, 0);
        assert_eq!(kept.len(), 3);
    }
}
