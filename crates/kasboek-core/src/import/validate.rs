//! Row validation: raw records to canonical transactions

use tracing::debug;

use super::fields::{
    decode_compact_date, decode_european_decimal, decode_flow_direction,
    decode_flow_direction_strict,
};
use super::parser::RawRecord;
use crate::config::ImportProfile;
use crate::error::{FormatError, RowError};
use crate::models::{CanonicalTransaction, TransactionType};

/// Transform one record, failing on the first field that does not decode
///
/// Fields are decoded in a fixed order: date, name, amount, direction.
pub fn validate_record(
    record: &RawRecord,
    profile: &ImportProfile,
) -> Result<CanonicalTransaction, FormatError> {
    let columns = &profile.columns;

    let date = decode_compact_date(field(record, &columns.date)?)?;
    let name = field(record, &columns.description)?.to_string();
    let amount = decode_european_decimal(field(record, &columns.amount)?)?.abs();
    let kind = decode_direction(field(record, &columns.direction)?, profile)?;

    Ok(CanonicalTransaction {
        date,
        name,
        amount,
        kind,
    })
}

fn field<'r>(record: &'r RawRecord, column: &str) -> Result<&'r str, FormatError> {
    record
        .get(column)
        .ok_or_else(|| FormatError::MissingField(column.to_string()))
}

fn decode_direction(raw: &str, profile: &ImportProfile) -> Result<TransactionType, FormatError> {
    if profile.strict_direction {
        decode_flow_direction_strict(raw, &profile.credit_marker, &profile.debit_marker)
    } else {
        Ok(decode_flow_direction(raw, &profile.credit_marker))
    }
}

/// Validate every record without stopping at the first failure
///
/// Output order follows input order. Row numbers in the returned errors are
/// 1-based positions within `records`.
pub fn validate_all(
    records: &[RawRecord],
    profile: &ImportProfile,
) -> (Vec<CanonicalTransaction>, Vec<RowError>) {
    let mut transactions = Vec::with_capacity(records.len());
    let mut errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match validate_record(record, profile) {
            Ok(tx) => transactions.push(tx),
            Err(error) => {
                debug!("Row {} (line {}) failed: {}", index + 1, record.line(), error);
                errors.push(RowError {
                    row: index + 1,
                    line: record.line(),
                    error,
                });
            }
        }
    }

    (transactions, errors)
}
