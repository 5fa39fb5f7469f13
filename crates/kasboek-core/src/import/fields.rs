//! Locale-specific field transformers
//!
//! Each transformer is a pure function from a raw (already trimmed) field to
//! a canonical value or a [`FormatError`].

use chrono::{Datelike, NaiveDate};

use crate::error::FormatError;
use crate::models::TransactionType;

/// Dutch short month names, as used in display dates ("15 jan 2024")
const MONTHS: [&str; 12] = [
    "jan", "feb", "mrt", "apr", "mei", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
];

/// Decode a European decimal ("1234,56") by replacing the first comma
pub fn decode_european_decimal(raw: &str) -> Result<f64, FormatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FormatError::InvalidAmount(raw.to_string()));
    }

    let value: f64 = trimmed
        .replacen(',', ".", 1)
        .parse()
        .map_err(|_| FormatError::InvalidAmount(raw.to_string()))?;

    if !value.is_finite() {
        return Err(FormatError::InvalidAmount(raw.to_string()));
    }
    Ok(value)
}

/// Encode to a European decimal with exactly two decimals and no grouping
pub fn encode_european_decimal(value: f64) -> String {
    format!("{:.2}", value).replacen('.', ",", 1)
}

/// Format for display with `.` thousands separators ("1.234,56")
pub fn format_european_grouped(value: f64) -> String {
    let encoded = encode_european_decimal(value.abs());
    let (whole, cents) = encoded.split_once(',').unwrap_or((encoded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && encoded != "0,00" { "-" } else { "" };
    format!("{}{},{}", sign, grouped, cents)
}

/// Parse a compact "YYYYMMDD" date, validating it against the calendar
pub fn parse_compact_date(raw: &str) -> Result<NaiveDate, FormatError> {
    let trimmed = raw.trim();
    let invalid = || FormatError::InvalidDate(raw.to_string());

    if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = trimmed[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = trimmed[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = trimmed[6..8].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Render a date as "DD mon YYYY"
pub fn format_display_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Decode a compact "YYYYMMDD" date to its display form
pub fn decode_compact_date(raw: &str) -> Result<String, FormatError> {
    parse_compact_date(raw).map(format_display_date)
}

/// The credit marker means income; every other value is an expense
pub fn decode_flow_direction(raw: &str, credit_marker: &str) -> TransactionType {
    if raw == credit_marker {
        TransactionType::Income
    } else {
        TransactionType::Expense
    }
}

/// Like [`decode_flow_direction`], but unknown values are an error
pub fn decode_flow_direction_strict(
    raw: &str,
    credit_marker: &str,
    debit_marker: &str,
) -> Result<TransactionType, FormatError> {
    if raw == credit_marker {
        Ok(TransactionType::Income)
    } else if raw == debit_marker {
        Ok(TransactionType::Expense)
    } else {
        Err(FormatError::UnknownDirection(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_european_decimal() {
        assert_eq!(decode_european_decimal("1234,56").unwrap(), 1234.56);
        assert_eq!(decode_european_decimal("-5,50").unwrap(), -5.5);
        assert_eq!(decode_european_decimal("42").unwrap(), 42.0);
        assert_eq!(decode_european_decimal(" 0,01 ").unwrap(), 0.01);
    }

    #[test]
    fn test_decode_european_decimal_rejects_garbage() {
        for raw in ["", "abc", "12,34,56", "1.234,56", "NaN", "inf", "-infinity"] {
            assert_eq!(
                decode_european_decimal(raw),
                Err(FormatError::InvalidAmount(raw.to_string())),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_european_decimal_roundtrip() {
        for raw in [
            "0,00", "0,01", "1,00", "12,34", "-12,34", "1234,56", "-999999,99", "100000,10",
            "7,05", "-0,50",
        ] {
            let decoded = decode_european_decimal(raw).unwrap();
            assert_eq!(encode_european_decimal(decoded), raw);
        }
    }

    #[test]
    fn test_format_european_grouped() {
        assert_eq!(format_european_grouped(1234.56), "1.234,56");
        assert_eq!(format_european_grouped(-1234567.8), "-1.234.567,80");
        assert_eq!(format_european_grouped(999.0), "999,00");
        assert_eq!(format_european_grouped(0.0), "0,00");
        assert_eq!(format_european_grouped(-0.001), "0,00");
    }

    #[test]
    fn test_decode_compact_date() {
        assert_eq!(decode_compact_date("20240115").unwrap(), "15 jan 2024");
        assert_eq!(decode_compact_date("20230301").unwrap(), "01 mrt 2023");
        assert_eq!(decode_compact_date("20241231").unwrap(), "31 dec 2024");
        assert_eq!(decode_compact_date("20240229").unwrap(), "29 feb 2024");
    }

    #[test]
    fn test_decode_compact_date_rejects_impossible_dates() {
        for raw in [
            "20240230", "20230229", "20241301", "20240001", "20240100", "20240431", "2024011",
            "202401150", "2024-1-15", "abcdefgh", "",
        ] {
            assert_eq!(
                decode_compact_date(raw),
                Err(FormatError::InvalidDate(raw.to_string())),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_every_day_of_a_leap_year_decodes() {
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        while date.year() == 2024 {
            let raw = date.format("%Y%m%d").to_string();
            assert_eq!(parse_compact_date(&raw).unwrap(), date);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_flow_direction() {
        assert_eq!(
            decode_flow_direction("Credit", "Credit"),
            TransactionType::Income
        );
        assert_eq!(
            decode_flow_direction("Debit", "Credit"),
            TransactionType::Expense
        );
        assert_eq!(
            decode_flow_direction("credit", "Credit"),
            TransactionType::Expense
        );
        assert_eq!(decode_flow_direction("", "Credit"), TransactionType::Expense);
    }

    #[test]
    fn test_flow_direction_strict() {
        assert_eq!(
            decode_flow_direction_strict("Af", "Bij", "Af").unwrap(),
            TransactionType::Expense
        );
        assert_eq!(
            decode_flow_direction_strict("Refund", "Credit", "Debit"),
            Err(FormatError::UnknownDirection("Refund".to_string()))
        );
    }
}
