//! Bank export ingestion: delimiter detection, parsing, field transformation
//! and row validation
//!
//! - `detect` - Infer the delimiter from the header line
//! - `parser` - Delimited text to header-keyed records, transfer pre-filter
//! - `fields` - Pure locale transformers (European decimals, compact dates, flow direction)
//! - `validate` - Apply the transformers to every record, collecting row failures

mod detect;
mod fields;
mod parser;
mod validate;

pub use detect::detect_delimiter;
pub use fields::{
    decode_compact_date, decode_european_decimal, decode_flow_direction,
    decode_flow_direction_strict, encode_european_decimal, format_display_date,
    format_european_grouped, parse_compact_date,
};
pub use parser::{filter_transfers, parse_records, ParsedFile, RawRecord};
pub use validate::{validate_all, validate_record};
