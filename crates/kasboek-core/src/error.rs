//! Error types for kasboek

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The file is not well-formed delimited text
    #[error("Parse error: {0}")]
    Parse(String),

    /// One or more rows failed field transformation; nothing was imported
    #[error("Validation failed for {} row(s):\n{0}", .0.len())]
    Validation(ValidationErrors),

    /// Category or rule lookup failed
    #[error("Category error: {0}")]
    Category(String),

    /// Caller identity could not be established
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Import contains no transactions")]
    EmptyImport,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A single field that failed locale transformation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("unrecognized debit/credit value '{0}'")]
    UnknownDirection(String),

    #[error("missing value for column '{0}'")]
    MissingField(String),
}

/// A failed row: 1-based position among validated records plus the source line
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub row: usize,
    pub line: u64,
    pub error: FormatError,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {} (line {})", self.row, self.error, self.line)
    }
}

/// Every failing row of a rejected batch, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(pub Vec<RowError>);

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(|e| e.row)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}
