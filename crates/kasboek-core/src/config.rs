//! Import profiles: how a bank export maps onto canonical transactions
//!
//! ## Configuration Resolution
//!
//! A profile is loaded with a three-layer resolution:
//! 1. An explicit path (`kasboek import --profile <file>`)
//! 2. Override in data dir (~/.local/share/kasboek/config/import.toml)
//! 3. Embedded default (ING Netherlands layout, compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default profile (compiled into binary)
const DEFAULT_PROFILE: &str = include_str!("../../../config/import.toml");

/// Source column names for each canonical field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub direction: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            description: "Name / Description".to_string(),
            amount: "Amount (EUR)".to_string(),
            direction: "Debit/credit".to_string(),
        }
    }
}

impl ColumnMapping {
    /// All mapped column names, in canonical field order
    pub fn required(&self) -> [&str; 4] {
        [
            self.date.as_str(),
            self.description.as_str(),
            self.amount.as_str(),
            self.direction.as_str(),
        ]
    }
}

/// Caller-supplied description of a bank export format
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportProfile {
    /// Forced delimiter; detected from the header line when unset
    pub delimiter: Option<char>,
    /// Reject rows whose field count differs from the header
    pub strict_columns: bool,
    /// Reject direction values matching neither marker
    pub strict_direction: bool,
    pub credit_marker: String,
    pub debit_marker: String,
    /// Case-sensitive description substrings marking internal transfers
    pub transfer_markers: Vec<String>,
    pub columns: ColumnMapping,
}

impl Default for ImportProfile {
    fn default() -> Self {
        Self {
            delimiter: None,
            strict_columns: true,
            strict_direction: false,
            credit_marker: "Credit".to_string(),
            debit_marker: "Debit".to_string(),
            transfer_markers: vec!["Spaarrekening".to_string()],
            columns: ColumnMapping::default(),
        }
    }
}

impl ImportProfile {
    /// Load a profile, preferring `path`, then the data-dir override, then the default
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            debug!("Loading import profile from {}", path.display());
            return Self::from_file(path);
        }

        if let Some(override_path) = default_profile_path() {
            if override_path.exists() {
                debug!("Loading import profile override {}", override_path.display());
                return Self::from_file(&override_path);
            }
        }

        Self::parse(DEFAULT_PROFILE)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::InvalidData(format!(
                "Failed to read import profile {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse a profile from TOML; unspecified keys keep their defaults
    pub fn parse(content: &str) -> Result<Self> {
        let profile: ImportProfile = toml::from_str(content)?;
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<()> {
        if let Some(d) = self.delimiter {
            if !d.is_ascii() {
                return Err(Error::InvalidData(format!(
                    "Delimiter must be a single ASCII character, got '{}'",
                    d
                )));
            }
        }
        for column in self.columns.required() {
            if column.trim().is_empty() {
                return Err(Error::InvalidData(
                    "Column mapping contains an empty column name".to_string(),
                ));
            }
        }
        if self.transfer_markers.iter().any(|m| m.is_empty()) {
            return Err(Error::InvalidData(
                "Transfer markers must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default profile override path
pub fn default_profile_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("kasboek").join("config").join("import.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_profile_matches_default() {
        let parsed = ImportProfile::parse(DEFAULT_PROFILE).unwrap();
        assert_eq!(parsed, ImportProfile::default());
    }

    #[test]
    fn test_partial_profile_keeps_defaults() {
        let profile = ImportProfile::parse(
            r#"
            delimiter = ","
            transfer_markers = ["Eigen rekening", "Spaarrekening"]

            [columns]
            amount = "Bedrag (EUR)"
            "#,
        )
        .unwrap();

        assert_eq!(profile.delimiter, Some(','));
        assert_eq!(profile.transfer_markers.len(), 2);
        assert_eq!(profile.columns.amount, "Bedrag (EUR)");
        assert_eq!(profile.columns.date, "Date");
        assert!(profile.strict_columns);
    }

    #[test]
    fn test_rejects_empty_column_name() {
        let result = ImportProfile::parse("[columns]\ndate = \"\"\n");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = ImportProfile::parse("strict_columns = maybe");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.toml");
        fs::write(&path, "credit_marker = \"Bij\"\ndebit_marker = \"Af\"\n").unwrap();

        let profile = ImportProfile::load(Some(&path)).unwrap();
        assert_eq!(profile.credit_marker, "Bij");
        assert_eq!(profile.debit_marker, "Af");
    }
}
