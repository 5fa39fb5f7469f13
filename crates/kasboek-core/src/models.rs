//! Domain models for kasboek

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identity of the caller every user-scoped operation runs as
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Establish a caller identity, rejecting blank values
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            tracing::warn!("Rejected request without a caller identity");
            return Err(Error::Unauthorized(
                "no user identity supplied".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Establish identity from an optional source (flag, env var, header)
    pub fn from_optional(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some(value) => Self::new(value),
            None => Self::new(""),
        }
    }

    /// Identity read back from storage, validated when it was written
    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of money flow for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated transaction, independent of the source file format
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalTransaction {
    /// Display date, e.g. "15 jan 2024"
    pub date: String,
    /// Raw description from the bank
    pub name: String,
    /// Non-negative magnitude
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// A canonical transaction with its assigned category, ready to persist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: CanonicalTransaction,
    pub category_id: i64,
}

/// A user-scoped keyword rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub id: i64,
    pub user_id: UserId,
    pub category_id: i64,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A user rule joined with the name of the category it assigns (for display)
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRuleWithCategory {
    #[serde(flatten)]
    pub rule: CategoryRule,
    pub category_name: String,
}

/// A global keyword rule pointing at a system category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemCategoryRule {
    pub id: i64,
    pub system_category_id: i64,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Global reference category; exactly one is flagged as the fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemCategory {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub is_default: bool,
}

/// A user-owned category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: UserId,
    /// Back-reference to the system category this was materialized from
    pub system_category_id: Option<i64>,
    pub name: String,
    pub icon: String,
    /// Hex color for display (e.g., "#22c55e")
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// A category to be created for a user
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub system_category_id: Option<i64>,
    pub name: String,
    pub icon: String,
    pub color: String,
}

/// One persisted import batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionGroup {
    pub id: i64,
    pub user_id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A group with its computed totals (for listing)
#[derive(Debug, Clone, Serialize)]
pub struct TransactionGroupSummary {
    #[serde(flatten)]
    pub group: TransactionGroup,
    pub transaction_count: i64,
    pub total_income: f64,
    pub total_expense: f64,
}

/// A persisted transaction joined with its category name
#[derive(Debug, Clone, Serialize)]
pub struct StoredTransaction {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub date: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: i64,
    pub category_name: String,
}

/// How transactions in an import were categorized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizationBreakdown {
    pub by_user_rule: usize,
    pub by_system_rule: usize,
    pub uncategorized: usize,
}

/// Result of a successful import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub group_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub transaction_count: usize,
    pub total_income: f64,
    pub total_expense: f64,
    /// Rows dropped by the internal-transfer filter
    pub skipped_transfers: usize,
    pub breakdown: CategorizationBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_trims() {
        let user = UserId::new("  alice@example.com ").unwrap();
        assert_eq!(user.as_str(), "alice@example.com");
    }

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(matches!(UserId::new("   "), Err(Error::Unauthorized(_))));
        assert!(matches!(
            UserId::from_optional(None),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn test_transaction_type_roundtrip() {
        assert_eq!(
            "INCOME".parse::<TransactionType>().unwrap(),
            TransactionType::Income
        );
        assert_eq!(TransactionType::Expense.as_str(), "expense");
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_import_summary_json_is_camel_case() {
        let summary = ImportSummary {
            group_id: 3,
            name: "January".to_string(),
            created_at: Utc::now(),
            transaction_count: 4,
            total_income: 2500.0,
            total_expense: 45.67,
            skipped_transfers: 1,
            breakdown: CategorizationBreakdown {
                by_user_rule: 1,
                by_system_rule: 2,
                uncategorized: 1,
            },
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["groupId"], 3);
        assert_eq!(json["skippedTransfers"], 1);
        assert_eq!(json["breakdown"]["byUserRule"], 1);
        assert_eq!(json["breakdown"]["bySystemRule"], 2);
        assert_eq!(json["breakdown"]["uncategorized"], 1);
        assert!(json["breakdown"].get("by_user_rule").is_none());
    }
}
