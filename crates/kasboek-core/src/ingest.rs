//! Import orchestration: bank export text → categorized, persisted batch
//!
//! Stages run in a fixed order and any failure aborts the whole import
//! before anything is written:
//!
//! 1. Ensure the user has categories
//! 2. Detect the delimiter (unless the profile forces one)
//! 3. Parse records and check the mapped columns exist
//! 4. Drop internal transfers
//! 5. Validate every row; reject the batch if any row failed
//! 6. Categorize
//! 7. Persist the group and its transactions in one unit

use tracing::{debug, info};

use crate::bootstrap::ensure_user_has_categories;
use crate::categorize::{CategoryMatcher, MatchSource};
use crate::config::ImportProfile;
use crate::db::Database;
use crate::error::{Error, Result, ValidationErrors};
use crate::import::{detect_delimiter, filter_transfers, parse_records, validate_all};
use crate::models::{
    CanonicalTransaction, CategorizationBreakdown, CategorizedTransaction, ImportSummary,
    TransactionType, UserId,
};
use crate::store::{CategoryStore, RuleReader, TransactionWriter};

/// Validated transactions of a file that has not been persisted
#[derive(Debug, Clone)]
pub struct ImportPreview {
    pub delimiter: char,
    pub transactions: Vec<CanonicalTransaction>,
    pub skipped_transfers: usize,
}

/// Runs the import pipeline against injected storage
pub struct Importer<'a> {
    rules: &'a dyn RuleReader,
    categories: &'a dyn CategoryStore,
    writer: &'a dyn TransactionWriter,
    profile: ImportProfile,
}

impl<'a> Importer<'a> {
    pub fn new(
        rules: &'a dyn RuleReader,
        categories: &'a dyn CategoryStore,
        writer: &'a dyn TransactionWriter,
        profile: ImportProfile,
    ) -> Self {
        Self {
            rules,
            categories,
            writer,
            profile,
        }
    }

    /// Importer backed entirely by one database
    pub fn for_database(db: &'a Database, profile: ImportProfile) -> Self {
        Self::new(db, db, db, profile)
    }

    /// Parse, filter and validate `content` without touching storage
    pub fn preview(&self, content: &str) -> Result<ImportPreview> {
        let delimiter = self
            .profile
            .delimiter
            .unwrap_or_else(|| detect_delimiter(content));
        debug!("Using delimiter {:?}", delimiter);

        let parsed = parse_records(content, delimiter, self.profile.strict_columns)?;
        parsed.require_columns(&self.profile.columns.required())?;

        let (records, skipped_transfers) = filter_transfers(
            parsed.records,
            &self.profile.columns.description,
            &self.profile.transfer_markers,
        );
        if skipped_transfers > 0 {
            debug!("Filtered {} internal transfers", skipped_transfers);
        }

        let (transactions, errors) = validate_all(&records, &self.profile);
        if !errors.is_empty() {
            return Err(Error::Validation(ValidationErrors(errors)));
        }

        Ok(ImportPreview {
            delimiter,
            transactions,
            skipped_transfers,
        })
    }

    /// Import `content` as a new transaction group owned by `user`
    pub fn import(&self, user: &UserId, group_name: &str, content: &str) -> Result<ImportSummary> {
        let group_name = group_name.trim();
        if group_name.is_empty() {
            return Err(Error::InvalidData(
                "Import name must not be empty".to_string(),
            ));
        }

        ensure_user_has_categories(self.categories, user).map_err(|e| match e {
            Error::Category(_) => e,
            other => Error::Category(format!("failed to set up categories: {}", other)),
        })?;

        let preview = self.preview(content)?;
        if preview.transactions.is_empty() {
            return Err(Error::EmptyImport);
        }

        let matcher = CategoryMatcher::load(self.rules, self.categories, user)?;

        let mut breakdown = CategorizationBreakdown::default();
        let categorized: Vec<CategorizedTransaction> = preview
            .transactions
            .into_iter()
            .map(|transaction| {
                let assignment = matcher.explain(&transaction.name);
                match assignment.source {
                    MatchSource::UserRule { .. } => breakdown.by_user_rule += 1,
                    MatchSource::SystemRule { .. } => breakdown.by_system_rule += 1,
                    MatchSource::Fallback => breakdown.uncategorized += 1,
                }
                CategorizedTransaction {
                    transaction,
                    category_id: assignment.category_id,
                }
            })
            .collect();

        let group = self.writer.write_group(user, group_name, &categorized)?;

        let (total_income, total_expense) = totals(&categorized);
        info!(
            "Imported {} transactions into group #{} '{}'",
            categorized.len(),
            group.id,
            group.name
        );

        Ok(ImportSummary {
            group_id: group.id,
            name: group.name,
            created_at: group.created_at,
            transaction_count: categorized.len(),
            total_income,
            total_expense,
            skipped_transfers: preview.skipped_transfers,
            breakdown,
        })
    }
}

/// Sum of amounts partitioned by type: (income, expense)
pub fn totals(transactions: &[CategorizedTransaction]) -> (f64, f64) {
    transactions
        .iter()
        .fold((0.0, 0.0), |(income, expense), tx| {
            match tx.transaction.kind {
                TransactionType::Income => (income + tx.transaction.amount, expense),
                TransactionType::Expense => (income, expense + tx.transaction.amount),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use chrono::Utc;

    use crate::models::{
        Category, CategoryRule, NewCategory, SystemCategory, SystemCategoryRule, TransactionGroup,
    };

    /// In-memory storage double that records what would be written
    #[derive(Default)]
    struct FakeStore {
        categories: RefCell<Vec<Category>>,
        user_rules: Vec<CategoryRule>,
        fail_rules: bool,
        written: RefCell<Vec<CategorizedTransaction>>,
    }

    fn system_categories() -> Vec<SystemCategory> {
        vec![
            SystemCategory {
                id: 1,
                name: "Groceries".to_string(),
                icon: "shopping-cart".to_string(),
                is_default: false,
            },
            SystemCategory {
                id: 2,
                name: "Uncategorized".to_string(),
                icon: "help-circle".to_string(),
                is_default: true,
            },
        ]
    }

    impl RuleReader for FakeStore {
        fn user_rules(&self, _user: &UserId) -> Result<Vec<CategoryRule>> {
            if self.fail_rules {
                return Err(Error::NotFound("rules table".to_string()));
            }
            Ok(self.user_rules.clone())
        }

        fn system_rules(&self) -> Result<Vec<SystemCategoryRule>> {
            Ok(vec![SystemCategoryRule {
                id: 1,
                system_category_id: 1,
                keywords: vec!["albert heijn".to_string()],
                created_at: Utc::now(),
            }])
        }
    }

    impl CategoryStore for FakeStore {
        fn user_categories(&self, _user: &UserId) -> Result<Vec<Category>> {
            Ok(self.categories.borrow().clone())
        }

        fn system_categories(&self) -> Result<Vec<SystemCategory>> {
            Ok(system_categories())
        }

        fn default_system_category(&self) -> Result<SystemCategory> {
            Ok(system_categories().remove(1))
        }

        fn create_initial_categories(
            &self,
            user: &UserId,
            categories: &[NewCategory],
        ) -> Result<usize> {
            let mut existing = self.categories.borrow_mut();
            for (i, c) in categories.iter().enumerate() {
                existing.push(Category {
                    id: 100 + i as i64,
                    user_id: user.clone(),
                    system_category_id: c.system_category_id,
                    name: c.name.clone(),
                    icon: c.icon.clone(),
                    color: c.color.clone(),
                    created_at: Utc::now(),
                });
            }
            Ok(categories.len())
        }
    }

    impl TransactionWriter for FakeStore {
        fn write_group(
            &self,
            user: &UserId,
            group_name: &str,
            transactions: &[CategorizedTransaction],
        ) -> Result<TransactionGroup> {
            self.written.borrow_mut().extend_from_slice(transactions);
            Ok(TransactionGroup {
                id: 1,
                user_id: user.clone(),
                name: group_name.to_string(),
                created_at: Utc::now(),
            })
        }
    }

    const CSV: &str = "Date,Name / Description,Amount (EUR),Debit/credit
20240102,Albert Heijn 1234,\"12,50\",Debit
20240103,Naar Oranje Spaarrekening,\"100,00\",Debit
20240104,Salaris ACME,\"2000,00\",Credit
20240105,Bakker Bart,\"3,25\",Debit
";

    #[test]
    fn test_import_with_fake_store() {
        let store = FakeStore::default();
        let importer = Importer::new(&store, &store, &store, ImportProfile::default());
        let user = UserId::new("tester").unwrap();

        let summary = importer.import(&user, "January", CSV).unwrap();

        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.skipped_transfers, 1);
        assert_eq!(summary.total_income, 2000.0);
        assert_eq!(summary.total_expense, 15.75);
        assert_eq!(
            summary.breakdown,
            CategorizationBreakdown {
                by_user_rule: 0,
                by_system_rule: 1,
                uncategorized: 2,
            }
        );

        let written = store.written.borrow();
        assert_eq!(written.len(), 3);
        assert_eq!(written[0].category_id, 100);
        assert_eq!(written[1].category_id, 101);
        assert_eq!(written[0].transaction.date, "02 jan 2024");
    }

    #[test]
    fn test_rule_lookup_failure_is_category_error() {
        let store = FakeStore {
            fail_rules: true,
            ..FakeStore::default()
        };
        let importer = Importer::new(&store, &store, &store, ImportProfile::default());
        let user = UserId::new("tester").unwrap();

        let result = importer.import(&user, "January", CSV);
        assert!(matches!(result, Err(Error::Category(_))));
        assert!(store.written.borrow().is_empty());
    }

    #[test]
    fn test_only_transfers_is_empty_import() {
        let store = FakeStore::default();
        let importer = Importer::new(&store, &store, &store, ImportProfile::default());
        let user = UserId::new("tester").unwrap();
        let csv = "Date,Name / Description,Amount (EUR),Debit/credit
20240103,Naar Oranje Spaarrekening,\"100,00\",Debit
";
        assert!(matches!(
            importer.import(&user, "Savings", csv),
            Err(Error::EmptyImport)
        ));
    }

    #[test]
    fn test_blank_group_name_rejected() {
        let store = FakeStore::default();
        let importer = Importer::new(&store, &store, &store, ImportProfile::default());
        let user = UserId::new("tester").unwrap();
        assert!(matches!(
            importer.import(&user, "  ", CSV),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_preview_uses_forced_delimiter() {
        let store = FakeStore::default();
        let profile = ImportProfile {
            delimiter: Some(';'),
            ..ImportProfile::default()
        };
        let importer = Importer::new(&store, &store, &store, profile);

        let csv = "Date;Name / Description;Amount (EUR);Debit/credit
20240102;Shop, Inc, NL;1,00;Debit
";
        let preview = importer.preview(csv).unwrap();
        assert_eq!(preview.delimiter, ';');
        assert_eq!(preview.transactions[0].name, "Shop, Inc, NL");
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let store = FakeStore::default();
        let importer = Importer::new(&store, &store, &store, ImportProfile::default());
        let result = importer.preview("Date,Omschrijving,Bedrag\n20240101,x,1\n");
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}
