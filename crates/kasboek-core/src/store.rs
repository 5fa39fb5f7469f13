//! Storage seams used by the import pipeline
//!
//! The pipeline only sees these traits; [`Database`] implements all three.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{
    CategorizedTransaction, Category, CategoryRule, NewCategory, SystemCategory,
    SystemCategoryRule, TransactionGroup, UserId,
};

/// Read access to keyword rules
pub trait RuleReader {
    fn user_rules(&self, user: &UserId) -> Result<Vec<CategoryRule>>;
    fn system_rules(&self) -> Result<Vec<SystemCategoryRule>>;
}

/// Category lookups plus the one write bootstrap needs
pub trait CategoryStore {
    fn user_categories(&self, user: &UserId) -> Result<Vec<Category>>;
    fn system_categories(&self) -> Result<Vec<SystemCategory>>;
    /// The single system category flagged as the fallback
    fn default_system_category(&self) -> Result<SystemCategory>;
    /// Create `categories` for `user` only if the user owns none yet
    ///
    /// Must be atomic with respect to concurrent calls for the same user.
    /// Returns how many categories were created.
    fn create_initial_categories(&self, user: &UserId, categories: &[NewCategory])
        -> Result<usize>;
}

/// Persists an import batch as one unit
pub trait TransactionWriter {
    fn write_group(
        &self,
        user: &UserId,
        group_name: &str,
        transactions: &[CategorizedTransaction],
    ) -> Result<TransactionGroup>;
}

impl RuleReader for Database {
    fn user_rules(&self, user: &UserId) -> Result<Vec<CategoryRule>> {
        self.list_category_rules(user)
    }

    fn system_rules(&self) -> Result<Vec<SystemCategoryRule>> {
        self.list_system_category_rules()
    }
}

impl CategoryStore for Database {
    fn user_categories(&self, user: &UserId) -> Result<Vec<Category>> {
        self.list_categories(user)
    }

    fn system_categories(&self) -> Result<Vec<SystemCategory>> {
        self.list_system_categories()
    }

    fn default_system_category(&self) -> Result<SystemCategory> {
        self.get_default_system_category()?
            .ok_or_else(|| Error::Category("no default system category configured".to_string()))
    }

    fn create_initial_categories(
        &self,
        user: &UserId,
        categories: &[NewCategory],
    ) -> Result<usize> {
        self.insert_initial_categories(user, categories)
    }
}

impl TransactionWriter for Database {
    fn write_group(
        &self,
        user: &UserId,
        group_name: &str,
        transactions: &[CategorizedTransaction],
    ) -> Result<TransactionGroup> {
        self.create_transaction_group(user, group_name, transactions)
    }
}
