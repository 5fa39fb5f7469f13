//! System category seeding and user category operations

use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};
use tracing::{debug, info};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Category, NewCategory, SystemCategory, UserId};

/// Built-in system categories: (name, icon, is_default, keywords)
///
/// Keywords target Dutch merchants as they appear in ING descriptions.
const SYSTEM_CATEGORIES: [(&str, &str, bool, &[&str]); 10] = [
    (
        "Groceries",
        "shopping-cart",
        false,
        &[
            "albert heijn",
            "jumbo",
            "lidl",
            "aldi",
            "picnic",
            "dirk van den broek",
            "ekoplaza",
            "vomar",
        ],
    ),
    (
        "Utilities",
        "zap",
        false,
        &["vattenfall", "eneco", "essent", "ziggo", "kpn", "odido", "waternet", "vitens"],
    ),
    ("Mortgage/Rent", "home", false, &["hypotheek", "huur"]),
    ("Income", "wallet", false, &["salaris", "salary", "loonbetaling"]),
    (
        "Dining Out",
        "utensils",
        false,
        &["thuisbezorgd", "restaurant", "mcdonalds", "starbucks", "deliveroo", "uber eats"],
    ),
    ("Uncategorized", "help-circle", true, &[]),
    (
        "Transport",
        "car",
        false,
        &["ns groep", "ov-chipkaart", "shell", "esso", "tango", "tinq", "q-park", "swapfiets"],
    ),
    (
        "Entertainment",
        "film",
        false,
        &["netflix", "spotify", "videoland", "disney plus", "pathe"],
    ),
    (
        "Healthcare",
        "heart-pulse",
        false,
        &["apotheek", "huisarts", "tandarts", "zilveren kruis", "menzis"],
    ),
    (
        "Shopping",
        "shopping-bag",
        false,
        &["bol.com", "amazon", "coolblue", "zalando", "hema", "ikea"],
    ),
];

fn system_category_from_row(row: &Row<'_>) -> rusqlite::Result<SystemCategory> {
    Ok(SystemCategory {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        is_default: row.get(3)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    let user_id: String = row.get(1)?;
    let created_at_str: String = row.get(6)?;
    Ok(Category {
        id: row.get(0)?,
        user_id: UserId::from_stored(user_id),
        system_category_id: row.get(2)?,
        name: row.get(3)?,
        icon: row.get(4)?,
        color: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}

const CATEGORY_COLUMNS: &str =
    "id, user_id, system_category_id, name, icon, color, created_at";

impl Database {
    /// Seed the built-in system categories and their keyword rules
    /// (idempotent - skips categories that exist and categories that already have rules)
    pub fn seed_system_categories(&self) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut seeded = 0;

        for (name, icon, is_default, keywords) in &SYSTEM_CATEGORIES {
            seeded += tx.execute(
                "INSERT OR IGNORE INTO system_categories (name, icon, is_default) VALUES (?, ?, ?)",
                params![name, icon, is_default],
            )?;

            let id: i64 = tx.query_row(
                "SELECT id FROM system_categories WHERE name = ?",
                params![name],
                |row| row.get(0),
            )?;

            let has_rules: bool = tx
                .query_row(
                    "SELECT 1 FROM system_category_rules WHERE system_category_id = ? LIMIT 1",
                    params![id],
                    |_| Ok(true),
                )
                .optional()?
                .unwrap_or(false);

            if !has_rules && !keywords.is_empty() {
                tx.execute(
                    "INSERT INTO system_category_rules (system_category_id, keywords) VALUES (?, ?)",
                    params![id, serde_json::to_string(keywords)?],
                )?;
            }
        }

        tx.commit()?;
        if seeded > 0 {
            info!("Seeded {} system categories", seeded);
        }
        Ok(())
    }

    /// List all system categories
    pub fn list_system_categories(&self) -> Result<Vec<SystemCategory>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id, name, icon, is_default FROM system_categories ORDER BY id")?;

        let categories = stmt
            .query_map([], system_category_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get the system category flagged as the fallback
    pub fn get_default_system_category(&self) -> Result<Option<SystemCategory>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name, icon, is_default FROM system_categories WHERE is_default = 1",
                [],
                system_category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    /// List a user's categories
    pub fn list_categories(&self, user: &UserId) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM categories WHERE user_id = ? ORDER BY id",
            CATEGORY_COLUMNS
        ))?;

        let categories = stmt
            .query_map(params![user.as_str()], category_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get one of the user's categories by id
    pub fn get_category(&self, user: &UserId, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                &format!(
                    "SELECT {} FROM categories WHERE user_id = ? AND id = ?",
                    CATEGORY_COLUMNS
                ),
                params![user.as_str(), id],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    /// Find one of the user's categories by name (case-insensitive)
    pub fn get_category_by_name(&self, user: &UserId, name: &str) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                &format!(
                    "SELECT {} FROM categories WHERE user_id = ? AND name = ? COLLATE NOCASE \
                     ORDER BY id LIMIT 1",
                    CATEGORY_COLUMNS
                ),
                params![user.as_str(), name],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    /// Insert `categories` for `user` if, and only if, the user has none
    ///
    /// The check and the inserts share one IMMEDIATE transaction, so concurrent
    /// callers for the same user are serialized and only the first one inserts.
    pub fn insert_initial_categories(
        &self,
        user: &UserId,
        categories: &[NewCategory],
    ) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: i64 = tx.query_row(
            "SELECT COUNT(*) FROM categories WHERE user_id = ?",
            params![user.as_str()],
            |row| row.get(0),
        )?;
        if existing > 0 {
            debug!("User {} already has {} categories", user, existing);
            return Ok(0);
        }

        let mut created = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR IGNORE INTO categories (user_id, system_category_id, name, icon, color)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )?;
            for category in categories {
                created += stmt.execute(params![
                    user.as_str(),
                    category.system_category_id,
                    category.name,
                    category.icon,
                    category.color,
                ])?;
            }
        }

        tx.commit()?;
        Ok(created)
    }
}
