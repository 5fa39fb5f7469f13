//! User and system keyword rule operations

use rusqlite::{params, Row};

use super::{parse_datetime, parse_keywords, Database};
use crate::error::{Error, Result};
use crate::models::{CategoryRule, CategoryRuleWithCategory, SystemCategoryRule, UserId};

fn category_rule_from_row(row: &Row<'_>) -> rusqlite::Result<CategoryRule> {
    let user_id: String = row.get(1)?;
    let keywords: String = row.get(3)?;
    let created_at_str: String = row.get(4)?;
    Ok(CategoryRule {
        id: row.get(0)?,
        user_id: UserId::from_stored(user_id),
        category_id: row.get(2)?,
        keywords: parse_keywords(&keywords)?,
        created_at: parse_datetime(&created_at_str),
    })
}

/// Keep non-blank keywords, trimmed of surrounding whitespace
fn clean_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| k.to_string())
        .collect()
}

impl Database {
    /// List a user's rules in creation order
    pub fn list_category_rules(&self, user: &UserId) -> Result<Vec<CategoryRule>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, category_id, keywords, created_at
            FROM category_rules
            WHERE user_id = ?
            ORDER BY id
            "#,
        )?;

        let rules = stmt
            .query_map(params![user.as_str()], category_rule_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rules)
    }

    /// List a user's rules with the name of the category each assigns
    pub fn list_category_rules_with_category(
        &self,
        user: &UserId,
    ) -> Result<Vec<CategoryRuleWithCategory>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.id, r.user_id, r.category_id, r.keywords, r.created_at, c.name
            FROM category_rules r
            JOIN categories c ON c.id = r.category_id
            WHERE r.user_id = ?
            ORDER BY r.id
            "#,
        )?;

        let rules = stmt
            .query_map(params![user.as_str()], |row| {
                Ok(CategoryRuleWithCategory {
                    rule: category_rule_from_row(row)?,
                    category_name: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rules)
    }

    /// Create a rule assigning `category_id` (which must belong to `user`)
    pub fn create_category_rule(
        &self,
        user: &UserId,
        category_id: i64,
        keywords: &[String],
    ) -> Result<i64> {
        let keywords = clean_keywords(keywords);
        if keywords.is_empty() {
            return Err(Error::InvalidData(
                "A rule needs at least one keyword".to_string(),
            ));
        }

        if self.get_category(user, category_id)?.is_none() {
            return Err(Error::NotFound(format!("category {}", category_id)));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO category_rules (user_id, category_id, keywords) VALUES (?, ?, ?)",
            params![user.as_str(), category_id, serde_json::to_string(&keywords)?],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Delete one of the user's rules; returns false if no such rule exists
    pub fn delete_category_rule(&self, user: &UserId, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM category_rules WHERE id = ? AND user_id = ?",
            params![id, user.as_str()],
        )?;
        Ok(deleted > 0)
    }

    /// List all system rules in creation order
    pub fn list_system_category_rules(&self) -> Result<Vec<SystemCategoryRule>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, system_category_id, keywords, created_at
            FROM system_category_rules
            ORDER BY id
            "#,
        )?;

        let rules = stmt
            .query_map([], |row| {
                let keywords: String = row.get(2)?;
                let created_at_str: String = row.get(3)?;
                Ok(SystemCategoryRule {
                    id: row.get(0)?,
                    system_category_id: row.get(1)?,
                    keywords: parse_keywords(&keywords)?,
                    created_at: parse_datetime(&created_at_str),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rules)
    }

    /// Add a system rule for an existing system category
    pub fn create_system_category_rule(
        &self,
        system_category_id: i64,
        keywords: &[String],
    ) -> Result<i64> {
        let keywords = clean_keywords(keywords);
        if keywords.is_empty() {
            return Err(Error::InvalidData(
                "A rule needs at least one keyword".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO system_category_rules (system_category_id, keywords) VALUES (?, ?)",
            params![system_category_id, serde_json::to_string(&keywords)?],
        )?;

        Ok(conn.last_insert_rowid())
    }
}
