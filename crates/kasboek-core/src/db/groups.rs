//! Transaction group (import batch) and transaction operations

use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::debug;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{
    CategorizedTransaction, StoredTransaction, TransactionGroup, TransactionGroupSummary, UserId,
};

const GROUP_SUMMARY_QUERY: &str = r#"
    SELECT g.id, g.user_id, g.name, g.created_at,
           COUNT(t.id),
           COALESCE(SUM(CASE WHEN t.type = 'income' THEN t.amount END), 0),
           COALESCE(SUM(CASE WHEN t.type = 'expense' THEN t.amount END), 0)
    FROM transaction_groups g
    LEFT JOIN transactions t ON t.group_id = g.id
"#;

/// "?, ?, ?" for an IN clause of `n` values
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<TransactionGroup> {
    let user_id: String = row.get(1)?;
    let created_at_str: String = row.get(3)?;
    Ok(TransactionGroup {
        id: row.get(0)?,
        user_id: UserId::from_stored(user_id),
        name: row.get(2)?,
        created_at: parse_datetime(&created_at_str),
    })
}

fn group_summary_from_row(row: &Row<'_>) -> rusqlite::Result<TransactionGroupSummary> {
    Ok(TransactionGroupSummary {
        group: group_from_row(row)?,
        transaction_count: row.get(4)?,
        total_income: row.get(5)?,
        total_expense: row.get(6)?,
    })
}

impl Database {
    /// Persist a group and all of its transactions atomically
    pub fn create_transaction_group(
        &self,
        user: &UserId,
        name: &str,
        transactions: &[CategorizedTransaction],
    ) -> Result<TransactionGroup> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO transaction_groups (user_id, name) VALUES (?, ?)",
            params![user.as_str(), name],
        )?;
        let group_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO transactions (user_id, group_id, category_id, name, date, amount, type)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )?;
            for item in transactions {
                let t = &item.transaction;
                stmt.execute(params![
                    user.as_str(),
                    group_id,
                    item.category_id,
                    t.name,
                    t.date,
                    t.amount,
                    t.kind.as_str(),
                ])?;
            }
        }

        let group = tx.query_row(
            "SELECT id, user_id, name, created_at FROM transaction_groups WHERE id = ?",
            params![group_id],
            group_from_row,
        )?;

        tx.commit()?;
        debug!(
            "Stored group #{} with {} transactions",
            group_id,
            transactions.len()
        );
        Ok(group)
    }

    /// List a user's groups, newest first, with counts and totals
    pub fn list_transaction_groups(&self, user: &UserId) -> Result<Vec<TransactionGroupSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE g.user_id = ? GROUP BY g.id ORDER BY g.created_at DESC, g.id DESC",
            GROUP_SUMMARY_QUERY
        ))?;

        let groups = stmt
            .query_map(params![user.as_str()], group_summary_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(groups)
    }

    /// Get one of the user's groups with counts and totals
    pub fn get_transaction_group(
        &self,
        user: &UserId,
        id: i64,
    ) -> Result<Option<TransactionGroupSummary>> {
        let conn = self.conn()?;
        let group = conn
            .query_row(
                &format!(
                    "{} WHERE g.user_id = ? AND g.id = ? GROUP BY g.id",
                    GROUP_SUMMARY_QUERY
                ),
                params![user.as_str(), id],
                group_summary_from_row,
            )
            .optional()?;
        Ok(group)
    }

    /// List the transactions of one of the user's groups, in import order
    pub fn list_group_transactions(
        &self,
        user: &UserId,
        group_id: i64,
    ) -> Result<Vec<StoredTransaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.group_id, t.name, t.date, t.amount, t.type, t.category_id, c.name
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = ? AND t.group_id = ?
            ORDER BY t.id
            "#,
        )?;

        let transactions = stmt
            .query_map(params![user.as_str(), group_id], |row| {
                let kind: String = row.get(5)?;
                Ok(StoredTransaction {
                    id: row.get(0)?,
                    group_id: row.get(1)?,
                    name: row.get(2)?,
                    date: row.get(3)?,
                    amount: row.get(4)?,
                    kind: kind.parse().map_err(|e: String| {
                        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into())
                    })?,
                    category_id: row.get(6)?,
                    category_name: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Move transactions to another of the user's categories
    ///
    /// Ids that don't exist or belong to someone else are ignored. Returns
    /// how many transactions were updated.
    pub fn update_transaction_category(
        &self,
        user: &UserId,
        transaction_ids: &[i64],
        category_id: i64,
    ) -> Result<usize> {
        if self.get_category(user, category_id)?.is_none() {
            return Err(Error::NotFound(format!("category {}", category_id)));
        }
        if transaction_ids.is_empty() {
            return Ok(0);
        }

        let conn = self.conn()?;
        let sql = format!(
            "UPDATE transactions SET category_id = ? WHERE user_id = ? AND id IN ({})",
            placeholders(transaction_ids.len())
        );
        let mut values: Vec<rusqlite::types::Value> =
            vec![category_id.into(), user.as_str().to_string().into()];
        values.extend(transaction_ids.iter().map(|&id| id.into()));

        let updated = conn.execute(&sql, params_from_iter(values))?;
        debug!("Recategorized {} transactions to category {}", updated, category_id);
        Ok(updated)
    }

    /// Delete some of the user's transactions; returns how many were removed
    pub fn delete_transactions(&self, user: &UserId, transaction_ids: &[i64]) -> Result<usize> {
        if transaction_ids.is_empty() {
            return Ok(0);
        }

        let conn = self.conn()?;
        let sql = format!(
            "DELETE FROM transactions WHERE user_id = ? AND id IN ({})",
            placeholders(transaction_ids.len())
        );
        let mut values: Vec<rusqlite::types::Value> = vec![user.as_str().to_string().into()];
        values.extend(transaction_ids.iter().map(|&id| id.into()));

        let deleted = conn.execute(&sql, params_from_iter(values))?;
        Ok(deleted)
    }

    /// Delete one of the user's groups together with its transactions
    ///
    /// Returns false if the user has no such group.
    pub fn delete_transaction_group(&self, user: &UserId, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transaction_groups WHERE id = ? AND user_id = ?",
            params![id, user.as_str()],
        )?;
        if deleted > 0 {
            debug!("Deleted group #{}", id);
        }
        Ok(deleted > 0)
    }
}
