//! Transaction group commands

use anyhow::{bail, Result};
use kasboek_core::{
    db::Database,
    ensure_user_has_categories,
    import::format_european_grouped,
    models::{TransactionType, UserId},
};

use super::truncate;

pub fn cmd_groups_list(db: &Database, user: &UserId) -> Result<()> {
    let groups = db.list_transaction_groups(user)?;

    if groups.is_empty() {
        println!("No imports yet. Import a bank export with:");
        println!("  kasboek import --file statement.csv");
        return Ok(());
    }

    println!();
    println!("📦 Transaction Groups");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>4} │ {:24} │ {:>5} │ {:>12} │ {:>12} │ {}",
        "ID", "Name", "Count", "Income", "Expense", "Imported"
    );
    println!(
        "   ─────┼──────────────────────────┼───────┼──────────────┼──────────────┼──────────"
    );

    for summary in groups {
        println!(
            "   {:>4} │ {:24} │ {:>5} │ {:>12} │ {:>12} │ {}",
            summary.group.id,
            truncate(&summary.group.name, 24),
            summary.transaction_count,
            format_european_grouped(summary.total_income),
            format_european_grouped(summary.total_expense),
            summary.group.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub fn cmd_groups_show(db: &Database, user: &UserId, id: i64) -> Result<()> {
    let Some(summary) = db.get_transaction_group(user, id)? else {
        bail!("Group #{} not found", id);
    };
    let transactions = db.list_group_transactions(user, id)?;

    println!();
    println!(
        "📦 {} ({} transactions)",
        summary.group.name, summary.transaction_count
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in &transactions {
        let sign = match tx.kind {
            TransactionType::Income => "+",
            TransactionType::Expense => "-",
        };
        println!(
            "   {:>5} │ {:11} │ {:32} │ {}{:>11} │ {}",
            tx.id,
            tx.date,
            truncate(&tx.name, 32),
            sign,
            format_european_grouped(tx.amount),
            tx.category_name
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Income: {}   Expense: {}",
        format_european_grouped(summary.total_income),
        format_european_grouped(summary.total_expense)
    );

    Ok(())
}

pub fn cmd_groups_recategorize(
    db: &Database,
    user: &UserId,
    category_name: &str,
    ids: &[i64],
) -> Result<()> {
    ensure_user_has_categories(db, user)?;

    let Some(category) = db.get_category_by_name(user, category_name)? else {
        bail!(
            "Category not found: {} (see `kasboek categories`)",
            category_name
        );
    };

    let updated = db.update_transaction_category(user, ids, category.id)?;
    if updated == 0 {
        bail!("No matching transactions for IDs {:?}", ids);
    }

    println!("✅ Moved {} transaction(s) to '{}'", updated, category.name);
    Ok(())
}

pub fn cmd_groups_remove_transactions(db: &Database, user: &UserId, ids: &[i64]) -> Result<()> {
    let deleted = db.delete_transactions(user, ids)?;
    if deleted == 0 {
        bail!("No matching transactions for IDs {:?}", ids);
    }

    println!("✅ Removed {} transaction(s)", deleted);
    Ok(())
}

pub fn cmd_groups_delete(db: &Database, user: &UserId, id: i64) -> Result<()> {
    if !db.delete_transaction_group(user, id)? {
        bail!("Group #{} not found", id);
    }

    println!("✅ Deleted group #{} and its transactions", id);
    Ok(())
}
