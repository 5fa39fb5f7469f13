//! Import command implementation

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use kasboek_core::{
    db::Database,
    import::format_european_grouped,
    models::{CanonicalTransaction, ImportSummary, TransactionType, UserId},
    CategoryMatcher, ImportProfile, Importer,
};

use super::truncate;

pub fn cmd_import(
    db: &Database,
    user: &UserId,
    file: &Path,
    name: Option<&str>,
    profile_path: Option<&Path>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let profile = ImportProfile::load(profile_path).context("Failed to load import profile")?;
    let group_name = match name {
        Some(name) => name.to_string(),
        None => default_group_name(file),
    };

    let importer = Importer::for_database(db, profile);

    if dry_run {
        return preview_import(db, user, &importer, &content, json);
    }

    if !json {
        println!("📥 Importing {} as '{}'...", file.display(), group_name);
    }

    let summary = importer
        .import(user, &group_name, &content)
        .context("Import failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Group name derived from the file name ("statement.csv" -> "statement")
pub fn default_group_name(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Import".to_string())
}

fn print_summary(summary: &ImportSummary) {
    println!(
        "✅ Imported {} transactions into group #{}",
        summary.transaction_count, summary.group_id
    );
    if summary.skipped_transfers > 0 {
        println!(
            "   Skipped {} internal transfers",
            summary.skipped_transfers
        );
    }
    println!("   Income:  {}", format_european_grouped(summary.total_income));
    println!("   Expense: {}", format_european_grouped(summary.total_expense));
    println!(
        "   Categorized: {} by your rules, {} by system rules, {} uncategorized",
        summary.breakdown.by_user_rule,
        summary.breakdown.by_system_rule,
        summary.breakdown.uncategorized
    );
}

fn preview_import(
    db: &Database,
    user: &UserId,
    importer: &Importer<'_>,
    content: &str,
    json: bool,
) -> Result<()> {
    let preview = importer.preview(content).context("Import failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preview.transactions)?);
        return Ok(());
    }

    // Categories are only shown for users who already have them; a dry run
    // never creates anything
    let categories = db.list_categories(user)?;
    let matcher = if categories.is_empty() {
        None
    } else {
        Some(CategoryMatcher::load(db, db, user)?)
    };
    let names: HashMap<i64, String> = categories.into_iter().map(|c| (c.id, c.name)).collect();

    println!();
    println!(
        "🔍 Dry run: {} transactions (delimiter {:?}, {} transfers skipped)",
        preview.transactions.len(),
        preview.delimiter,
        preview.skipped_transfers
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in &preview.transactions {
        let category = matcher
            .as_ref()
            .and_then(|m| names.get(&m.category_for(&tx.name)))
            .map(String::as_str)
            .unwrap_or("-");
        print_transaction(tx, category);
    }

    println!();
    println!("Nothing was saved. Run again without --dry-run to import.");

    Ok(())
}

fn print_transaction(tx: &CanonicalTransaction, category: &str) {
    let sign = match tx.kind {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };
    println!(
        "   {:11} │ {:32} │ {}{:>11} │ {}",
        tx.date,
        truncate(&tx.name, 32),
        sign,
        format_european_grouped(tx.amount),
        category
    );
}
