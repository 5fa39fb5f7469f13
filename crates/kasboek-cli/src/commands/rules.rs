//! Categorization rule commands

use anyhow::{bail, Result};
use kasboek_core::{
    db::Database, ensure_user_has_categories, extract_keywords, models::UserId, CategoryMatcher,
    MatchSource,
};

use super::truncate;

pub fn cmd_rules_list(db: &Database, user: &UserId) -> Result<()> {
    let rules = db.list_category_rules_with_category(user)?;

    if rules.is_empty() {
        println!("No rules defined. Add one with:");
        println!("  kasboek rules add <category> <keyword>...");
        println!("System rules still apply to every import.");
        return Ok(());
    }

    println!();
    println!("📋 Categorization Rules");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:>4} │ {:20} │ {}", "ID", "Category", "Keywords");
    println!("   ─────┼──────────────────────┼─────────────────────────────────");

    for rule in rules {
        println!(
            "   {:>4} │ {:20} │ {}",
            rule.rule.id,
            truncate(&rule.category_name, 20),
            truncate(&rule.rule.keywords.join(", "), 40)
        );
    }

    Ok(())
}

pub fn cmd_rules_add(
    db: &Database,
    user: &UserId,
    category_name: &str,
    keywords: &[String],
) -> Result<()> {
    ensure_user_has_categories(db, user)?;

    let Some(category) = db.get_category_by_name(user, category_name)? else {
        bail!(
            "Category not found: {} (see `kasboek categories`)",
            category_name
        );
    };

    let rule_id = db.create_category_rule(user, category.id, keywords)?;
    println!(
        "✅ Created rule #{} for category '{}': {}",
        rule_id,
        category.name,
        keywords.join(", ")
    );

    Ok(())
}

pub fn cmd_rules_delete(db: &Database, user: &UserId, id: i64) -> Result<()> {
    if !db.delete_category_rule(user, id)? {
        bail!("Rule #{} not found", id);
    }
    println!("✅ Deleted rule #{}", id);

    Ok(())
}

pub fn cmd_rules_test(db: &Database, user: &UserId, description: &str) -> Result<()> {
    ensure_user_has_categories(db, user)?;

    let matcher = CategoryMatcher::load(db, db, user)?;
    let assignment = matcher.explain(description);

    let category_name = db
        .get_category(user, assignment.category_id)?
        .map(|c| c.name)
        .unwrap_or_else(|| format!("#{}", assignment.category_id));

    println!();
    println!("🔍 \"{}\" -> {}", description, category_name);
    match assignment.source {
        MatchSource::UserRule { rule_id } => println!("   Matched your rule #{}", rule_id),
        MatchSource::SystemRule { rule_id } => println!("   Matched system rule #{}", rule_id),
        MatchSource::Fallback => {
            println!("   No rule matched");
            println!("   💡 Tip: kasboek rules suggest \"{}\"", description);
        }
    }

    Ok(())
}

pub fn cmd_rules_suggest(description: &str) -> Result<()> {
    let keywords = extract_keywords(description);

    if keywords.is_empty() {
        println!("No keywords found in \"{}\"", description);
        return Ok(());
    }

    println!();
    println!("💡 Suggested keywords for \"{}\":", description);
    for keyword in &keywords {
        println!("   • {}", keyword);
    }

    Ok(())
}
