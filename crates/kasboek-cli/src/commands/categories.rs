//! Category listing

use anyhow::Result;
use kasboek_core::{db::Database, ensure_user_has_categories, models::UserId};

use super::truncate;

pub fn cmd_categories(db: &Database, user: &UserId) -> Result<()> {
    let created = ensure_user_has_categories(db, user)?;
    if created > 0 {
        println!("   Created {} default categories", created);
    }

    let categories = db.list_categories(user)?;
    let default_id = db.get_default_system_category()?.map(|sc| sc.id);

    println!();
    println!("🏷️  Categories for {}", user);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>4} │ {:20} │ {:14} │ {:8} │ {}",
        "ID", "Name", "Icon", "Color", "Source"
    );
    println!("   ─────┼──────────────────────┼────────────────┼──────────┼─────────");

    for category in categories {
        let source = match category.system_category_id {
            Some(id) if Some(id) == default_id => "fallback",
            Some(_) => "system",
            None => "custom",
        };
        println!(
            "   {:>4} │ {:20} │ {:14} │ {:8} │ {}",
            category.id,
            truncate(&category.name, 20),
            truncate(&category.icon, 14),
            category.color,
            source
        );
    }

    Ok(())
}
