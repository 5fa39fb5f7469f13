//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `resolve_user` - Establish the caller identity from --user / KASBOEK_USER
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use kasboek_core::{db::Database, models::UserId};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Caller identity for user-scoped commands
pub fn resolve_user(user: Option<&str>) -> Result<UserId> {
    UserId::from_optional(user).context("Pass --user or set KASBOEK_USER")
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    // Opening runs migrations and seeds the system categories
    let db = open_db(db_path, no_encrypt)?;

    let system_categories = db
        .list_system_categories()
        .context("Failed to read system categories")?;
    let system_rules = db
        .list_system_category_rules()
        .context("Failed to read system rules")?;
    println!(
        "   Seeded {} system categories with {} keyword rules",
        system_categories.len(),
        system_rules.len()
    );

    if db.is_encrypted().context("Failed to check encryption")? {
        println!("   🔒 Encryption: ENABLED");
    } else {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Choose a user: export KASBOEK_USER=you@example.com");
    println!("  2. Import an export: kasboek import --file statement.csv");

    Ok(())
}
