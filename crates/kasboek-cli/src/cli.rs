//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kasboek - Import and categorize bank statements
#[derive(Parser)]
#[command(name = "kasboek")]
#[command(about = "Bank statement import and categorization", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "kasboek.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set KASBOEK_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// User to run as (required for everything except init)
    #[arg(short, long, env = "KASBOEK_USER", global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import a bank export as a new transaction group
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Name for the transaction group (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Import profile (TOML) describing the export format
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Validate and categorize without saving anything
        #[arg(long)]
        dry_run: bool,

        /// Print the import summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List your categories
    Categories,

    /// Manage categorization rules
    Rules {
        #[command(subcommand)]
        action: Option<RulesAction>,
    },

    /// Browse imported transaction groups
    Groups {
        #[command(subcommand)]
        action: Option<GroupsAction>,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// List your rules
    List,

    /// Add a new rule
    Add {
        /// Category to assign when the rule matches
        category: String,
        /// Keywords to look for in transaction descriptions
        #[arg(required = true)]
        keywords: Vec<String>,
    },

    /// Delete a rule
    Delete {
        /// Rule ID to delete
        id: i64,
    },

    /// Show which category a description would get, and why
    Test {
        /// Description to test
        description: String,
    },

    /// Suggest rule keywords for a description
    Suggest {
        /// Description to extract keywords from
        description: String,
    },
}

#[derive(Subcommand)]
pub enum GroupsAction {
    /// List transaction groups, newest first
    List,

    /// Show the transactions in a group
    Show {
        /// Group ID
        id: i64,
    },

    /// Move transactions to another category
    Recategorize {
        /// Category name (case-insensitive)
        #[arg(short, long)]
        category: String,

        /// Transaction IDs (see `kasboek groups show`)
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Remove individual transactions
    RemoveTransactions {
        /// Transaction IDs (see `kasboek groups show`)
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Delete a group and all of its transactions
    Delete {
        /// Group ID
        id: i64,
    },
}
