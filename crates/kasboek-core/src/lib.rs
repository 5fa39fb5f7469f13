//! Kasboek Core Library
//!
//! Bank statement ingestion for the Kasboek budgeting tool:
//! - Database access, migrations and system category seeding
//! - CSV import with delimiter detection and European field decoding
//! - Atomic row validation (all rows valid or nothing imported)
//! - Keyword categorization engine (user rules, then system rules)
//! - First-use category bootstrap per user
//! - Import orchestration with a per-batch summary

pub mod bootstrap;
pub mod categorize;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod ingest;
pub mod models;
pub mod store;

pub use bootstrap::ensure_user_has_categories;
pub use categorize::{extract_keywords, CategoryMatch, CategoryMatcher, MatchSource};
pub use config::{ColumnMapping, ImportProfile};
pub use db::Database;
pub use error::{Error, FormatError, Result, RowError, ValidationErrors};
pub use ingest::{ImportPreview, Importer};
pub use store::{CategoryStore, RuleReader, TransactionWriter};
