//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, resolve_user)
//! - `import` - CSV import with dry-run and JSON output
//! - `categories` - Category listing
//! - `rules` - Categorization rule management
//! - `groups` - Transaction group browsing and cleanup

pub mod categories;
pub mod core;
pub mod groups;
pub mod import;
pub mod rules;

// Re-export command functions for main.rs
pub use categories::*;
pub use core::*;
pub use groups::*;
pub use import::*;
pub use rules::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
