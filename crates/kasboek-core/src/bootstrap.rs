//! First-use seeding of a user's categories from the system categories

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{NewCategory, SystemCategory, UserId};
use crate::store::CategoryStore;

/// Color for categories whose name is not in [`CATEGORY_COLORS`]
pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

/// Display colors for the built-in category names
pub const CATEGORY_COLORS: [(&str, &str); 10] = [
    ("Groceries", "#22c55e"),
    ("Utilities", "#f59e0b"),
    ("Mortgage/Rent", "#8b5cf6"),
    ("Income", "#10b981"),
    ("Dining Out", "#f43f5e"),
    ("Uncategorized", "#6b7280"),
    ("Transport", "#3b82f6"),
    ("Entertainment", "#ec4899"),
    ("Healthcare", "#14b8a6"),
    ("Shopping", "#a855f7"),
];

pub fn category_color(name: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

/// One new user category per system category, linked back to it
pub fn plan_default_categories(system_categories: &[SystemCategory]) -> Vec<NewCategory> {
    system_categories
        .iter()
        .map(|sc| NewCategory {
            system_category_id: Some(sc.id),
            name: sc.name.clone(),
            icon: sc.icon.clone(),
            color: category_color(&sc.name).to_string(),
        })
        .collect()
}

/// Give `user` a copy of every system category unless they already own one
///
/// Safe to call concurrently: the store creates the set atomically, so a
/// user always converges to exactly one category per system category.
/// Returns how many categories were created (0 if the user already had some).
pub fn ensure_user_has_categories(store: &dyn CategoryStore, user: &UserId) -> Result<usize> {
    if !store.user_categories(user)?.is_empty() {
        debug!("User {} already has categories", user);
        return Ok(0);
    }

    let planned = plan_default_categories(&store.system_categories()?);
    let created = store.create_initial_categories(user, &planned)?;

    if created > 0 {
        info!("Created {} default categories for {}", created, user);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_color() {
        assert_eq!(category_color("Groceries"), "#22c55e");
        assert_eq!(category_color("Dining Out"), "#f43f5e");
        assert_eq!(category_color("Pets"), DEFAULT_CATEGORY_COLOR);
        assert_eq!(category_color("groceries"), DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn test_plan_default_categories() {
        let system = vec![
            SystemCategory {
                id: 1,
                name: "Groceries".to_string(),
                icon: "shopping-cart".to_string(),
                is_default: false,
            },
            SystemCategory {
                id: 2,
                name: "Pets".to_string(),
                icon: "paw".to_string(),
                is_default: false,
            },
        ];

        let planned = plan_default_categories(&system);
        assert_eq!(
            planned,
            vec![
                NewCategory {
                    system_category_id: Some(1),
                    name: "Groceries".to_string(),
                    icon: "shopping-cart".to_string(),
                    color: "#22c55e".to_string(),
                },
                NewCategory {
                    system_category_id: Some(2),
                    name: "Pets".to_string(),
                    icon: "paw".to_string(),
                    color: DEFAULT_CATEGORY_COLOR.to_string(),
                },
            ]
        );
    }
}
