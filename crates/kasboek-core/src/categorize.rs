//! Category assignment engine
//!
//! Transactions are categorized by keyword rules matched against their
//! description. Priority: user rules → system rules → the user's
//! uncategorized category.
//!
//! Within each tier, rules are tried in descending order of their longest
//! keyword, so "Amazon Prime Video" is tried before "Amazon" regardless of
//! which rule was created first. Rules with equally long keywords keep their
//! input order. A rule's keywords are regex-escaped and combined into one
//! case-insensitive alternation, so any keyword occurring anywhere in the
//! description matches.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Category, CategoryRule, SystemCategory, SystemCategoryRule, UserId};
use crate::store::{CategoryStore, RuleReader};

/// Which tier produced a category assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    UserRule { rule_id: i64 },
    SystemRule { rule_id: i64 },
    Fallback,
}

/// A category assignment and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMatch {
    pub category_id: i64,
    pub source: MatchSource,
}

#[derive(Debug)]
struct CompiledRule {
    rule_id: i64,
    /// User category id for user rules, system category id for system rules
    target: i64,
    pattern: Option<Regex>,
    longest: usize,
}

impl CompiledRule {
    fn new(rule_id: i64, target: i64, keywords: &[String]) -> Self {
        Self {
            rule_id,
            target,
            pattern: keyword_pattern(rule_id, keywords),
            longest: longest_keyword_len(keywords),
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|re| re.is_match(name))
            .unwrap_or(false)
    }
}

/// Length in characters of the longest non-blank keyword (0 if none)
pub fn longest_keyword_len(keywords: &[String]) -> usize {
    usable_keywords(keywords)
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0)
}

fn usable_keywords(keywords: &[String]) -> impl Iterator<Item = &String> {
    keywords.iter().filter(|k| !k.trim().is_empty())
}

/// Build the escaped, case-insensitive alternation for a rule's keywords
fn keyword_pattern(rule_id: i64, keywords: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = usable_keywords(keywords)
        .map(|k| regex::escape(k))
        .collect();

    if alternatives.is_empty() {
        return None;
    }

    match RegexBuilder::new(&alternatives.join("|"))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Skipping rule #{}: keywords do not compile: {}", rule_id, e);
            None
        }
    }
}

fn sort_by_longest_keyword(rules: &mut [CompiledRule]) {
    // sort_by is stable: equal lengths keep input order
    rules.sort_by(|a, b| b.longest.cmp(&a.longest));
}

/// Precompiled rule tiers for one user
#[derive(Debug)]
pub struct CategoryMatcher {
    user_rules: Vec<CompiledRule>,
    system_rules: Vec<CompiledRule>,
    user_categories_by_system_id: HashMap<i64, i64>,
    uncategorized_id: i64,
}

impl CategoryMatcher {
    pub fn new(
        user_rules: &[CategoryRule],
        system_rules: &[SystemCategoryRule],
        user_categories_by_system_id: HashMap<i64, i64>,
        uncategorized_id: i64,
    ) -> Self {
        let mut user: Vec<CompiledRule> = user_rules
            .iter()
            .map(|r| CompiledRule::new(r.id, r.category_id, &r.keywords))
            .collect();
        let mut system: Vec<CompiledRule> = system_rules
            .iter()
            .map(|r| CompiledRule::new(r.id, r.system_category_id, &r.keywords))
            .collect();

        sort_by_longest_keyword(&mut user);
        sort_by_longest_keyword(&mut system);

        Self {
            user_rules: user,
            system_rules: system,
            user_categories_by_system_id,
            uncategorized_id,
        }
    }

    /// Load a user's rules and categories from storage
    ///
    /// Any lookup failure, including a missing fallback category, is
    /// reported as [`Error::Category`].
    pub fn load(
        rules: &dyn RuleReader,
        categories: &dyn CategoryStore,
        user: &UserId,
    ) -> Result<Self> {
        let user_rules = category_lookup("user rules", rules.user_rules(user))?;
        let system_rules = category_lookup("system rules", rules.system_rules())?;
        let user_categories =
            category_lookup("user categories", categories.user_categories(user))?;
        let default = category_lookup(
            "default system category",
            categories.default_system_category(),
        )?;

        let uncategorized_id = resolve_uncategorized_id(&default, &user_categories)?;

        debug!(
            "Loaded {} user rules and {} system rules for {}",
            user_rules.len(),
            system_rules.len(),
            user
        );

        Ok(Self::new(
            &user_rules,
            &system_rules,
            categories_by_system_id(&user_categories),
            uncategorized_id,
        ))
    }

    /// Categorize one description, reporting which tier matched
    pub fn explain(&self, name: &str) -> CategoryMatch {
        let normalized = name.to_lowercase();

        if let Some(rule) = self.user_rules.iter().find(|r| r.matches(&normalized)) {
            debug!("User rule #{} matched '{}'", rule.rule_id, name);
            return CategoryMatch {
                category_id: rule.target,
                source: MatchSource::UserRule {
                    rule_id: rule.rule_id,
                },
            };
        }

        for rule in &self.system_rules {
            if !rule.matches(&normalized) {
                continue;
            }
            match self.user_categories_by_system_id.get(&rule.target) {
                Some(&category_id) => {
                    debug!("System rule #{} matched '{}'", rule.rule_id, name);
                    return CategoryMatch {
                        category_id,
                        source: MatchSource::SystemRule {
                            rule_id: rule.rule_id,
                        },
                    };
                }
                None => debug!(
                    "System rule #{} matched '{}' but user has no category for system category {}",
                    rule.rule_id, name, rule.target
                ),
            }
        }

        debug!("No rule matched '{}', using uncategorized", name);
        CategoryMatch {
            category_id: self.uncategorized_id,
            source: MatchSource::Fallback,
        }
    }

    pub fn category_for(&self, name: &str) -> i64 {
        self.explain(name).category_id
    }
}

/// Assign a category id to every name, in input order
pub fn categorize<S: AsRef<str>>(
    names: &[S],
    user_rules: &[CategoryRule],
    system_rules: &[SystemCategoryRule],
    user_categories_by_system_id: HashMap<i64, i64>,
    uncategorized_id: i64,
) -> Vec<i64> {
    let matcher = CategoryMatcher::new(
        user_rules,
        system_rules,
        user_categories_by_system_id,
        uncategorized_id,
    );
    names
        .iter()
        .map(|name| matcher.category_for(name.as_ref()))
        .collect()
}

/// Map system category id → the user's category materialized from it
pub fn categories_by_system_id(categories: &[Category]) -> HashMap<i64, i64> {
    categories
        .iter()
        .filter_map(|c| c.system_category_id.map(|sys| (sys, c.id)))
        .collect()
}

/// Find the user's category linked to the default system category
pub fn resolve_uncategorized_id(default: &SystemCategory, categories: &[Category]) -> Result<i64> {
    let linked: Vec<&Category> = categories
        .iter()
        .filter(|c| c.system_category_id == Some(default.id))
        .collect();

    match linked.as_slice() {
        [category] => Ok(category.id),
        [] => Err(Error::Category(format!(
            "no category linked to default system category '{}'",
            default.name
        ))),
        many => Err(Error::Category(format!(
            "{} categories linked to default system category '{}'",
            many.len(),
            default.name
        ))),
    }
}

/// Suggest rule keywords from a description: its first three, two and one words
pub fn extract_keywords(name: &str) -> Vec<String> {
    let words: Vec<&str> = name.split_whitespace().collect();
    let mut keywords: Vec<String> = Vec::new();

    for count in (1..=words.len().min(3)).rev() {
        let phrase = words[..count].join(" ");
        if !keywords.contains(&phrase) {
            keywords.push(phrase);
        }
    }
    keywords
}

fn category_lookup<T>(what: &str, result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        Error::Category(_) => e,
        other => Error::Category(format!("failed to load {}: {}", what, other)),
    })
}
