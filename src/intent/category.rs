// Category and priority lookup
//
// Both are plain dictionary scans over the keyword tables.

use crate::intent::keywords::{
    has_keyword, DEFAULT_CATEGORY, EXPENSE_CATEGORIES, HIGH_PRIORITY_KEYWORDS, INCOME_CATEGORIES,
    LOW_PRIORITY_KEYWORDS,
};
use crate::intent::models::{Priority, Subtype};

/// Finance category for an expense or income phrase
pub fn detect_category(normalized: &str, tokens: &[&str], subtype: Subtype) -> String {
    let dictionary = match subtype {
        Subtype::Income => INCOME_CATEGORIES,
        _ => EXPENSE_CATEGORIES,
    };

    dictionary
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| has_keyword(normalized, tokens, k)))
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

/// High beats low, nothing means medium
pub fn detect_priority(normalized: &str, tokens: &[&str]) -> Priority {
    let any = |list: &[&str]| list.iter().any(|k| has_keyword(normalized, tokens, k));

    if any(HIGH_PRIORITY_KEYWORDS) {
        Priority::High
    } else if any(LOW_PRIORITY_KEYWORDS) {
        Priority::Low
    } else {
        Priority::Medium
    }
}
