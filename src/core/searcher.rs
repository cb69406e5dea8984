//! Fuzzy search over tasks and goals
//!
//! Lets the user find "hisobot" by typing "hsbt".

use crate::db::models::{Goal, Task};
use crate::db::Database;
use crate::error::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;
use std::sync::Arc;

/// Something a search can find
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum SearchItem {
    Task(Task),
    Goal(Goal),
}

impl SearchItem {
    /// Text the query is matched against
    pub fn label(&self) -> &str {
        match self {
            SearchItem::Task(task) => &task.title,
            SearchItem::Goal(goal) => &goal.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub item: SearchItem,
    pub score: i64, // Fuzzy match score
}

/// Handles searching with fuzzy matching
pub struct Searcher {
    db: Arc<Database>,
    matcher: SkimMatcherV2,
}

impl Searcher {
    /// Create a new searcher instance
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Search task titles (finished ones too) and goal names
    ///
    /// # Arguments
    /// * `query` - Search query
    /// * `limit` - Maximum results to return
    ///
    /// # Returns
    /// * `Ok(Vec<SearchResult>)` - Search results sorted by score
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let tasks = self.db.list_tasks(true).await?;
        let goals = self.db.list_goals().await?;

        let candidates = tasks
            .into_iter()
            .map(SearchItem::Task)
            .chain(goals.into_iter().map(SearchItem::Goal));

        let mut results: Vec<SearchResult> = candidates
            .filter_map(|item| {
                self.matcher
                    .fuzzy_match(item.label(), query)
                    .map(|score| SearchResult { item, score })
            })
            .collect();

        // Highest score first, stable for equal scores
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(limit);

        Ok(results)
    }
}
