//! Core functionality modules
//!
//! Contains the main business logic: applying quick-adds, validating
//! records, building summaries and searching.

pub mod envelope;
pub mod quick_add;
pub mod searcher;
pub mod summary;
pub mod validation;

pub use envelope::Envelope;
pub use quick_add::{Applied, QuickAdd, QuickAddOutcome};
pub use searcher::{SearchItem, SearchResult, Searcher};
pub use summary::{FinanceSummary, GoalProgress, Summary};
pub use validation::ValidationErrors;
