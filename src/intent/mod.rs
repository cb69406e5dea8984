//! Intent module
//!
//! Classifies quick-add phrases into tasks, finance entries and goal steps.

pub mod amount;
pub mod category;
pub mod date;
pub mod keywords;
pub mod models;
pub mod parser;
pub mod scorer;

pub use amount::{AmountExtractor, MAX_AMOUNT};
pub use date::DateExtractor;
pub use models::{IntentData, IntentType, ParsedIntent, Priority, Subtype};
pub use parser::{IntentParser, MAX_INPUT_CHARS};
pub use scorer::{IntentScores, Scorer, Verdict};
