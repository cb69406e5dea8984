//! Keyword hit scoring
//!
//! Decides which intent wins and how confident we are about it.

use crate::intent::models::IntentType;

/// Each keyword hit is worth this many confidence points
const POINTS_PER_HIT: usize = 25;

/// Keyword hits per intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentScores {
    pub task: usize,
    pub finance: usize,
    pub goal: usize,
}

impl IntentScores {
    pub fn total(&self) -> usize {
        self.task + self.finance + self.goal
    }
}

/// Scoring outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub intent_type: IntentType,
    pub hits: usize,
    /// No keyword matched, or two intents tied for first
    pub ambiguous: bool,
}

/// Scorer for intent classification
pub struct Scorer;

impl Scorer {
    /// Pick the winning intent
    ///
    /// Finance or goal must strictly beat both other intents.
    /// Everything else, ties included, falls back to task.
    pub fn pick(scores: &IntentScores) -> Verdict {
        let IntentScores {
            task,
            finance,
            goal,
        } = *scores;

        if finance > task && finance > goal {
            return Verdict {
                intent_type: IntentType::Finance,
                hits: finance,
                ambiguous: false,
            };
        }

        if goal > task && goal > finance {
            return Verdict {
                intent_type: IntentType::Goal,
                hits: goal,
                ambiguous: false,
            };
        }

        let best = task.max(finance).max(goal);
        let tied = [task, finance, goal].iter().filter(|h| **h == best).count() > 1;

        Verdict {
            intent_type: IntentType::Task,
            hits: best,
            ambiguous: best == 0 || tied,
        }
    }

    /// `min(hits * 25, 100)`
    pub fn confidence(hits: usize) -> u8 {
        hits.saturating_mul(POINTS_PER_HIT).min(100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(task: usize, finance: usize, goal: usize) -> IntentScores {
        IntentScores {
            task,
            finance,
            goal,
        }
    }

    #[test]
    fn test_strict_winner() {
        let verdict = Scorer::pick(&scores(0, 1, 0));
        assert_eq!(verdict.intent_type, IntentType::Finance);
        assert_eq!(verdict.hits, 1);
        assert!(!verdict.ambiguous);

        let verdict = Scorer::pick(&scores(1, 0, 2));
        assert_eq!(verdict.intent_type, IntentType::Goal);
        assert_eq!(verdict.hits, 2);
    }

    #[test]
    fn test_task_wins_its_own_lead() {
        let verdict = Scorer::pick(&scores(3, 1, 0));
        assert_eq!(verdict.intent_type, IntentType::Task);
        assert_eq!(verdict.hits, 3);
        assert!(!verdict.ambiguous);
    }

    #[test]
    fn test_ties_default_to_task() {
        let verdict = Scorer::pick(&scores(0, 2, 2));
        assert_eq!(verdict.intent_type, IntentType::Task);
        assert_eq!(verdict.hits, 2);
        assert!(verdict.ambiguous);

        let verdict = Scorer::pick(&scores(1, 1, 0));
        assert_eq!(verdict.intent_type, IntentType::Task);
        assert!(verdict.ambiguous);
    }

    #[test]
    fn test_no_hits() {
        let verdict = Scorer::pick(&IntentScores::default());
        assert_eq!(verdict.intent_type, IntentType::Task);
        assert_eq!(verdict.hits, 0);
        assert!(verdict.ambiguous);
    }

    #[test]
    fn test_confidence() {
        assert_eq!(Scorer::confidence(0), 0);
        assert_eq!(Scorer::confidence(1), 25);
        assert_eq!(Scorer::confidence(3), 75);
        assert_eq!(Scorer::confidence(4), 100);
        assert_eq!(Scorer::confidence(9), 100);
    }
}
