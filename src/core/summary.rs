//! Finance totals and goal progress for the summary screens

use crate::db::models::{Goal, GoalStep, Transaction, TransactionKind};
use crate::db::Database;
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub kind: TransactionKind,
    pub category: String,
    pub total: i64,
    pub count: usize,
}

/// Income and expense over a set of transactions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinanceSummary {
    pub income: i64,
    pub expense: i64,
    /// income - expense
    pub balance: i64,
    /// Largest total first
    pub by_category: Vec<CategoryTotal>,
}

/// Fold transactions into totals
pub fn summarize(transactions: &[Transaction]) -> FinanceSummary {
    let mut summary = FinanceSummary::default();
    let mut groups: BTreeMap<(TransactionKind, &str), (i64, usize)> = BTreeMap::new();

    for tx in transactions {
        let kind = tx.kind();
        // totals saturate, they never overflow
        match kind {
            TransactionKind::Income => {
                summary.income = summary.income.saturating_add(tx.amount);
            }
            TransactionKind::Expense => {
                summary.expense = summary.expense.saturating_add(tx.amount);
            }
        }
        summary.balance = summary.balance.saturating_add(tx.signed_amount());

        let entry = groups.entry((kind, tx.category.as_str())).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(tx.amount);
        entry.1 += 1;
    }

    summary.by_category = groups
        .into_iter()
        .map(|((kind, category), (total, count))| CategoryTotal {
            kind,
            category: category.to_string(),
            total,
            count,
        })
        .collect();
    summary.by_category.sort_by(|a, b| b.total.cmp(&a.total));

    summary
}

/// A goal with its contributions
#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub goal: Goal,
    /// None when the goal has no target
    pub percent: Option<u8>,
    pub steps: Vec<GoalStep>,
}

pub fn goal_progress(goal: Goal, steps: Vec<GoalStep>) -> GoalProgress {
    let percent = goal
        .target_amount
        .filter(|target| *target > 0)
        .map(|target| {
            let percent = i128::from(goal.current_amount.max(0)) * 100 / i128::from(target);
            percent.min(100) as u8
        });

    GoalProgress {
        goal,
        percent,
        steps,
    }
}

/// Reads stored records and builds summaries
pub struct Summary {
    db: Arc<Database>,
}

impl Summary {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Totals between two dates, both inclusive and optional
    pub async fn finance(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<FinanceSummary> {
        let transactions = self.db.list_transactions(from, to).await?;
        Ok(summarize(&transactions))
    }

    /// Every goal with its progress
    pub async fn goals(&self) -> Result<Vec<GoalProgress>> {
        let goals = self.db.list_goals().await?;

        let mut progress = Vec::with_capacity(goals.len());
        for goal in goals {
            let steps = self.db.goal_steps(goal.id).await?;
            progress.push(goal_progress(goal, steps));
        }

        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{GoalInput, TransactionInput};

    fn tx(kind: &str, amount: i64, category: &str) -> Transaction {
        Transaction {
            id: 0,
            kind: kind.to_string(),
            amount,
            category: category.to_string(),
            description: String::new(),
            occurred_on: "2025-03-12".to_string(),
            created_at: "2025-03-12 09:00:00".to_string(),
        }
    }

    fn goal(target: Option<i64>, current: i64) -> Goal {
        Goal {
            id: 1,
            name: "Kompyuter".to_string(),
            target_amount: target,
            current_amount: current,
            deadline: None,
            created_at: "2025-03-12 09:00:00".to_string(),
        }
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[
            tx("expense", 25_000, "Transport"),
            tx("expense", 15_000, "Transport"),
            tx("expense", 60_000, "Kafe"),
            tx("income", 5_000_000, "Maosh"),
        ]);

        assert_eq!(summary.income, 5_000_000);
        assert_eq!(summary.expense, 100_000);
        assert_eq!(summary.balance, 4_900_000);

        assert_eq!(summary.by_category.len(), 3);
        assert_eq!(summary.by_category[0].category, "Maosh");
        assert_eq!(summary.by_category[1].category, "Kafe");

        let transport = &summary.by_category[2];
        assert_eq!(transport.total, 40_000);
        assert_eq!(transport.count, 2);
    }

    #[test]
    fn test_summarize_saturates() {
        let summary = summarize(&[
            tx("expense", i64::MAX - 10, "Transport"),
            tx("expense", i64::MAX - 10, "Transport"),
            tx("income", 100, "Maosh"),
        ]);

        assert_eq!(summary.expense, i64::MAX);
        assert_eq!(summary.income, 100);
        assert_eq!(summary.balance, i64::MIN + 100);
        assert_eq!(summary.by_category[0].total, i64::MAX);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), FinanceSummary::default());
    }

    #[test]
    fn test_goal_percent() {
        assert_eq!(goal_progress(goal(Some(8_000_000), 2_000_000), vec![]).percent, Some(25));
        assert_eq!(goal_progress(goal(Some(100), 250), vec![]).percent, Some(100));
        assert_eq!(goal_progress(goal(None, 250), vec![]).percent, None);
        // current * 100 does not fit in i64
        assert_eq!(
            goal_progress(goal(Some(i64::MAX), i64::MAX / 2), vec![]).percent,
            Some(49)
        );
        assert_eq!(goal_progress(goal(Some(1_000), i64::MAX), vec![]).percent, Some(100));
    }

    #[tokio::test]
    async fn test_summary_from_store() {
        let db = Arc::new(Database::new_test().await.unwrap());
        let on = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();

        db.insert_transaction(&TransactionInput {
            kind: TransactionKind::Expense,
            amount: 25_000,
            category: "Transport".to_string(),
            description: "Taksi".to_string(),
            occurred_on: on,
        })
        .await
        .unwrap();
        let id = db
            .insert_goal(&GoalInput {
                name: "Kompyuter".to_string(),
                target_amount: Some(1_000_000),
                deadline: None,
            })
            .await
            .unwrap();
        db.add_goal_step(id, 100_000, None).await.unwrap();

        let summary = Summary::new(Arc::clone(&db));

        let finance = summary.finance(None, None).await.unwrap();
        assert_eq!(finance.balance, -25_000);

        let later = summary
            .finance(on.succ_opt(), None)
            .await
            .unwrap();
        assert_eq!(later.expense, 0);

        let goals = summary.goals().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].percent, Some(10));
        assert_eq!(goals[0].steps.len(), 1);
    }
}
