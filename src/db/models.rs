//! Data models for database entities
//!
//! All models map to database tables and use sqlx for type-safe queries.
//! Dates are stored as `YYYY-MM-DD` text, timestamps as SQLite's CURRENT_TIMESTAMP.

use crate::intent::Priority;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// A to-do item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub priority: String, // 'low', 'medium', 'high'
    pub deadline: Option<String>,
    pub completed: bool,
    pub created_at: String,
}

impl Task {
    pub fn priority(&self) -> Priority {
        self.priority.parse().unwrap_or_default()
    }

    pub fn deadline_date(&self) -> Option<NaiveDate> {
        parse_date(self.deadline.as_deref())
    }

    /// Past its deadline and still open
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.deadline_date().is_some_and(|d| d < today)
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
}

/// Direction of a money movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("Unknown transaction kind '{}'", other)),
        }
    }
}

/// A recorded income or expense
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub kind: String, // 'income', 'expense'
    pub amount: i64,
    pub category: String,
    pub description: String,
    pub occurred_on: String,
    pub created_at: String,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        self.kind.parse().unwrap_or(TransactionKind::Expense)
    }

    /// Amount with sign: income positive, expense negative
    pub fn signed_amount(&self) -> i64 {
        match self.kind() {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// Input for recording a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    pub kind: TransactionKind,
    pub amount: i64,
    pub category: String,
    pub description: String,
    pub occurred_on: NaiveDate,
}

/// A savings goal, filled step by step
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_amount: Option<i64>,
    pub current_amount: i64,
    pub deadline: Option<String>,
    pub created_at: String,
}

impl Goal {
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        parse_date(self.deadline.as_deref())
    }

    /// How much is still missing, None without a target
    pub fn remaining(&self) -> Option<i64> {
        self.target_amount
            .map(|target| (target - self.current_amount).max(0))
    }
}

/// Input for creating a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalInput {
    pub name: String,
    pub target_amount: Option<i64>,
    pub deadline: Option<NaiveDate>,
}

/// One contribution toward a goal
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GoalStep {
    pub id: i64,
    pub goal_id: i64,
    pub amount: i64,
    pub note: Option<String>,
    pub created_at: String,
}

/// History row for every applied quick-add
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuickAddEntry {
    pub id: i64,
    pub input: String,
    pub intent_type: String,
    pub subtype: String,
    pub confidence: i64,
    pub created_at: String,
}

/// User preference
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Preference {
    pub key: String,
    pub value: String,
}
