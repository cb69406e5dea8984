//! Parser output types
//!
//! Serialized shape matches what the quick-add UI expects:
//! `{type, subtype, confidence, data: {...}}`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What kind of record a phrase turns into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    Task,
    Finance,
    Goal,
    Unknown,
}

impl std::fmt::Display for IntentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IntentType::Task => "task",
            IntentType::Finance => "finance",
            IntentType::Goal => "goal",
            IntentType::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for IntentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "task" | "vazifa" => Ok(IntentType::Task),
            "finance" | "moliya" => Ok(IntentType::Finance),
            "goal" | "maqsad" => Ok(IntentType::Goal),
            other => Err(format!(
                "Unknown type '{}'. Valid types: task, finance, goal",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Subtype {
    Create,
    Expense,
    Income,
    Update,
    None,
}

impl std::fmt::Display for Subtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Subtype::Create => "create",
            Subtype::Expense => "expense",
            Subtype::Income => "income",
            Subtype::Update => "update",
            Subtype::None => "none",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Unknown priority '{}'", other)),
        }
    }
}

/// Fields extracted from the phrase
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IntentData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_name: Option<String>,
}

/// Best-effort classification of one quick-add phrase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedIntent {
    #[serde(rename = "type")]
    pub intent_type: IntentType,
    pub subtype: Subtype,
    /// 0-100, see `Scorer::confidence`
    pub confidence: u8,
    pub data: IntentData,
    /// Set when the caller should let the user pick the type by hand
    pub needs_confirmation: bool,
}
