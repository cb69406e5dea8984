//! Validation helpers for records created from quick-add text
//!
//! Each validator collects every problem it finds into a field -> message
//! map instead of stopping at the first one.

use crate::db::models::{GoalInput, TaskInput, TransactionInput};
use crate::error::{InFastError, Result};
use crate::intent::{MAX_AMOUNT, MAX_INPUT_CHARS};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Longest task title we store, a whole unrecognized quick-add line must fit
pub const MAX_TITLE_CHARS: usize = MAX_INPUT_CHARS;

/// Field name -> error message
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem with a field; the first message per field is kept
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(InFastError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Check a task before it is stored
pub fn validate_task(input: &TaskInput) -> Result<()> {
    let mut errors = ValidationErrors::new();

    let title = input.title.trim();
    if title.is_empty() {
        errors.add("title", "Title is required");
    } else if title.chars().count() > MAX_TITLE_CHARS {
        errors.add(
            "title",
            &format!("Title must be at most {} characters", MAX_TITLE_CHARS),
        );
    }

    errors.into_result()
}

/// Check an income or expense before it is stored
pub fn validate_transaction(input: &TransactionInput) -> Result<()> {
    let mut errors = ValidationErrors::new();

    if input.amount <= 0 {
        errors.add("amount", "Amount must be greater than zero");
    } else if input.amount > MAX_AMOUNT {
        errors.add("amount", "Amount is too large");
    }
    if input.category.trim().is_empty() {
        errors.add("category", "Category is required");
    }

    errors.into_result()
}

/// Check a new goal
///
/// # Arguments
/// * `input` - Goal to create
/// * `today` - Deadlines before this date are rejected
pub fn validate_goal(input: &GoalInput, today: NaiveDate) -> Result<()> {
    let mut errors = ValidationErrors::new();

    if input.name.trim().is_empty() {
        errors.add("name", "Goal name is required");
    }
    match input.target_amount {
        Some(t) if t <= 0 => errors.add("target_amount", "Target must be greater than zero"),
        Some(t) if t > MAX_AMOUNT => errors.add("target_amount", "Target is too large"),
        _ => {}
    }
    if input.deadline.is_some_and(|d| d < today) {
        errors.add("deadline", "Deadline cannot be in the past");
    }

    errors.into_result()
}
