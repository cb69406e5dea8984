//! SQL query functions for database operations
//!
//! All queries use sqlx with bound parameters.

use crate::db::models::*;
use crate::db::Database;
use crate::error::{InFastError, Result};
use crate::intent::ParsedIntent;
use chrono::NaiveDate;
use sqlx::Row;

impl Database {
    /// Insert a new task
    ///
    /// # Returns
    /// * `Ok(i64)` - The task ID
    pub async fn insert_task(&self, input: &TaskInput) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO tasks (title, priority, deadline)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(input.priority.to_string())
        .bind(input.deadline.map(|d| d.to_string()))
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// List tasks, open ones first, earliest deadline first
    ///
    /// # Arguments
    /// * `include_completed` - Also return finished tasks
    pub async fn list_tasks(&self, include_completed: bool) -> Result<Vec<Task>> {
        let tasks = if include_completed {
            sqlx::query_as::<_, Task>(
                "SELECT * FROM tasks ORDER BY completed, deadline IS NULL, deadline, id",
            )
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, Task>(
                "SELECT * FROM tasks WHERE completed = 0 ORDER BY deadline IS NULL, deadline, id",
            )
            .fetch_all(self.pool())
            .await?
        };

        Ok(tasks)
    }

    /// Get task by ID
    pub async fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(task)
    }

    /// Mark a task as done
    pub async fn complete_task(&self, id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE tasks SET completed = 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(InFastError::TaskNotFound(id));
        }

        Ok(())
    }

    /// Record an income or expense
    pub async fn insert_transaction(&self, input: &TransactionInput) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (kind, amount, category, description, occurred_on)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(input.kind.to_string())
        .bind(input.amount)
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.occurred_on.to_string())
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Transactions in a date range, newest first
    ///
    /// # Arguments
    /// * `from` - Inclusive lower bound, None for no bound
    /// * `to` - Inclusive upper bound, None for no bound
    pub async fn list_transactions(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>> {
        let from = from.map(|d| d.to_string());
        let to = to.map(|d| d.to_string());

        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE (? IS NULL OR occurred_on >= ?)
              AND (? IS NULL OR occurred_on <= ?)
            ORDER BY occurred_on DESC, id DESC
            "#,
        )
        .bind(&from)
        .bind(&from)
        .bind(&to)
        .bind(&to)
        .fetch_all(self.pool())
        .await?;

        Ok(transactions)
    }

    /// Create a goal
    pub async fn insert_goal(&self, input: &GoalInput) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO goals (name, target_amount, deadline)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(input.target_amount)
        .bind(input.deadline.map(|d| d.to_string()))
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// All goals, oldest first
    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        let goals = sqlx::query_as::<_, Goal>("SELECT * FROM goals ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        Ok(goals)
    }

    /// Goal names, fed to the parser so it can recognize them in text
    pub async fn goal_names(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT name FROM goals ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        Ok(rows.iter().map(|row| row.get::<String, _>(0)).collect())
    }

    /// Case-insensitive goal lookup
    pub async fn find_goal_by_name(&self, name: &str) -> Result<Option<Goal>> {
        let goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE name = ? COLLATE NOCASE")
            .bind(name.trim())
            .fetch_optional(self.pool())
            .await?;

        Ok(goal)
    }

    /// Add a contribution to a goal and bump its running total
    ///
    /// # Returns
    /// * `Ok(i64)` - The new `current_amount` of the goal
    pub async fn add_goal_step(
        &self,
        goal_id: i64,
        amount: i64,
        note: Option<String>,
    ) -> Result<i64> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("INSERT INTO goal_steps (goal_id, amount, note) VALUES (?, ?, ?)")
            .bind(goal_id)
            .bind(amount)
            .bind(note)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            "UPDATE goals SET current_amount = current_amount + ? WHERE id = ? RETURNING current_amount",
        )
        .bind(amount)
        .bind(goal_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(InFastError::GoalNotFound(goal_id.to_string()));
        };

        tx.commit().await?;
        Ok(row.get(0))
    }

    /// Steps of one goal, oldest first
    pub async fn goal_steps(&self, goal_id: i64) -> Result<Vec<GoalStep>> {
        let steps = sqlx::query_as::<_, GoalStep>(
            "SELECT * FROM goal_steps WHERE goal_id = ? ORDER BY id",
        )
        .bind(goal_id)
        .fetch_all(self.pool())
        .await?;

        Ok(steps)
    }

    /// Remember what a quick-add phrase was turned into
    pub async fn log_quick_add(&self, input: &str, intent: &ParsedIntent) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO quick_add_log (input, intent_type, subtype, confidence)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(input)
        .bind(intent.intent_type.to_string())
        .bind(intent.subtype.to_string())
        .bind(intent.confidence as i64)
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Latest quick-add history rows
    pub async fn recent_quick_adds(&self, limit: i64) -> Result<Vec<QuickAddEntry>> {
        let entries = sqlx::query_as::<_, QuickAddEntry>(
            "SELECT * FROM quick_add_log ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(entries)
    }

    /// Get a preference
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let pref = sqlx::query_as::<_, Preference>("SELECT * FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;

        Ok(pref.map(|p| p.value))
    }

    /// Set a preference
    pub async fn set_preference(&self, key: String, value: String) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO preferences (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// All preferences, sorted by key
    pub async fn list_preferences(&self) -> Result<Vec<Preference>> {
        let prefs = sqlx::query_as::<_, Preference>("SELECT * FROM preferences ORDER BY key")
            .fetch_all(self.pool())
            .await?;

        Ok(prefs)
    }
}
