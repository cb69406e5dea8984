// Quick-add service: one line of text in, one stored record out
//
// Checks the text, cleans it up, parses it against the user's goals and
// writes whatever it turned out to be.

use crate::core::validation::{validate_goal, validate_task, validate_transaction, ValidationErrors};
use crate::db::models::{GoalInput, TaskInput, TransactionInput, TransactionKind};
use crate::db::Database;
use crate::error::{InFastError, Result};
use crate::intent::keywords::DEFAULT_CATEGORY;
use crate::intent::{IntentParser, IntentType, ParsedIntent, Subtype, MAX_INPUT_CHARS};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// What got written for a quick-add
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Applied {
    Task { id: i64 },
    Transaction { id: i64 },
    GoalCreated { id: i64 },
    GoalStep { goal_id: i64, current_amount: i64 },
}

/// Parse result plus the record it produced
#[derive(Debug, Clone, Serialize)]
pub struct QuickAddOutcome {
    pub intent: ParsedIntent,
    pub applied: Applied,
}

pub struct QuickAdd {
    db: Arc<Database>,
    parser: IntentParser,
}

impl QuickAdd {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self {
            db,
            parser: IntentParser::new()?,
        })
    }

    /// Parse without writing anything
    pub async fn preview(&self, text: &str) -> Result<ParsedIntent> {
        self.preview_on(text, today()).await
    }

    pub async fn preview_on(&self, text: &str, today: NaiveDate) -> Result<ParsedIntent> {
        let text = self.prepare(text)?;
        let goals = self.db.goal_names().await?;
        Ok(self.parser.parse_on(&text, &goals, today))
    }

    /// Parse and store
    pub async fn submit(&self, text: &str) -> Result<QuickAddOutcome> {
        self.submit_on(text, today()).await
    }

    pub async fn submit_on(&self, text: &str, today: NaiveDate) -> Result<QuickAddOutcome> {
        let text = self.prepare(text)?;
        let goals = self.db.goal_names().await?;
        let intent = self.parser.parse_on(&text, &goals, today);

        let applied = self.apply(&text, &intent, today).await?;
        Ok(QuickAddOutcome { intent, applied })
    }

    /// Store with a type the user picked instead of the guessed one
    pub async fn submit_as(&self, text: &str, intent_type: IntentType) -> Result<QuickAddOutcome> {
        self.submit_as_on(text, intent_type, today()).await
    }

    pub async fn submit_as_on(
        &self,
        text: &str,
        intent_type: IntentType,
        today: NaiveDate,
    ) -> Result<QuickAddOutcome> {
        let text = self.prepare(text)?;
        let goals = self.db.goal_names().await?;
        let intent = self.parser.reclassify_on(&text, &goals, today, intent_type);

        let applied = self.apply(&text, &intent, today).await?;
        Ok(QuickAddOutcome { intent, applied })
    }

    /// Write a parsed intent to the store and log it
    ///
    /// # Arguments
    /// * `input` - The text the intent came from, kept in the history
    /// * `intent` - Parser output, possibly edited by the user
    /// * `today` - Date for new transactions and deadline checks
    pub async fn apply(
        &self,
        input: &str,
        intent: &ParsedIntent,
        today: NaiveDate,
    ) -> Result<Applied> {
        let data = &intent.data;

        let applied = match (intent.intent_type, intent.subtype) {
            (IntentType::Task, _) => {
                let task = TaskInput {
                    title: data.title.trim().to_string(),
                    priority: data.priority,
                    deadline: data.deadline,
                };
                validate_task(&task)?;
                Applied::Task {
                    id: self.db.insert_task(&task).await?,
                }
            }
            (IntentType::Finance, subtype) => {
                let amount = data.amount.ok_or(InFastError::MissingAmount)?;
                let kind = if subtype == Subtype::Income {
                    TransactionKind::Income
                } else {
                    TransactionKind::Expense
                };
                let transaction = TransactionInput {
                    kind,
                    amount,
                    category: data
                        .category
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                    description: data.title.trim().to_string(),
                    occurred_on: today,
                };
                validate_transaction(&transaction)?;
                Applied::Transaction {
                    id: self.db.insert_transaction(&transaction).await?,
                }
            }
            (IntentType::Goal, Subtype::Update) => {
                let amount = data.amount.ok_or(InFastError::MissingAmount)?;
                let name = data.goal_name.clone().unwrap_or_default();
                let goal = self
                    .db
                    .find_goal_by_name(&name)
                    .await?
                    .ok_or(InFastError::GoalNotFound(name))?;

                if goal.current_amount.checked_add(amount).is_none() {
                    let mut errors = ValidationErrors::new();
                    errors.add("amount", "Goal total would be too large");
                    return Err(InFastError::Validation(errors));
                }
                let current_amount = self
                    .db
                    .add_goal_step(goal.id, amount, Some(data.title.trim().to_string()))
                    .await?;
                Applied::GoalStep {
                    goal_id: goal.id,
                    current_amount,
                }
            }
            (IntentType::Goal, _) => {
                let goal = GoalInput {
                    name: data
                        .goal_name
                        .clone()
                        .unwrap_or_else(|| data.title.clone())
                        .trim()
                        .to_string(),
                    target_amount: data.amount,
                    deadline: data.deadline,
                };
                validate_goal(&goal, today)?;

                if self.db.find_goal_by_name(&goal.name).await?.is_some() {
                    let mut errors = ValidationErrors::new();
                    errors.add("name", "A goal with this name already exists");
                    return Err(InFastError::Validation(errors));
                }
                Applied::GoalCreated {
                    id: self.db.insert_goal(&goal).await?,
                }
            }
            (IntentType::Unknown, _) => {
                return Err(InFastError::InvalidInput(
                    "could not tell what to create".to_string(),
                ));
            }
        };

        self.db.log_quick_add(input, intent).await?;
        info!(
            intent = %intent.intent_type,
            subtype = %intent.subtype,
            confidence = intent.confidence,
            "Applied quick-add"
        );

        Ok(applied)
    }

    // Empty or oversized text never reaches the parser
    fn prepare(&self, text: &str) -> Result<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(InFastError::InvalidInput("empty text".to_string()));
        }
        if trimmed.chars().count() > MAX_INPUT_CHARS {
            return Err(InFastError::InputTooLong(MAX_INPUT_CHARS));
        }

        Ok(sanitize(trimmed))
    }
}

/// Remove NUL bytes and squeeze runs of whitespace to one space
fn sanitize(text: &str) -> String {
    text.replace('\0', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentData, Priority};
    use chrono::Duration;

    // Wednesday
    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    async fn setup() -> (Arc<Database>, QuickAdd) {
        let db = Arc::new(Database::new_test().await.unwrap());
        let quick_add = QuickAdd::new(Arc::clone(&db)).unwrap();
        (db, quick_add)
    }

    #[tokio::test]
    async fn test_submit_expense() {
        let (db, quick_add) = setup().await;

        let outcome = quick_add
            .submit_on("Taksi ga 25 ming sarfladim", day())
            .await
            .unwrap();
        assert!(matches!(outcome.applied, Applied::Transaction { .. }));

        let transactions = db.list_transactions(None, None).await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 25_000);
        assert_eq!(transactions[0].category, "Transport");
        assert_eq!(transactions[0].kind(), TransactionKind::Expense);
        assert_eq!(transactions[0].occurred_on, "2025-03-12");
    }

    #[tokio::test]
    async fn test_submit_income() {
        let (db, quick_add) = setup().await;

        quick_add
            .submit_on("Oylik tushdi 5 mln so'm", day())
            .await
            .unwrap();

        let transactions = db.list_transactions(None, None).await.unwrap();
        assert_eq!(transactions[0].kind(), TransactionKind::Income);
        assert_eq!(transactions[0].category, "Maosh");
    }

    #[tokio::test]
    async fn test_submit_task() {
        let (db, quick_add) = setup().await;

        let outcome = quick_add
            .submit_on("Ertaga   meeting tayyorlash kerak", day())
            .await
            .unwrap();

        let Applied::Task { id } = outcome.applied else {
            panic!("Expected a task, got {:?}", outcome.applied);
        };
        let task = db.get_task(id).await.unwrap().unwrap();
        assert_eq!(task.title, "Meeting tayyorlash kerak");
        assert_eq!(task.deadline_date(), Some(day() + Duration::days(1)));
    }

    #[tokio::test]
    async fn test_goal_create_then_update() {
        let (db, quick_add) = setup().await;

        let created = quick_add
            .submit_on("Yangi maqsad: mashina olish 50 mln", day())
            .await
            .unwrap();
        let Applied::GoalCreated { id } = created.applied else {
            panic!("Expected a new goal, got {:?}", created.applied);
        };

        let updated = quick_add
            .submit_on("Mashina olish maqsadiga 5 mln qo'shdim", day())
            .await
            .unwrap();
        assert_eq!(
            updated.applied,
            Applied::GoalStep {
                goal_id: id,
                current_amount: 5_000_000,
            }
        );

        let goals = db.list_goals().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].name, "Mashina olish");
        assert_eq!(goals[0].target_amount, Some(50_000_000));
        assert_eq!(db.goal_steps(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_goal() {
        let (_db, quick_add) = setup().await;

        let result = quick_add
            .submit_on("Kompyuter olish maqsadimga 100 ming qo'shdim", day())
            .await;
        match result {
            Err(InFastError::GoalNotFound(name)) => assert_eq!(name, "Kompyuter olish"),
            other => panic!("Expected GoalNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_existing_goal_by_name() {
        let (db, quick_add) = setup().await;
        let id = db
            .insert_goal(&GoalInput {
                name: "Kompyuter".to_string(),
                target_amount: Some(8_000_000),
                deadline: None,
            })
            .await
            .unwrap();

        let outcome = quick_add
            .submit_on("Kompyuter olish maqsadimga 100 ming qo'shdim", day())
            .await
            .unwrap();
        assert_eq!(
            outcome.applied,
            Applied::GoalStep {
                goal_id: id,
                current_amount: 100_000,
            }
        );
    }

    #[tokio::test]
    async fn test_duplicate_goal_is_rejected() {
        let (db, quick_add) = setup().await;
        db.insert_goal(&GoalInput {
            name: "Mashina olish".to_string(),
            target_amount: None,
            deadline: None,
        })
        .await
        .unwrap();

        let intent = ParsedIntent {
            intent_type: IntentType::Goal,
            subtype: Subtype::Create,
            confidence: 100,
            data: IntentData {
                title: "mashina olish".to_string(),
                amount: Some(60_000_000),
                goal_name: Some("mashina olish".to_string()),
                ..Default::default()
            },
            needs_confirmation: false,
        };

        match quick_add.apply("mashina olish", &intent, day()).await {
            Err(InFastError::Validation(errors)) => assert!(errors.get("name").is_some()),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_finance_without_amount() {
        let (db, quick_add) = setup().await;

        let result = quick_add.submit_on("Taksi ga pul berdim", day()).await;
        assert!(matches!(result, Err(InFastError::MissingAmount)));
        assert!(db.recent_quick_adds(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_amount_is_not_stored() {
        let (db, quick_add) = setup().await;

        let intent = quick_add
            .preview_on("Taksi ga 99999999999 mlrd sarfladim", day())
            .await
            .unwrap();
        assert_eq!(intent.data.amount, None);

        let result = quick_add
            .submit_on("Taksi ga 5000000000 mlrd sarfladim", day())
            .await;
        assert!(matches!(result, Err(InFastError::MissingAmount)));
        assert!(db.list_transactions(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_goal_step_cannot_overflow_total() {
        let (db, quick_add) = setup().await;
        let id = db
            .insert_goal(&GoalInput {
                name: "Dacha".to_string(),
                target_amount: None,
                deadline: None,
            })
            .await
            .unwrap();
        sqlx::query("UPDATE goals SET current_amount = ? WHERE id = ?")
            .bind(i64::MAX - 5)
            .bind(id)
            .execute(db.pool())
            .await
            .unwrap();

        let result = quick_add
            .submit_on("Dacha maqsadiga 100 ming qo'shdim", day())
            .await;
        assert!(matches!(result, Err(InFastError::Validation(_))));
        assert!(db.goal_steps(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_long_unrecognized_text_becomes_task() {
        let (db, quick_add) = setup().await;
        let text = "salom ".repeat(50);

        let outcome = quick_add.submit_on(&text, day()).await.unwrap();
        let Applied::Task { id } = outcome.applied else {
            panic!("Expected a task, got {:?}", outcome.applied);
        };
        assert!(outcome.intent.needs_confirmation);

        let task = db.get_task(id).await.unwrap().unwrap();
        assert_eq!(task.title, text.trim());
        assert_eq!(task.title.chars().count(), 299);
    }

    #[tokio::test]
    async fn test_rejects_empty_and_long_text() {
        let (_db, quick_add) = setup().await;

        assert!(matches!(
            quick_add.submit_on("   ", day()).await,
            Err(InFastError::InvalidInput(_))
        ));

        let long = "a".repeat(MAX_INPUT_CHARS + 1);
        assert!(matches!(
            quick_add.submit_on(&long, day()).await,
            Err(InFastError::InputTooLong(500))
        ));
    }

    #[tokio::test]
    async fn test_preview_writes_nothing() {
        let (db, quick_add) = setup().await;

        let intent = quick_add
            .preview_on("Taksi ga 25 ming sarfladim", day())
            .await
            .unwrap();
        assert_eq!(intent.intent_type, IntentType::Finance);

        let stats = db.stats().await.unwrap();
        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.total_quick_adds, 0);
    }

    #[tokio::test]
    async fn test_submit_as_finance() {
        let (db, quick_add) = setup().await;

        let outcome = quick_add
            .submit_as_on("Salom 40 ming", IntentType::Finance, day())
            .await
            .unwrap();
        assert_eq!(outcome.intent.confidence, 100);

        let transactions = db.list_transactions(None, None).await.unwrap();
        assert_eq!(transactions[0].amount, 40_000);
        assert_eq!(transactions[0].category, "Boshqa");
    }

    #[tokio::test]
    async fn test_apply_logs_history() {
        let (db, quick_add) = setup().await;

        quick_add
            .submit_on("Salom\0 dunyo", day())
            .await
            .unwrap();

        let history = db.recent_quick_adds(5).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].input, "Salom dunyo");
        assert_eq!(history[0].intent_type, "task");
        assert_eq!(history[0].confidence, 0);
    }

    #[tokio::test]
    async fn test_apply_unknown() {
        let (_db, quick_add) = setup().await;
        let intent = ParsedIntent {
            intent_type: IntentType::Unknown,
            subtype: Subtype::None,
            confidence: 0,
            data: IntentData {
                title: "?".to_string(),
                priority: Priority::Medium,
                ..Default::default()
            },
            needs_confirmation: true,
        };

        let result = quick_add.apply("?", &intent, day()).await;
        assert!(matches!(result, Err(InFastError::InvalidInput(_))));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("  Taksi    ga\t25 ming "), "Taksi ga 25 ming");
        assert_eq!(sanitize("a\0b"), "ab");
    }
}
