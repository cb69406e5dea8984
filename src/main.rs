// infast - quick-add for the InFast planner
//
// Entry point. Parses CLI args and dispatches to handlers.

use chrono::{Local, NaiveDate};
use infast_lib::{
    core::{Applied, Envelope, QuickAdd, SearchItem, Searcher, Summary},
    Config, Database, InFastError, IntentType, Result,
};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with_target(false)
        .without_time()
        .init();

    match run(&args, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String], config: &Config) -> Result<()> {
    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "add" => handle_add(&args[2..], config).await,
        "parse" => handle_parse(&args[2..], config).await,
        "tasks" => handle_tasks(&args[2..], config).await,
        "done" => handle_done(&args[2..], config).await,
        "finance" => handle_finance(&args[2..], config).await,
        "goals" => handle_goals(config).await,
        "search" => handle_search(&args[2..], config).await,
        "history" => handle_history(&args[2..], config).await,
        "config" => handle_config(&args[2..], config).await,
        "status" => handle_status(config).await,
        "version" | "-v" | "--version" => {
            println!("infast v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Err(InFastError::InvalidInput(format!("unknown command '{}'", command)))
        }
    }
}

async fn handle_add(args: &[String], config: &Config) -> Result<()> {
    // Split off --as <type>, everything else is the text
    let mut text_parts = Vec::new();
    let mut forced: Option<IntentType> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--as" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| {
                    InFastError::InvalidInput("--as needs task, finance or goal".to_string())
                })?;
                forced = Some(value.parse().map_err(InFastError::InvalidInput)?);
            }
            arg => text_parts.push(arg.to_string()),
        }
        i += 1;
    }

    let text = text_parts.join(" ");
    let db = Arc::new(get_database(config).await?);
    let quick_add = QuickAdd::new(db)?;

    let outcome = match forced {
        Some(intent_type) => quick_add.submit_as(&text, intent_type).await?,
        None => quick_add.submit(&text).await?,
    };

    let data = &outcome.intent.data;
    match outcome.applied {
        Applied::Task { id } => {
            print!("✓ Task #{}: {}", id, data.title);
            if let Some(deadline) = data.deadline {
                print!(" (due {})", deadline);
            }
            println!(" [{}]", data.priority);
        }
        Applied::Transaction { id } => {
            println!(
                "✓ {} #{}: {} so'm, {}",
                outcome.intent.subtype,
                id,
                format_amount(data.amount.unwrap_or_default()),
                data.category.as_deref().unwrap_or("-")
            );
        }
        Applied::GoalCreated { id } => {
            print!("✓ Goal #{}: {}", id, data.goal_name.as_deref().unwrap_or(&data.title));
            if let Some(target) = data.amount {
                print!(" (target {} so'm)", format_amount(target));
            }
            println!();
        }
        Applied::GoalStep {
            goal_id,
            current_amount,
        } => {
            println!(
                "✓ Goal #{} +{} so'm, now {} so'm",
                goal_id,
                format_amount(data.amount.unwrap_or_default()),
                format_amount(current_amount)
            );
        }
    }

    if outcome.intent.needs_confirmation {
        println!(
            "  Not sure about this one ({}% confident). Use --as task|finance|goal to pick the type.",
            outcome.intent.confidence
        );
    }

    Ok(())
}

async fn handle_parse(args: &[String], config: &Config) -> Result<()> {
    let text = args.join(" ");
    let db = Arc::new(get_database(config).await?);
    let quick_add = QuickAdd::new(db)?;

    // Failures still print an envelope so callers can read the JSON
    let envelope = match quick_add.preview(&text).await {
        Ok(intent) => Envelope::ok(intent),
        Err(e) => {
            warn!(error = %e, "Could not parse quick-add text");
            Envelope::from_error(&e)
        }
    };

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn handle_tasks(args: &[String], config: &Config) -> Result<()> {
    let include_completed = args.iter().any(|arg| arg == "--all");

    let db = get_database(config).await?;
    let tasks = db.list_tasks(include_completed).await?;
    let today = Local::now().date_naive();

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    println!("\nTasks:");
    println!("{}", "=".repeat(60));
    for task in &tasks {
        let status = if task.completed {
            "✓"
        } else if task.is_overdue(today) {
            "!"
        } else {
            " "
        };
        let deadline = task.deadline.as_deref().unwrap_or("");
        println!(
            "{:4}. {} {:<40} {:<10} {}",
            task.id, status, task.title, deadline, task.priority
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_done(args: &[String], config: &Config) -> Result<()> {
    let id = args
        .first()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| InFastError::InvalidInput("done needs a task id".to_string()))?;

    let db = get_database(config).await?;
    db.complete_task(id).await?;
    println!("✓ Task #{} done", id);

    Ok(())
}

async fn handle_finance(args: &[String], config: &Config) -> Result<()> {
    let mut from: Option<NaiveDate> = None;
    let mut to: Option<NaiveDate> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--from" => {
                i += 1;
                from = Some(parse_date_arg(args.get(i))?);
            }
            "--to" => {
                i += 1;
                to = Some(parse_date_arg(args.get(i))?);
            }
            other => {
                return Err(InFastError::InvalidInput(format!(
                    "unexpected argument '{}'",
                    other
                )));
            }
        }
        i += 1;
    }

    let db = Arc::new(get_database(config).await?);
    let summary = Summary::new(db).finance(from, to).await?;

    println!("\nFinance:");
    println!("{}", "=".repeat(60));
    println!("  Income:  {:>15} so'm", format_amount(summary.income));
    println!("  Expense: {:>15} so'm", format_amount(summary.expense));
    println!("  Balance: {:>15} so'm", format_amount(summary.balance));

    if !summary.by_category.is_empty() {
        println!("\nBy category:");
        for row in &summary.by_category {
            println!(
                "  {:<8} {:<16} {:>15} so'm ({})",
                row.kind.to_string(),
                row.category,
                format_amount(row.total),
                row.count
            );
        }
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_goals(config: &Config) -> Result<()> {
    let db = Arc::new(get_database(config).await?);
    let goals = Summary::new(db).goals().await?;

    if goals.is_empty() {
        println!("No goals yet. Try: infast add \"Yangi maqsad: mashina 50 mln\"");
        return Ok(());
    }

    println!("\nGoals:");
    println!("{}", "=".repeat(60));
    for progress in &goals {
        let goal = &progress.goal;
        let target = goal
            .target_amount
            .map(format_amount)
            .unwrap_or_else(|| "-".to_string());
        let percent = progress
            .percent
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:4}. {:<30} {:>15} / {:<15} {:>5} ({} steps)",
            goal.id,
            goal.name,
            format_amount(goal.current_amount),
            target,
            percent,
            progress.steps.len()
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_search(args: &[String], config: &Config) -> Result<()> {
    if args.is_empty() {
        return Err(InFastError::InvalidInput("no search query provided".to_string()));
    }

    let query = args.join(" ");
    let db = Arc::new(get_database(config).await?);
    let results = Searcher::new(db).search(&query, 20).await?;

    if results.is_empty() {
        println!("Nothing found matching '{}'", query);
        return Ok(());
    }

    println!("\nFound {} match(es) for '{}':", results.len(), query);
    println!("{}", "=".repeat(60));
    for result in &results {
        let kind = match &result.item {
            SearchItem::Task(task) => format!("task #{}", task.id),
            SearchItem::Goal(goal) => format!("goal #{}", goal.id),
        };
        println!("  {:<10} {}", kind, result.item.label());
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_history(args: &[String], config: &Config) -> Result<()> {
    let limit = args
        .first()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(10);

    let db = get_database(config).await?;
    let entries = db.recent_quick_adds(limit).await?;

    if entries.is_empty() {
        println!("Nothing added yet.");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{}  {:<8} {:<8} {:>3}%  {}",
            entry.created_at, entry.intent_type, entry.subtype, entry.confidence, entry.input
        );
    }

    Ok(())
}

async fn handle_config(args: &[String], config: &Config) -> Result<()> {
    let db = get_database(config).await?;

    match args {
        [] => {
            for pref in db.list_preferences().await? {
                println!("{} = {}", pref.key, pref.value);
            }
        }
        [key] => match db.get_preference(key).await? {
            Some(value) => println!("{}", value),
            None => println!("{} is not set", key),
        },
        [key, value @ ..] => {
            db.set_preference(key.clone(), value.join(" ")).await?;
            println!("✓ {} saved", key);
        }
    }

    Ok(())
}

async fn handle_status(config: &Config) -> Result<()> {
    let db = get_database(config).await?;
    let stats = db.stats().await?;

    println!("\ninfast Status");
    println!("{}", "=".repeat(60));
    println!("  Database:     {}", db.path().display());
    println!("  Log filter:   {}", config.log_filter);
    println!("\nDatabase Statistics:");
    println!("  Tasks:        {} ({} open)", stats.total_tasks, stats.open_tasks);
    println!("  Transactions: {}", stats.total_transactions);
    println!("  Goals:        {}", stats.total_goals);
    println!("  Quick-adds:   {}", stats.total_quick_adds);
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn get_database(config: &Config) -> Result<Database> {
    Database::new(&config.db_path).await
}

fn parse_date_arg(value: Option<&String>) -> Result<NaiveDate> {
    let value = value.ok_or_else(|| InFastError::InvalidInput("missing date".to_string()))?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        InFastError::InvalidInput(format!(
            "invalid date '{}', use YYYY-MM-DD (e.g. 2025-03-15)",
            value
        ))
    })
}

// 2500000 -> "2 500 000"
fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    if amount < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

fn print_usage() {
    println!(
        r#"infast v{} - Quick-add for your tasks, money and goals

USAGE:
    infast <COMMAND> [OPTIONS]

COMMANDS:
    add <text> [--as TYPE]     Add a task, expense, income or goal step from text
    parse <text>               Show how text would be understood (JSON)
    tasks [--all]              List open tasks (--all includes done)
    done <id>                  Mark a task as done
    finance [--from D] [--to D]  Income, expense and balance
    goals                      Goals and their progress
    search <query>             Fuzzy search tasks and goals
    history [limit]            Recent quick-adds (default: 10)
    config [key] [value]       Show or set preferences
    status                     Show status and stats
    version                    Show version
    help                       Show this help

TYPES:
    task, finance, goal (also: vazifa, moliya, maqsad)

EXAMPLES:
    infast add "Taksi ga 25 ming sarfladim"
    infast add "Ertaga meeting tayyorlash kerak"
    infast add "Kompyuter maqsadimga 100 ming qo'shdim"
    infast add "Salom 40 ming" --as finance
    infast finance --from 2025-03-01

ENVIRONMENT:
    INFAST_DB     Database path (default: ~/.infast/infast.db)
    INFAST_LOG    Log filter (default: warn)
"#,
        env!("CARGO_PKG_VERSION")
    );
}
