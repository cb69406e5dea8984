//! Quick-add intent parser
//!
//! Turns a free-text phrase into a task, a finance entry or a goal step.
//! Pure function of (text, goal names, reference date): nothing is stored here.

use crate::error::Result;
use crate::intent::amount::{is_amount_unit, AmountExtractor};
use crate::intent::category::{detect_category, detect_priority};
use crate::intent::date::DateExtractor;
use crate::intent::keywords::{
    count_hits, month_from_word, normalize, tokenize, weekday_from_word, EXPENSE_KEYWORDS,
    GOAL_KEYWORDS, GOAL_UPDATE_KEYWORDS, HIGH_PRIORITY_KEYWORDS, INCOME_KEYWORDS,
    LOW_PRIORITY_KEYWORDS, MONEY_KEYWORDS, TASK_KEYWORDS,
};
use crate::intent::models::{IntentData, IntentType, ParsedIntent, Priority, Subtype};
use crate::intent::scorer::{IntentScores, Scorer};
use chrono::{Local, NaiveDate};
use tracing::debug;

/// Longer input is cut to this many characters before parsing
pub const MAX_INPUT_CHARS: usize = 500;

// Words that only carry the deadline and are dropped from titles
const DATE_WORDS: &[&str] = &["bugun", "ertaga", "indin", "hafta", "oxir"];
// Dropped when the word right after them was dropped ("keyingi hafta", "3 kundan")
const DATE_QUALIFIERS: &[&str] = &["keyingi", "kelasi", "bir", "oy", "shu"];
// Dropped when the word right before them was dropped ("juma kuni", "kundan keyin")
const DATE_FOLLOWERS: &[&str] = &["keyin", "so'ng", "kuni", "kunga"];

/// Parser for quick-add phrases
pub struct IntentParser {
    amounts: AmountExtractor,
    dates: DateExtractor,
}

impl IntentParser {
    /// Build a parser, compiling its patterns once
    pub fn new() -> Result<Self> {
        Ok(Self {
            amounts: AmountExtractor::new()?,
            dates: DateExtractor::new()?,
        })
    }

    /// Parse relative to today's local date
    pub fn parse(&self, text: &str, goals: &[String]) -> ParsedIntent {
        self.parse_on(text, goals, Local::now().date_naive())
    }

    /// Parse relative to a given date
    ///
    /// # Arguments
    /// * `text` - Raw quick-add text, cut to `MAX_INPUT_CHARS`
    /// * `goals` - Names of the user's existing goals
    /// * `today` - Reference date for "ertaga", weekdays, etc.
    pub fn parse_on(&self, text: &str, goals: &[String], today: NaiveDate) -> ParsedIntent {
        let text = truncate(text);
        if text.trim().is_empty() {
            return unknown(text);
        }

        let normalized = normalize(text);
        let tokens = tokenize(&normalized);
        let goal_name = match_goal(&tokens, goals);

        let expense = count_hits(&normalized, &tokens, EXPENSE_KEYWORDS);
        let income = count_hits(&normalized, &tokens, INCOME_KEYWORDS);
        let scores = IntentScores {
            task: count_hits(&normalized, &tokens, TASK_KEYWORDS),
            finance: expense + income + count_hits(&normalized, &tokens, MONEY_KEYWORDS),
            goal: count_hits(&normalized, &tokens, GOAL_KEYWORDS) + usize::from(goal_name.is_some()),
        };
        let verdict = Scorer::pick(&scores);

        debug!(
            task = scores.task,
            finance = scores.finance,
            goal = scores.goal,
            winner = %verdict.intent_type,
            "Scored quick-add text"
        );

        let fields = Fields {
            text,
            normalized: &normalized,
            tokens: &tokens,
            goal_name,
            today,
            expense,
            income,
        };
        let mut intent = self.build(verdict.intent_type, &fields);

        if scores.total() == 0 {
            // nothing recognized: keep the text exactly as typed
            intent.data.title = text.to_string();
        }
        intent.confidence = Scorer::confidence(verdict.hits);
        intent.needs_confirmation = verdict.ambiguous;
        intent
    }

    /// Re-extract fields for a type the user picked by hand
    pub fn reclassify_on(
        &self,
        text: &str,
        goals: &[String],
        today: NaiveDate,
        intent_type: IntentType,
    ) -> ParsedIntent {
        let text = truncate(text);
        if text.trim().is_empty() || intent_type == IntentType::Unknown {
            return self.parse_on(text, goals, today);
        }

        let normalized = normalize(text);
        let tokens = tokenize(&normalized);
        let fields = Fields {
            text,
            normalized: &normalized,
            tokens: &tokens,
            goal_name: match_goal(&tokens, goals),
            today,
            expense: count_hits(&normalized, &tokens, EXPENSE_KEYWORDS),
            income: count_hits(&normalized, &tokens, INCOME_KEYWORDS),
        };

        let mut intent = self.build(intent_type, &fields);
        intent.confidence = 100;
        intent.needs_confirmation = false;
        intent
    }

    fn build(&self, intent_type: IntentType, f: &Fields<'_>) -> ParsedIntent {
        let priority = detect_priority(f.normalized, f.tokens);
        let deadline = self.dates.extract(f.normalized, f.tokens, f.today);

        let (subtype, data) = match intent_type {
            IntentType::Task => (
                Subtype::Create,
                IntentData {
                    title: clean_title(f.text, TitleKind::Task),
                    deadline,
                    priority,
                    ..Default::default()
                },
            ),
            IntentType::Finance => {
                let subtype = if f.income > f.expense {
                    Subtype::Income
                } else {
                    Subtype::Expense
                };
                (
                    subtype,
                    IntentData {
                        title: f.text.trim().to_string(),
                        amount: self.amounts.extract(f.normalized),
                        category: Some(detect_category(f.normalized, f.tokens, subtype)),
                        deadline,
                        priority,
                        goal_name: None,
                    },
                )
            }
            IntentType::Goal => {
                let updating = f.goal_name.is_some()
                    || count_hits(f.normalized, f.tokens, GOAL_UPDATE_KEYWORDS) > 0;
                let subtype = if updating {
                    Subtype::Update
                } else {
                    Subtype::Create
                };
                let goal_name = f
                    .goal_name
                    .clone()
                    .unwrap_or_else(|| clean_title(f.text, TitleKind::Goal));
                (
                    subtype,
                    IntentData {
                        title: f.text.trim().to_string(),
                        amount: self.amounts.extract(f.normalized),
                        category: None,
                        deadline,
                        priority,
                        goal_name: Some(goal_name),
                    },
                )
            }
            IntentType::Unknown => return unknown(f.text),
        };

        ParsedIntent {
            intent_type,
            subtype,
            confidence: 0,
            data,
            needs_confirmation: false,
        }
    }
}

// Everything `build` needs about one phrase
struct Fields<'a> {
    text: &'a str,
    normalized: &'a str,
    tokens: &'a [&'a str],
    goal_name: Option<String>,
    today: NaiveDate,
    expense: usize,
    income: usize,
}

fn unknown(text: &str) -> ParsedIntent {
    ParsedIntent {
        intent_type: IntentType::Unknown,
        subtype: Subtype::None,
        confidence: 0,
        data: IntentData {
            title: text.to_string(),
            priority: Priority::Medium,
            ..Default::default()
        },
        needs_confirmation: true,
    }
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Longest existing goal name whose words open consecutive tokens of the text
///
/// "Uy" matches "uyga" but not "buyurtma".
fn match_goal(tokens: &[&str], goals: &[String]) -> Option<String> {
    goals
        .iter()
        .filter(|goal| {
            let name = normalize(goal.trim());
            let words = tokenize(&name);
            !words.is_empty()
                && tokens.windows(words.len()).any(|window| {
                    window
                        .iter()
                        .zip(&words)
                        .all(|(token, word)| token.starts_with(word))
                })
        })
        .max_by_key(|goal| goal.chars().count())
        .cloned()
}

#[derive(Clone, Copy, PartialEq)]
enum TitleKind {
    Task,
    Goal,
}

/// Drop date, priority (and for goals: goal and amount) words from a title
fn clean_title(text: &str, kind: TitleKind) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let keys: Vec<String> = words.iter().map(|w| word_key(w)).collect();
    let mut dropped = vec![false; words.len()];

    for i in 0..words.len() {
        let prev = i.checked_sub(1).map(|j| keys[j].as_str());
        let next = keys.get(i + 1).map(String::as_str);
        dropped[i] = is_date_word(&keys[i], prev, next)
            || starts_with_any(&keys[i], HIGH_PRIORITY_KEYWORDS)
            || starts_with_any(&keys[i], LOW_PRIORITY_KEYWORDS)
            || (kind == TitleKind::Goal && is_goal_noise(&keys[i]));
    }

    for i in 1..words.len() {
        if !dropped[i] && dropped[i - 1] && DATE_FOLLOWERS.contains(&keys[i].as_str()) {
            dropped[i] = true;
        }
    }

    for i in (0..words.len().saturating_sub(1)).rev() {
        if !dropped[i]
            && dropped[i + 1]
            && (is_number(&keys[i]) || DATE_QUALIFIERS.contains(&keys[i].as_str()))
        {
            dropped[i] = true;
        }
    }

    let kept: Vec<&str> = words
        .iter()
        .zip(&dropped)
        .filter(|(_, d)| !**d)
        .map(|(w, _)| *w)
        .collect();
    let joined = kept
        .join(" ")
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | ';' | '-'))
        .to_string();

    if joined.is_empty() {
        text.trim().to_string()
    } else {
        capitalize(&joined)
    }
}

// Normalized word without surrounding punctuation
fn word_key(word: &str) -> String {
    normalize(word)
        .trim_matches(|c: char| !(c.is_alphanumeric() || c == '\''))
        .to_string()
}

fn is_date_word(key: &str, prev: Option<&str>, next: Option<&str>) -> bool {
    let near_number = prev.is_some_and(is_number) || next.is_some_and(is_number);

    starts_with_any(key, DATE_WORDS)
        || weekday_from_word(key).is_some()
        || (month_from_word(key).is_some() && near_number)
        || (key.starts_with("kun") && prev.is_some_and(is_number))
        || key
            .split_once('-')
            .is_some_and(|(day, month)| is_number(day) && month_from_word(month).is_some())
}

fn is_goal_noise(key: &str) -> bool {
    key == "yangi"
        || is_number(key)
        || is_amount_unit(key)
        || starts_with_any(key, GOAL_KEYWORDS)
        || starts_with_any(key, MONEY_KEYWORDS)
}

fn is_number(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

fn starts_with_any(key: &str, list: &[&str]) -> bool {
    list.iter().any(|k| !k.contains(' ') && key.starts_with(k))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn parser() -> IntentParser {
        IntentParser::new().unwrap()
    }

    // Wednesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    fn parse(text: &str) -> ParsedIntent {
        parser().parse_on(text, &[], today())
    }

    #[test]
    fn test_taxi_expense() {
        let intent = parse("Taksi ga 25 ming sarfladim");

        assert_eq!(intent.intent_type, IntentType::Finance);
        assert_eq!(intent.subtype, Subtype::Expense);
        assert_eq!(intent.data.amount, Some(25_000));
        assert_eq!(intent.data.category.as_deref(), Some("Transport"));
        assert_eq!(intent.confidence, 25);
        assert!(!intent.needs_confirmation);
    }

    #[test]
    fn test_task_with_tomorrow() {
        let intent = parse("Ertaga meeting tayyorlash kerak");

        assert_eq!(intent.intent_type, IntentType::Task);
        assert_eq!(intent.subtype, Subtype::Create);
        assert_eq!(intent.data.deadline, Some(today() + Duration::days(1)));
        assert_eq!(intent.data.title, "Meeting tayyorlash kerak");
        assert_eq!(intent.confidence, 75);
        assert_eq!(intent.data.amount, None);
    }

    #[test]
    fn test_goal_update() {
        let intent = parse("Kompyuter olish maqsadimga 100 ming qo'shdim");

        assert_eq!(intent.intent_type, IntentType::Goal);
        assert_eq!(intent.subtype, Subtype::Update);
        assert_eq!(intent.data.amount, Some(100_000));
        assert_eq!(intent.data.goal_name.as_deref(), Some("Kompyuter olish"));
    }

    #[test]
    fn test_goal_update_matches_existing_goal() {
        let goals = vec!["Kompyuter".to_string(), "Mashina".to_string()];
        let intent = parser().parse_on("Kompyuterga 200 ming ajratdim", &goals, today());

        assert_eq!(intent.intent_type, IntentType::Goal);
        assert_eq!(intent.subtype, Subtype::Update);
        assert_eq!(intent.data.goal_name.as_deref(), Some("Kompyuter"));
        // "ajratdim" plus the goal name itself
        assert_eq!(intent.confidence, 50);
    }

    #[test]
    fn test_longest_goal_name_wins() {
        let goals = vec!["Uy".to_string(), "Uy remonti".to_string()];
        let intent = parser().parse_on("Uy remonti maqsadiga 1 mln qo'shdim", &goals, today());

        assert_eq!(intent.data.goal_name.as_deref(), Some("Uy remonti"));
    }

    #[test]
    fn test_short_goal_name_needs_word_match() {
        let goals = vec!["Uy".to_string()];
        let intent = parser().parse_on("Mijoz buyurtma uchun 500 ming tushdi", &goals, today());

        assert_eq!(intent.intent_type, IntentType::Finance);
        assert_eq!(intent.subtype, Subtype::Income);
        assert_eq!(intent.data.amount, Some(500_000));
        assert_eq!(intent.data.goal_name, None);
        assert!(!intent.needs_confirmation);

        let intent = parser().parse_on("Uyga 300 ming ajratdim", &goals, today());
        assert_eq!(intent.data.goal_name.as_deref(), Some("Uy"));
    }

    #[test]
    fn test_goal_create() {
        let intent = parse("Yangi maqsad: mashina olish 50 mln");

        assert_eq!(intent.intent_type, IntentType::Goal);
        assert_eq!(intent.subtype, Subtype::Create);
        assert_eq!(intent.data.amount, Some(50_000_000));
        assert_eq!(intent.data.goal_name.as_deref(), Some("Mashina olish"));
    }

    #[test]
    fn test_income() {
        let intent = parse("Oylik tushdi 5 mln so'm");

        assert_eq!(intent.intent_type, IntentType::Finance);
        assert_eq!(intent.subtype, Subtype::Income);
        assert_eq!(intent.data.amount, Some(5_000_000));
        assert_eq!(intent.data.category.as_deref(), Some("Maosh"));
        // oylik, tushdi, so'm
        assert_eq!(intent.confidence, 75);
    }

    #[test]
    fn test_unknown_defaults_to_task() {
        let text = "  Salom dunyo ";
        let intent = parse(text);

        assert_eq!(intent.intent_type, IntentType::Task);
        assert_eq!(intent.data.title, text);
        assert_eq!(intent.confidence, 0);
        assert!(intent.needs_confirmation);
    }

    #[test]
    fn test_tie_defaults_to_task() {
        // one finance hit (sarf), one task hit (kerak)
        let intent = parse("Sarflashni rejalashtirish kerak");

        assert_eq!(intent.intent_type, IntentType::Task);
        assert!(intent.needs_confirmation);
    }

    #[test]
    fn test_empty_input_is_unknown() {
        let intent = parse("   ");
        assert_eq!(intent.intent_type, IntentType::Unknown);
        assert_eq!(intent.subtype, Subtype::None);
        assert!(intent.needs_confirmation);
    }

    #[test]
    fn test_priority_and_title_cleanup() {
        let intent = parse("Shoshilinch: juma kuni hisobotni topshirish");

        assert_eq!(intent.data.priority, Priority::High);
        assert_eq!(intent.data.deadline, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(intent.data.title, "Hisobotni topshirish");
    }

    #[test]
    fn test_title_drops_day_month() {
        let intent = parse("20 martgacha kontraktni to'lash kerak");
        assert_eq!(intent.data.deadline, NaiveDate::from_ymd_opt(2025, 3, 20));

        let intent = parse("3 kundan keyin qo'ng'iroq qilish");
        assert_eq!(intent.data.title, "Qo'ng'iroq qilish");
        assert_eq!(intent.data.deadline, NaiveDate::from_ymd_opt(2025, 3, 15));
    }

    #[test]
    fn test_reclassify_as_finance() {
        let p = parser();
        let intent = p.reclassify_on("Salom 40 ming", &[], today(), IntentType::Finance);

        assert_eq!(intent.intent_type, IntentType::Finance);
        assert_eq!(intent.subtype, Subtype::Expense);
        assert_eq!(intent.data.amount, Some(40_000));
        assert_eq!(intent.data.category.as_deref(), Some("Boshqa"));
        assert_eq!(intent.confidence, 100);
        assert!(!intent.needs_confirmation);
    }

    #[test]
    fn test_long_input_is_cut() {
        let text = "a".repeat(MAX_INPUT_CHARS + 50);
        let intent = parse(&text);
        assert_eq!(intent.data.title.chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_uzbek_apostrophe_variants() {
        let intent = parse("Kompyuter maqsadiga 100 ming qoʻshdim");
        assert_eq!(intent.intent_type, IntentType::Goal);
        assert_eq!(intent.subtype, Subtype::Update);
    }
}
