// Pulls money amounts out of quick-add text
//
// "25 ming" -> 25_000, "1,5 mln" -> 1_500_000, "100 000 so'm" -> 100_000.
// A number with a unit beats a bare number. Numbers that are really days,
// counts or durations ("15 mart", "3 ta", "2 kundan keyin") are skipped.

use crate::error::Result;
use crate::intent::keywords::month_from_word;
use regex::Regex;

// number (optional space-grouped thousands, optional fraction) + optional word after it
const AMOUNT_PATTERN: &str = r"(\d+(?:[ \u{a0}]\d{3})*(?:[.,]\d+)?)\s*([\p{L}']+)?";

// Words after a number that mean it is not money
const NON_MONEY_PREFIXES: &[&str] = &[
    "kun", "hafta", "yil", "soat", "daqiqa", "minut", "kishi", "dona", "foiz",
];
const NON_MONEY_WORDS: &[&str] = &["ta", "tadan", "tasi", "marta", "oy", "oyda", "oydan"];

/// Largest amount we accept (one quadrillion so'm); bigger numbers are typos
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

pub struct AmountExtractor {
    regex: Regex,
}

impl AmountExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            regex: Regex::new(AMOUNT_PATTERN)?,
        })
    }

    /// Find the amount in already-normalized text
    pub fn extract(&self, normalized: &str) -> Option<i64> {
        let mut bare: Option<i64> = None;

        for caps in self.regex.captures_iter(normalized) {
            let Some(value) = caps.get(1).and_then(|m| parse_number(m.as_str())) else {
                continue;
            };
            let word = caps.get(2).map(|m| m.as_str()).unwrap_or("");

            if is_not_money(word) {
                continue;
            }

            match unit_multiplier(word) {
                Some(multiplier) => {
                    if let Some(amount) = to_amount(value * multiplier) {
                        return Some(amount);
                    }
                }
                None => {
                    if bare.is_none() {
                        bare = to_amount(value);
                    }
                }
            }
        }

        bare
    }
}

// Whole so'm in 1..=MAX_AMOUNT, checked before the float is cast
fn to_amount(value: f64) -> Option<i64> {
    let rounded = value.round();
    if rounded >= 1.0 && rounded <= MAX_AMOUNT as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

/// Scale for the word right after a number, None when the word is not a unit
fn unit_multiplier(word: &str) -> Option<f64> {
    if word.starts_with("mlrd") || word.starts_with("milliard") {
        Some(1_000_000_000.0)
    } else if word.starts_with("mln") || word.starts_with("million") || word.starts_with("millon")
    {
        Some(1_000_000.0)
    } else if word.starts_with("ming") || word == "k" {
        Some(1_000.0)
    } else if word.starts_with("so'm")
        || matches!(word, "som" | "sum" | "somga" | "sumga" | "uzs")
    {
        Some(1.0)
    } else {
        None
    }
}

/// True for words like "ming", "mln", "so'm" that only qualify a number
pub fn is_amount_unit(word: &str) -> bool {
    unit_multiplier(word).is_some()
}

fn is_not_money(word: &str) -> bool {
    month_from_word(word).is_some()
        || NON_MONEY_WORDS.contains(&word)
        || NON_MONEY_PREFIXES.iter().any(|p| word.starts_with(p))
}

/// "100 000" -> 100000, "1,5" -> 1.5, "25,000" -> 25000
fn parse_number(raw: &str) -> Option<f64> {
    let joined: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    match joined.find(|c: char| c == '.' || c == ',') {
        Some(pos) => {
            let (whole, frac) = (&joined[..pos], &joined[pos + 1..]);
            if frac.len() == 3 {
                // three digits after the separator is thousands grouping
                format!("{}{}", whole, frac).parse().ok()
            } else {
                format!("{}.{}", whole, frac).parse().ok()
            }
        }
        None => joined.parse().ok(),
    }
}
