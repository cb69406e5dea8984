// Deadline detection for quick-add text
//
// Works relative to a reference date so results are reproducible.
// Rules are tried in order, the first one that fires wins.

use crate::error::Result;
use crate::intent::keywords::{has_keyword, month_from_word, weekday_from_word};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;

const DAY_MONTH_PATTERN: &str = r"\b(\d{1,2})\s*[-.]?\s*([\p{L}']+)";
const MONTH_DAY_PATTERN: &str = r"([\p{L}']+)\s+(\d{1,2})\b";
const DAYS_LATER_PATTERN: &str = r"\b(\d{1,3})\s*kun(?:dan)?\s+(?:keyin|so'ng)";

pub struct DateExtractor {
    day_month: Regex,
    month_day: Regex,
    days_later: Regex,
}

impl DateExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            day_month: Regex::new(DAY_MONTH_PATTERN)?,
            month_day: Regex::new(MONTH_DAY_PATTERN)?,
            days_later: Regex::new(DAYS_LATER_PATTERN)?,
        })
    }

    /// Find a deadline in normalized text
    pub fn extract(&self, normalized: &str, tokens: &[&str], today: NaiveDate) -> Option<NaiveDate> {
        if let Some(date) = self.explicit_date(normalized, today) {
            return Some(date);
        }

        if let Some(days) = self
            .days_later
            .captures(normalized)
            .and_then(|caps| caps[1].parse::<i64>().ok())
        {
            return Some(today + Duration::days(days));
        }

        if has_keyword(normalized, tokens, "bugun") {
            return Some(today);
        }
        if has_keyword(normalized, tokens, "ertaga") {
            return Some(today + Duration::days(1));
        }
        if has_keyword(normalized, tokens, "indin") {
            return Some(today + Duration::days(2));
        }
        if has_keyword(normalized, tokens, "hafta oxiri") {
            return Some(next_weekday(today, Weekday::Sat));
        }
        if has_keyword(normalized, tokens, "hafta") {
            return Some(today + Duration::days(7));
        }
        if has_keyword(normalized, tokens, "oy oxiri") {
            return end_of_month(today);
        }

        tokens
            .iter()
            .find_map(|t| weekday_from_word(t))
            .map(|day| next_weekday(today, day))
    }

    // "15 mart", "15-martgacha", "mart 15"
    fn explicit_date(&self, normalized: &str, today: NaiveDate) -> Option<NaiveDate> {
        let day_month = self.day_month.captures_iter(normalized).filter_map(|caps| {
            let day = caps[1].parse::<u32>().ok()?;
            let month = month_from_word(&caps[2])?;
            Some((day, month))
        });

        let month_day = self.month_day.captures_iter(normalized).filter_map(|caps| {
            let month = month_from_word(&caps[1])?;
            let day = caps[2].parse::<u32>().ok()?;
            Some((day, month))
        });

        day_month
            .chain(month_day)
            .find_map(|(day, month)| upcoming(today, month, day))
    }
}

/// This year's date, or next year's once it has passed
fn upcoming(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year >= today {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    }
}

/// Next occurrence of a weekday, never today itself
pub fn next_weekday(today: NaiveDate, day: Weekday) -> NaiveDate {
    let diff = (day.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    today + Duration::days(if diff == 0 { 7 } else { diff })
}

fn end_of_month(today: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}
