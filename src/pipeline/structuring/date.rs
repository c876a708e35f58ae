//! Report date resolution from corrected text.
//!
//! Patterns are tried in a fixed order and the first one that yields a real
//! calendar date wins, wherever it sits in the document. Numeric dates are
//! read day-first. Lines carrying birth-date vocabulary are never candidates.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::types::compile_pattern;
use super::StructuringError;

const MONTH: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

#[derive(Debug, Clone, Copy)]
enum Layout {
    /// 15/03/2024, 15-03-2024, 15.03.2024
    DayMonthYear,
    /// 2024-03-15
    YearMonthDay,
    /// 15 Mar 2024, 15th March, 2024
    DayNameYear,
    /// March 15, 2024
    NameDayYear,
}

static PATTERNS: LazyLock<Vec<(Layout, Result<Regex, StructuringError>)>> =
    LazyLock::new(|| {
        vec![
            (
                Layout::DayMonthYear,
                compile_pattern(
                    "numeric day-month-year",
                    r"\b(?P<d>\d{1,2})[/\-.](?P<m>\d{1,2})[/\-.](?P<y>\d{4})\b",
                ),
            ),
            (
                Layout::YearMonthDay,
                compile_pattern(
                    "numeric year-month-day",
                    r"\b(?P<y>\d{4})[/\-.](?P<m>\d{1,2})[/\-.](?P<d>\d{1,2})\b",
                ),
            ),
            (
                Layout::DayNameYear,
                compile_pattern(
                    "day month-name year",
                    &format!(
                        r"(?i)\b(?P<d>\d{{1,2}})(?:st|nd|rd|th)?[ \t\-]+(?P<m>{MONTH})\.?,?[ \t\-]+(?P<y>\d{{4}})\b"
                    ),
                ),
            ),
            (
                Layout::NameDayYear,
                compile_pattern(
                    "month-name day year",
                    &format!(
                        r"(?i)\b(?P<m>{MONTH})\.?[ \t]+(?P<d>\d{{1,2}})(?:st|nd|rd|th)?,?[ \t]+(?P<y>\d{{4}})\b"
                    ),
                ),
            ),
        ]
    });

static BIRTH_LINE: LazyLock<Result<Regex, StructuringError>> = LazyLock::new(|| {
    compile_pattern(
        "birth date vocabulary",
        r"(?i)\b(?:dob|d\.o\.b|date[ \t]+of[ \t]+birth|born)\b",
    )
});

/// Report date of a document, or `None` when no line holds a usable date.
pub fn resolve_date(text: &str) -> Option<NaiveDate> {
    let candidates: Vec<&str> = text.lines().filter(|line| !is_birth_line(line)).collect();
    first_date(&candidates)
}

/// First date in `text` by pattern order, with no birth-line filtering.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    first_date(&[text])
}

fn first_date(lines: &[&str]) -> Option<NaiveDate> {
    for (layout, compiled) in PATTERNS.iter() {
        let re = match compiled {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping date pattern");
                continue;
            }
        };
        for line in lines {
            if let Some(date) = re.captures_iter(line).find_map(|caps| to_date(*layout, &caps)) {
                return Some(date);
            }
        }
    }
    None
}

fn is_birth_line(line: &str) -> bool {
    match BIRTH_LINE.as_ref() {
        Ok(re) => re.is_match(line),
        Err(_) => false,
    }
}

fn to_date(layout: Layout, caps: &Captures<'_>) -> Option<NaiveDate> {
    let day: u32 = caps.name("d")?.as_str().parse().ok()?;
    let year: i32 = caps.name("y")?.as_str().parse().ok()?;
    let month_text = caps.name("m")?.as_str();
    let month = match layout {
        Layout::DayMonthYear | Layout::YearMonthDay => month_text.parse().ok()?,
        Layout::DayNameYear | Layout::NameDayYear => month_number(month_text)?,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
