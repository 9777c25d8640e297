//! Serbian (Cyrillic) date formatting.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Month names in the genitive case, as used after a day number.
const MONTHS_GENITIVE: [&str; 12] = [
    "јануара",
    "фебруара",
    "марта",
    "априла",
    "маја",
    "јуна",
    "јула",
    "августа",
    "септембра",
    "октобра",
    "новембра",
    "децембра",
];

const MONTHS_NOMINATIVE: [&str; 12] = [
    "јануар",
    "фебруар",
    "март",
    "април",
    "мај",
    "јун",
    "јул",
    "август",
    "септембар",
    "октобар",
    "новембар",
    "децембар",
];

/// Weekday names, Monday first.
const WEEKDAYS: [&str; 7] = [
    "понедељак",
    "уторак",
    "среда",
    "четвртак",
    "петак",
    "субота",
    "недеља",
];

/// How a date is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `субота, 14. јуна 2025.`
    Full,
    /// `14. јуна 2025.`
    Short,
    /// `14.6.2025.`
    Numeric,
    /// `14. јун 2025`
    Nominative,
}

pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    let day = date.day();
    let month = date.month0() as usize;
    let year = date.year();

    match style {
        DateStyle::Full => {
            let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
            format!("{weekday}, {day}. {} {year}.", MONTHS_GENITIVE[month])
        }
        DateStyle::Short => format!("{day}. {} {year}.", MONTHS_GENITIVE[month]),
        DateStyle::Numeric => format!("{day}.{}.{year}.", month + 1),
        DateStyle::Nominative => format!("{day}. {} {year}", MONTHS_NOMINATIVE[month]),
    }
}

/// Parse a date written as `YYYY-MM-DD` or as an ISO date-time.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Parse a clock time such as `16:00` or `16:00:30`.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}
