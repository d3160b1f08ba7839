//! Date token normalization for statement lines.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // MM/DD/YYYY, MM-DD-YY, MM.DD.YYYY
    static ref DATE_MDY: Regex =
        Regex::new(r"^(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{2,4})$").unwrap();

    // YYYY-MM-DD
    static ref DATE_YMD: Regex = Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").unwrap();

    // "Jan 15, 2024" / "JANUARY 15 2024"
    static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)^(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2}),?\s+(\d{4})$"
    )
    .unwrap();
}

fn month_abbrev_to_number(name: &str) -> u32 {
    match name.to_lowercase().as_str() {
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
        _ => 0,
    }
}

fn parse_year(text: &str) -> i32 {
    let year: i32 = text.parse().unwrap_or(0);
    // Two-digit years land in the 2000s; statements do not go back to 1999.
    if text.len() == 2 { 2000 + year } else { year }
}

/// Normalize a date token into a calendar date.
///
/// Slash and dash forms are read month-first (US statement convention),
/// then ISO, then English month names. Returns `None` for anything that
/// does not resolve to a real calendar date, including day-of-month
/// overflow like `13/45/2024`.
pub fn normalize_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();

    if let Some(caps) = DATE_MDY.captures(token) {
        let month: u32 = caps[1].parse().unwrap_or(0);
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year = parse_year(&caps[3]);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
        return None;
    }

    if let Some(caps) = DATE_YMD.captures(token) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DATE_MONTH_NAME.captures(token) {
        let month = month_abbrev_to_number(&caps[1]);
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year: i32 = caps[3].parse().unwrap_or(0);
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    // Last resort for layouts the patterns above do not cover.
    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
}

const FALLBACK_FORMATS: &[&str] = &["%Y/%m/%d", "%d %B %Y", "%d %b %Y"];
