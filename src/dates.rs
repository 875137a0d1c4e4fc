// src/dates.rs
//! Unified date interpretation for free-text employment periods and
//! certification dates. Every downstream duration/recency computation goes
//! through here; unparsable input degrades to "unknown" instead of failing.

use chrono::{Duration, NaiveDate};

/// End date within this window of "now" counts as the current role.
pub const CURRENT_WINDOW_DAYS: i64 = 30;
/// End date within this window counts as recent.
pub const RECENT_WINDOW_DAYS: i64 = 180;
/// End date within this window counts as established.
pub const ESTABLISHED_WINDOW_DAYS: i64 = 730;
/// Certifications obtained within this window count as recent.
pub const CERT_RECENT_WINDOW_DAYS: i64 = 180;

/// Sentinel for unparsable standalone dates. Recency checks against it
/// always come out "not recent".
pub const EARLIEST: NaiveDate = NaiveDate::MIN;

/// Parse an employment period of the form `"<start> - <end>"`.
///
/// Either side failing to parse resolves the whole range to `(None, None)`;
/// callers must exclude such entries from duration sums rather than treat
/// them as zero-length.
pub fn parse_period(period: &str, now: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let parts: Vec<&str> = period.split(" - ").collect();
    if parts.len() != 2 {
        return (None, None);
    }

    match (parse_period_part(parts[0], now), parse_period_part(parts[1], now)) {
        (Some(start), Some(end)) => (Some(start), Some(end)),
        _ => (None, None),
    }
}

/// Parse one side of a period string. "current"/"present" map to now.
/// Accepted formats, first match wins: month/year, year/month, year-month,
/// month-year, year.
fn parse_period_part(text: &str, now: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("current") || text.eq_ignore_ascii_case("present") {
        return Some(now);
    }

    parse_month_year(text, '/', true)
        .or_else(|| parse_month_year(text, '/', false))
        .or_else(|| parse_month_year(text, '-', false))
        .or_else(|| parse_month_year(text, '-', true))
        .or_else(|| parse_year_only(text))
}

/// Parse a standalone date (certification dates). Accepted formats: year,
/// year/month, year-month, full dates. Unparsable input resolves to the
/// [`EARLIEST`] sentinel so recency comparisons degrade to "not recent".
pub fn parse_standalone_date(text: &str) -> NaiveDate {
    let text = text.trim();

    if let Some(date) = parse_year_only(text)
        .or_else(|| parse_month_year(text, '/', false))
        .or_else(|| parse_month_year(text, '-', false))
        .or_else(|| NaiveDate::parse_from_str(text, "%Y/%m/%d").ok())
        .or_else(|| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
    {
        return date;
    }

    // Fallback: first whitespace token as a bare year
    text.split_whitespace()
        .next()
        .and_then(parse_year_only)
        .unwrap_or(EARLIEST)
}

fn parse_month_year(text: &str, sep: char, month_first: bool) -> Option<NaiveDate> {
    let (a, b) = text.split_once(sep)?;
    let a: i32 = a.trim().parse().ok()?;
    let b: i32 = b.trim().parse().ok()?;
    let (month, year) = if month_first { (a, b) } else { (b, a) };
    if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month as u32, 1)
}

fn parse_year_only(text: &str) -> Option<NaiveDate> {
    let year: i32 = text.trim().parse().ok()?;
    if !(1000..=9999).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Signed duration in days. Reversed ranges yield negative values; duration
/// sums clamp at zero per entry.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Convert a day count to fractional years.
pub fn days_to_years(days: i64) -> f64 {
    days as f64 / 365.0
}

/// Whether `date` falls within the trailing `window_days` of `now`.
pub fn is_within(date: NaiveDate, now: NaiveDate, window_days: i64) -> bool {
    date >= now - Duration::days(window_days)
}

/// Whether a free-text certification date falls within the last six months.
pub fn is_recent_certification(date_text: &str, now: NaiveDate) -> bool {
    is_within(parse_standalone_date(date_text), now, CERT_RECENT_WINDOW_DAYS)
}
