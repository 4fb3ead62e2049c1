//! Presentation helpers shared by anything that shows a document to a person.

use chrono::NaiveDate;

/// Formats an ISO date, or the date part of an ISO timestamp, as `Mar 01, 2024`.
/// Values that do not parse are returned as given.
pub fn format_date(value: &str) -> String {
    let date_part = value.split('T').next().unwrap_or_default().trim();
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%b %d, %Y").to_string(),
        Err(_) => value.to_string(),
    }
}
