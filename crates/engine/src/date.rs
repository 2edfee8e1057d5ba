//! Bill dates.

use chrono::{Datelike, NaiveDate, Utc};

use crate::{EngineError, ResultEngine};

const INPUT_FORMAT: &str = "%Y-%m-%d";

/// Renders a `YYYY-MM-DD` date as `"{year}年{month}月{day}日"`, without zero
/// padding.
///
/// ```rust
/// assert_eq!(engine::format_date("2024-03-21").unwrap(), "2024年3月21日");
/// ```
pub fn format_date(date: &str) -> ResultEngine<String> {
    let parsed = parse_date(date)?;
    Ok(format!(
        "{}年{}月{}日",
        parsed.year(),
        parsed.month(),
        parsed.day()
    ))
}

pub(crate) fn parse_date(date: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), INPUT_FORMAT)
        .map_err(|_| EngineError::MalformedDate(date.to_string()))
}

/// Today's date (UTC) in the bill input format.
pub(crate) fn today() -> String {
    Utc::now().date_naive().format(INPUT_FORMAT).to_string()
}
