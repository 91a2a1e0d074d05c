//! Display formatting for times, dates and condition text

use chrono::{Datelike, NaiveDate, Timelike};

/// Formats a time as "h:MM AM/PM"
pub fn format_clock<T: Timelike>(time: &T) -> String {
    let (is_pm, hour) = time.hour12();
    format!("{}:{:02} {}", hour, time.minute(), if is_pm { "PM" } else { "AM" })
}

/// Formats an hour of the day (0-23) as "12 AM", "3 PM", ...
pub fn format_hour(hour: u32) -> String {
    match hour % 24 {
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h > 12 => format!("{} PM", h - 12),
        h => format!("{} AM", h),
    }
}

/// Abbreviated weekday name, e.g. "Mon"
pub fn day_name(date: &NaiveDate) -> String {
    date.format("%a").to_string()
}

/// Short month and day, e.g. "Jan 5"
pub fn short_date(date: &NaiveDate) -> String {
    format!("{} {}", date.format("%b"), date.day())
}

/// Capitalizes the first letter of every word
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphanumeric() {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        at_word_start = !c.is_alphanumeric();
    }
    result
}

/// Rounds a temperature for display, halves toward +inf, avoiding "-0"
pub fn whole_degrees(value: f64) -> i64 {
    let rounded = (value + 0.5).floor();
    if rounded == 0.0 {
        0
    } else {
        rounded as i64
    }
}
