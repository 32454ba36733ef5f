//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMMM, YYYY") // -> "01 January, 2020"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Convert a Moment.js format string to a chrono format string
///
/// Only the tokens that appear in site and frontmatter date formats are
/// supported; longer tokens are replaced before their prefixes.
fn moment_to_chrono_format(format: &str) -> String {
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of month
        ("DD", "%d"),
        ("D", "%-d"),
        // Hour
        ("HH", "%H"),
        ("hh", "%I"),
        // Minute (after MM has been consumed)
        ("mm", "%M"),
        // Second
        ("ss", "%S"),
        // Weekday
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();
    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
