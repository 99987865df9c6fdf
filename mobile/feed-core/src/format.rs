//! Display helpers for comment metadata

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use hottake_api::Comment;

/// `"3:07 pm, Mar 4"`
pub fn time_label<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format("%-I:%M %P, %b %-d").to_string()
}

/// Timestamp line for a comment in the viewer's zone. Comments without a
/// parseable date show the current time.
pub fn comment_meta(comment: &Comment) -> String {
    let local = comment
        .timestamp()
        .map(|t| t.with_timezone(&Local))
        .unwrap_or_else(Local::now);

    if comment.is_dev() {
        format!("{} · Dev", time_label(&local))
    } else {
        time_label(&local)
    }
}
