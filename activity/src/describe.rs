//! Human-readable rendering of activity records.

use chrono::DateTime;
use chrono::Utc;

use crate::types::ActivityRecord;
use crate::types::ActivityType;

pub fn verb(kind: ActivityType) -> &'static str {
    match kind {
        ActivityType::Create => "created",
        ActivityType::Update => "updated",
        ActivityType::Delete => "deleted",
    }
}

/// `"<user> <verb> <item name>"`, e.g. `admin created Widget`.
pub fn headline(record: &ActivityRecord) -> String {
    format!(
        "{} {} {}",
        record.user,
        verb(record.kind),
        record.item_name
    )
}

/// Age of `timestamp` relative to `now`, coarsened the way the activity
/// feed shows it. Anything older than 30 days prints as its date.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        ago(minutes, "minute")
    } else if hours < 24 {
        ago(hours, "hour")
    } else if days < 30 {
        ago(days, "day")
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

fn ago(n: i64, unit: &str) -> String {
    let plural = if n > 1 { "s" } else { "" };
    format!("{n} {unit}{plural} ago")
}

/// One feed line: `[TYPE] headline (age)` plus the description, if any.
pub fn feed_line(record: &ActivityRecord, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "[{}] {} ({})",
        record.kind,
        headline(record),
        relative_time(record.timestamp, now)
    );
    if let Some(description) = record.description() {
        line.push_str(" - ");
        line.push_str(description);
    }
    line
}
