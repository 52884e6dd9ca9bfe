use chrono::{DateTime, Local, SecondsFormat, Utc};

/// Current instant as RFC3339 UTC, e.g. "2026-08-26T10:30:00Z".
/// Used to stamp snapshots when they are saved.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Renders a stored timestamp in the local timezone for display.
/// Tries RFC3339 first, then dateparser for looser formats; an
/// unparseable string is shown as-is rather than erroring.
pub fn format_timestamp_to_local(timestamp_str: &str) -> String {
    if timestamp_str.is_empty() {
        return String::new();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp_str) {
        return dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string();
    }

    if let Ok(dt) = dateparser::parse(timestamp_str) {
        return dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string();
    }

    timestamp_str.to_string()
}
