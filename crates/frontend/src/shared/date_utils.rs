/// Utilities for date, time and size formatting
///
/// Provides consistent formatting across the tables and the file browser
use chrono::{DateTime, Utc};

/// Format a timestamp to DD.MM.YYYY HH:MM:SS
/// Example: 2024-03-15T14:02:26.123Z -> "15.03.2024 14:02:26"
pub fn format_datetime(ts: &DateTime<Utc>) -> String {
    ts.format("%d.%m.%Y %H:%M:%S").to_string()
}

/// Same as [`format_datetime`], empty for a missing timestamp
pub fn format_optional_datetime(ts: Option<DateTime<Utc>>) -> String {
    ts.as_ref().map(format_datetime).unwrap_or_default()
}

/// Human-readable file size: "512 B", "1.5 KB", "2.0 MB"
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime() {
        let ts = "2024-03-15T14:02:26.123Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(format_datetime(&ts), "15.03.2024 14:02:26");
        assert_eq!(format_optional_datetime(Some(ts)), "15.03.2024 14:02:26");
        assert_eq!(format_optional_datetime(None), "");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.0 MB");
    }
}
