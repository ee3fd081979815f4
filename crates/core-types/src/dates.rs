//! Parsing and rendering of the date values used by date columns and filter bounds.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a date or date-time string. A bare date is interpreted as midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Renders a date as ISO-8601: `YYYY-MM-DD` at midnight, full date-time otherwise.
pub fn format_iso(dt: &NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_dates_parse_to_midnight() {
        let dt = parse_datetime("2024-03-05").unwrap();
        assert_eq!(dt, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(format_iso(&dt), "2024-03-05");
    }

    #[test]
    fn date_times_keep_their_time_component() {
        let dt = parse_datetime("2024-03-05 14:30:00").unwrap();
        assert_eq!(format_iso(&dt), "2024-03-05T14:30:00");
        assert_eq!(parse_datetime("2024-03-05T14:30:00"), Some(dt));
    }

    #[test]
    fn garbage_does_not_parse() {
        assert_eq!(parse_datetime("not-a-date"), None);
        assert_eq!(parse_datetime("2024-13-01"), None);
        assert_eq!(parse_datetime("   "), None);
    }
}
