use super::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    // The wall-clock time as written; the offset must not move the calendar day.
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Calendar day of a cell, if it holds something date-like.
pub(crate) fn calendar_day(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(dt) => Some(dt.date()),
        Value::Text(text) => parse_datetime(text).map(|dt| dt.date()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_common_layouts() {
        assert_eq!(
            parse_datetime("2024-03-05T10:00:00Z").map(|dt| dt.date()),
            Some(day(2024, 3, 5))
        );
        assert_eq!(
            parse_datetime("2024-03-05 23:59:59").map(|dt| dt.date()),
            Some(day(2024, 3, 5))
        );
        assert_eq!(parse_datetime("2024/03/05").map(|dt| dt.date()), Some(day(2024, 3, 5)));
        assert_eq!(parse_datetime("03/05/2024").map(|dt| dt.date()), Some(day(2024, 3, 5)));
    }

    #[test]
    fn offset_timestamps_keep_their_written_day() {
        assert_eq!(
            calendar_day(&Value::infer("2024-02-01T01:00:00+05:00")),
            Some(day(2024, 2, 1))
        );
        assert_eq!(
            calendar_day(&Value::infer("2024-01-31T22:30:00-04:00")),
            Some(day(2024, 1, 31))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("not a date").is_none());
        assert!(parse_datetime("2024-13-40").is_none());
        assert!(calendar_day(&Value::Number(45000.0)).is_none());
        assert!(calendar_day(&Value::Missing).is_none());
    }
}
