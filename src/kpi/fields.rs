use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

/// Calendar bucket used by the lifecycle histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Month { year: i32, month: u32 },
    /// Monday-to-Sunday week identified by its Monday.
    Week { start: NaiveDate },
}

impl PeriodKey {
    pub fn month_of(day: NaiveDate) -> Self {
        Self::Month {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn week_of(day: NaiveDate) -> Self {
        let offset = i64::from(day.weekday().num_days_from_monday());
        Self::Week {
            start: day - Duration::days(offset),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Week { start } => {
                let end = *start + Duration::days(6);
                write!(f, "{}/{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
        }
    }
}

/// Key of one histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketKey {
    Label(String),
    Period(PeriodKey),
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => f.write_str(label),
            Self::Period(period) => period.fmt(f),
        }
    }
}

/// Typed value of one named field of a KPI result.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Count(u64),
    Number(f64),
    Histogram(Vec<(BucketKey, u64)>),
}

impl FieldValue {
    /// Whole, non-negative totals are reported as counts; anything else stays a number.
    pub fn tally(total: f64) -> Self {
        if total >= 0.0 && total.fract() == 0.0 && total <= u64::MAX as f64 {
            Self::Count(total as u64)
        } else {
            Self::Number(total)
        }
    }

    /// Text of a scalar field for flat tables; containers have none.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Count(count) => Some(count.to_string()),
            Self::Number(number) => Some(number.to_string()),
            Self::Histogram(_) => None,
        }
    }
}

/// One named field of a KPI result.
pub type Field = (&'static str, FieldValue);

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn percentage(part: f64, whole: f64) -> f64 {
    part / whole * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn month_and_week_keys_render_canonically() {
        // 2024-01-03 is a Wednesday
        assert_eq!(PeriodKey::month_of(day(2024, 1, 3)).to_string(), "2024-01");
        assert_eq!(
            PeriodKey::week_of(day(2024, 1, 3)).to_string(),
            "2024-01-01/2024-01-07"
        );
        assert_eq!(
            PeriodKey::week_of(day(2024, 1, 7)),
            PeriodKey::week_of(day(2024, 1, 1))
        );
        assert_ne!(
            PeriodKey::week_of(day(2024, 1, 8)),
            PeriodKey::week_of(day(2024, 1, 7))
        );
    }

    #[test]
    fn periods_sort_chronologically() {
        let mut keys = vec![
            PeriodKey::month_of(day(2024, 3, 1)),
            PeriodKey::month_of(day(2023, 12, 1)),
            PeriodKey::month_of(day(2024, 1, 1)),
        ];
        keys.sort();
        let rendered: Vec<_> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["2023-12", "2024-01", "2024-03"]);
    }

    #[test]
    fn whole_totals_become_counts() {
        assert_eq!(FieldValue::tally(500.0), FieldValue::Count(500));
        assert_eq!(FieldValue::tally(0.0), FieldValue::Count(0));
        assert_eq!(FieldValue::tally(2.5), FieldValue::Number(2.5));
        assert_eq!(FieldValue::tally(-3.0), FieldValue::Number(-3.0));
        assert_eq!(FieldValue::Count(7).scalar_text().as_deref(), Some("7"));
        assert_eq!(FieldValue::Histogram(Vec::new()).scalar_text(), None);
    }

    #[test]
    fn round2_matches_two_decimal_reporting() {
        assert_eq!(round2(200.0 / 3.0), 66.67);
        assert_eq!(round2(-12.345_6), -12.35);
    }
}
