use super::fields::{BucketKey, Field, FieldValue, PeriodKey};
use super::{Computation, Metric, MetricKind, NotComputed};
use crate::dataset::{Dataset, Value};
use std::collections::BTreeMap;

/// Record counts per status and per calendar period.
///
/// Each histogram is present only when its source column exists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LifecycleResult {
    pub by_status: Option<BTreeMap<String, u64>>,
    pub by_month: Option<BTreeMap<PeriodKey, u64>>,
    pub by_week: Option<BTreeMap<PeriodKey, u64>>,
}

impl Metric for LifecycleResult {
    const KIND: MetricKind = MetricKind::ProductLifecycle;

    fn headline(&self) -> Option<(&'static str, f64)> {
        None
    }

    fn fields(&self) -> Vec<Field> {
        let mut fields = Vec::new();
        if let Some(by_status) = &self.by_status {
            let buckets = by_status
                .iter()
                .map(|(status, count)| (BucketKey::Label(status.clone()), *count))
                .collect();
            fields.push(("by_status", FieldValue::Histogram(buckets)));
        }
        for (name, histogram) in [("by_month", &self.by_month), ("by_week", &self.by_week)] {
            if let Some(histogram) = histogram {
                let buckets = histogram
                    .iter()
                    .map(|(period, count)| (BucketKey::Period(*period), *count))
                    .collect();
                fields.push((name, FieldValue::Histogram(buckets)));
            }
        }
        fields
    }
}

fn status_histogram<'a>(cells: impl Iterator<Item = &'a Value>) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for cell in cells.filter(|cell| !cell.is_missing()) {
        *counts.entry(cell.to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn analyze_product_lifecycle(
    dataset: &Dataset,
    date_column: &str,
    status_column: &str,
) -> Computation<LifecycleResult> {
    let by_status = dataset.column(status_column).map(status_histogram);

    let (by_month, by_week) = match dataset.parsed_dates(date_column) {
        Some(days) => {
            let mut months = BTreeMap::new();
            let mut weeks = BTreeMap::new();
            for day in days.iter().flatten() {
                *months.entry(PeriodKey::month_of(*day)).or_insert(0) += 1;
                *weeks.entry(PeriodKey::week_of(*day)).or_insert(0) += 1;
            }
            (Some(months), Some(weeks))
        }
        None => (None, None),
    };

    if by_status.is_none() && by_month.is_none() {
        return Err(NotComputed::NoLifecycleColumns {
            status: status_column.to_string(),
            date: date_column.to_string(),
        });
    }

    Ok(LifecycleResult {
        by_status,
        by_month,
        by_week,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;

    #[test]
    fn histograms_follow_column_availability() {
        let records = ["2024-01-01", "2024-01-07", "2024-01-08", "2024-02-01", "bad"]
            .iter()
            .map(|raw| Record::new(vec![Value::infer(raw)]))
            .collect();
        let dataset = Dataset::from_columns(["date"], records).expect("dataset builds");

        let lifecycle =
            analyze_product_lifecycle(&dataset, "date", "status").expect("lifecycle computes");
        assert!(lifecycle.by_status.is_none());

        let months = lifecycle.by_month.expect("monthly histogram");
        let rendered: Vec<_> = months.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        assert_eq!(
            rendered,
            vec![("2024-01".to_string(), 3), ("2024-02".to_string(), 1)]
        );

        let weeks = lifecycle.by_week.expect("weekly histogram");
        assert_eq!(weeks.values().sum::<u64>(), 4);
        let first_monday = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        assert_eq!(weeks.get(&PeriodKey::week_of(first_monday)), Some(&2));
    }

    #[test]
    fn status_counts_skip_missing_cells() {
        let records = vec![
            Record::new(vec![Value::Text("Activo".into())]),
            Record::new(vec![Value::Text("Nuevo".into())]),
            Record::new(vec![Value::Text("Activo".into())]),
            Record::new(vec![Value::Missing]),
        ];
        let dataset = Dataset::from_columns(["status"], records).expect("dataset builds");

        let lifecycle =
            analyze_product_lifecycle(&dataset, "date", "status").expect("lifecycle computes");
        let by_status = lifecycle.by_status.expect("status histogram");
        assert_eq!(by_status.get("Activo"), Some(&2));
        assert_eq!(by_status.get("Nuevo"), Some(&1));
        assert_eq!(by_status.len(), 2);
        assert!(lifecycle.by_month.is_none());
        assert!(lifecycle.by_week.is_none());
    }

    #[test]
    fn offset_timestamps_bucket_by_written_month() {
        let records = ["2024-02-01T01:00:00+05:00", "2024-01-31T23:00:00-03:00"]
            .iter()
            .map(|raw| Record::new(vec![Value::infer(raw)]))
            .collect();
        let dataset = Dataset::from_columns(["date"], records).expect("dataset builds");

        let lifecycle =
            analyze_product_lifecycle(&dataset, "date", "status").expect("lifecycle computes");
        let months: Vec<_> = lifecycle
            .by_month
            .expect("monthly histogram")
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        assert_eq!(
            months,
            vec![("2024-01".to_string(), 1), ("2024-02".to_string(), 1)]
        );
    }

    #[test]
    fn no_source_columns_is_not_computed() {
        let dataset = Dataset::from_columns(["sales"], Vec::new()).expect("dataset builds");
        assert!(matches!(
            analyze_product_lifecycle(&dataset, "date", "status"),
            Err(NotComputed::NoLifecycleColumns { .. })
        ));
    }
}
