use super::fields::{round2, Field, FieldValue};
use super::{Computation, Metric, MetricKind, NotComputed};
use crate::dataset::{Dataset, Value};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SalesResult {
    pub total: f64,
    pub average: f64,
    pub median: f64,
    /// Percent change between the chronologically first and last day totals.
    pub growth: Option<f64>,
}

impl Metric for SalesResult {
    const KIND: MetricKind = MetricKind::Sales;

    fn headline(&self) -> Option<(&'static str, f64)> {
        Some(("total", self.total))
    }

    fn fields(&self) -> Vec<Field> {
        let mut fields = vec![
            ("total", FieldValue::Number(self.total)),
            ("average", FieldValue::Number(self.average)),
            ("median", FieldValue::Number(self.median)),
        ];
        if let Some(growth) = self.growth {
            fields.push(("growth", FieldValue::Number(growth)));
        }
        fields
    }
}

fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sales per calendar day, keyed chronologically.
fn daily_totals(
    dataset: &Dataset,
    sales_column: &str,
    date_column: &str,
) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    let (Some(days), Some(sales)) = (
        dataset.parsed_dates(date_column),
        dataset.column(sales_column),
    ) else {
        return totals;
    };

    for (day, amount) in days.iter().zip(sales) {
        if let (Some(day), Some(amount)) = (day, amount.as_number()) {
            *totals.entry(*day).or_insert(0.0) += amount;
        }
    }

    totals
}

fn growth(totals: &BTreeMap<NaiveDate, f64>) -> Option<f64> {
    if totals.len() < 2 {
        return None;
    }

    let (_, first) = totals.first_key_value()?;
    let (_, last) = totals.last_key_value()?;
    if *first == 0.0 {
        return None;
    }

    Some(round2((last - first) / first * 100.0))
}

pub fn compute_sales_metrics(
    dataset: &Dataset,
    sales_column: &str,
    date_column: &str,
) -> Computation<SalesResult> {
    let cells = dataset
        .column(sales_column)
        .ok_or_else(|| NotComputed::MissingColumn {
            column: sales_column.to_string(),
        })?;

    let mut amounts: Vec<f64> = cells.filter_map(Value::as_number).collect();
    if amounts.is_empty() {
        return Err(NotComputed::NoValues {
            column: sales_column.to_string(),
        });
    }
    amounts.sort_by(f64::total_cmp);

    let total: f64 = amounts.iter().sum();
    let average = total / amounts.len() as f64;

    let growth = if dataset.has_column(date_column) {
        growth(&daily_totals(dataset, sales_column, date_column))
    } else {
        None
    };

    Ok(SalesResult {
        total: round2(total),
        average: round2(average),
        median: round2(median(&amounts)),
        growth,
    })
}
