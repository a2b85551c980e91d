use super::fields::{percentage, round2, Field, FieldValue};
use super::{Computation, Metric, MetricKind, NotComputed};
use crate::dataset::{Dataset, Value};

/// Column names the conversion rate can be resolved from, tried in order:
/// an explicit conversions/visitors pair, then a single per-row flag.
#[derive(Debug, Clone, Copy)]
pub struct ConversionSource<'a> {
    pub conversions: &'a str,
    pub visitors: &'a str,
    pub flag: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub value: f64,
    pub conversions: f64,
    pub visitors: f64,
}

impl Metric for ConversionResult {
    const KIND: MetricKind = MetricKind::ConversionRate;

    fn headline(&self) -> Option<(&'static str, f64)> {
        Some(("value", self.value))
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            ("value", FieldValue::Number(self.value)),
            ("conversions", FieldValue::tally(self.conversions)),
            ("visitors", FieldValue::tally(self.visitors)),
        ]
    }
}

fn column_sum(dataset: &Dataset, column: &str) -> Option<f64> {
    dataset
        .column(column)
        .map(|cells| cells.filter_map(Value::as_count).sum())
}

fn resolve_totals(dataset: &Dataset, source: ConversionSource<'_>) -> Computation<(f64, f64)> {
    if let (Some(conversions), Some(visitors)) = (
        column_sum(dataset, source.conversions),
        column_sum(dataset, source.visitors),
    ) {
        return Ok((conversions, visitors));
    }

    if let Some(flags) = dataset.column(source.flag) {
        let conversions = flags.filter(|cell| cell.is_truthy_flag()).count();
        return Ok((conversions as f64, dataset.len() as f64));
    }

    Err(NotComputed::NoConversionSource {
        conversions: source.conversions.to_string(),
        visitors: source.visitors.to_string(),
        flag: source.flag.to_string(),
    })
}

pub fn compute_conversion_rate(
    dataset: &Dataset,
    source: ConversionSource<'_>,
) -> Computation<ConversionResult> {
    let (conversions, visitors) = resolve_totals(dataset, source)?;

    if visitors <= 0.0 {
        return Err(NotComputed::ZeroVisitors);
    }
    if conversions < 0.0 || conversions > visitors {
        return Err(NotComputed::ConversionsExceedVisitors {
            conversions,
            visitors,
        });
    }

    Ok(ConversionResult {
        value: round2(percentage(conversions, visitors)),
        conversions,
        visitors,
    })
}
