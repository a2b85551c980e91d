use super::fields::{percentage, round2, Field, FieldValue};
use super::{Computation, Metric, MetricKind, NotComputed};
use crate::dataset::{Dataset, Value};

const PROMOTER_MIN: f64 = 9.0;
const DETRACTOR_MAX: f64 = 6.0;
const SATISFIED_MIN: f64 = 4.0;

/// Net Promoter Score on a 0-10 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct NpsResult {
    pub value: f64,
    pub promoters: u64,
    pub passives: u64,
    pub detractors: u64,
    pub total_responses: u64,
    pub pct_promoters: f64,
    pub pct_detractors: f64,
}

impl Metric for NpsResult {
    const KIND: MetricKind = MetricKind::Nps;

    fn headline(&self) -> Option<(&'static str, f64)> {
        Some(("value", self.value))
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            ("value", FieldValue::Number(self.value)),
            ("promoters", FieldValue::Count(self.promoters)),
            ("passives", FieldValue::Count(self.passives)),
            ("detractors", FieldValue::Count(self.detractors)),
            ("total_responses", FieldValue::Count(self.total_responses)),
            ("pct_promoters", FieldValue::Number(self.pct_promoters)),
            ("pct_detractors", FieldValue::Number(self.pct_detractors)),
        ]
    }
}

/// Customer satisfaction on a 1-5 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct CsatResult {
    pub value: f64,
    pub satisfied: u64,
    pub total_responses: u64,
    pub average: f64,
}

impl Metric for CsatResult {
    const KIND: MetricKind = MetricKind::Csat;

    fn headline(&self) -> Option<(&'static str, f64)> {
        Some(("value", self.value))
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            ("value", FieldValue::Number(self.value)),
            ("satisfied", FieldValue::Count(self.satisfied)),
            ("total_responses", FieldValue::Count(self.total_responses)),
            ("average", FieldValue::Number(self.average)),
        ]
    }
}

/// Non-missing numeric scores of a column. Text cells are treated as missing.
fn scores(dataset: &Dataset, column: &str) -> Computation<Vec<f64>> {
    let cells = dataset
        .column(column)
        .ok_or_else(|| NotComputed::MissingColumn {
            column: column.to_string(),
        })?;

    let scores: Vec<f64> = cells.filter_map(Value::as_number).collect();
    if scores.is_empty() {
        return Err(NotComputed::NoValues {
            column: column.to_string(),
        });
    }

    Ok(scores)
}

pub fn compute_nps(dataset: &Dataset, column: &str) -> Computation<NpsResult> {
    let scores = scores(dataset, column)?;

    let promoters = scores.iter().filter(|&&s| s >= PROMOTER_MIN).count() as u64;
    let detractors = scores.iter().filter(|&&s| s <= DETRACTOR_MAX).count() as u64;
    let total = scores.len() as u64;
    let passives = total - promoters - detractors;

    let pct_promoters = percentage(promoters as f64, total as f64);
    let pct_detractors = percentage(detractors as f64, total as f64);

    Ok(NpsResult {
        value: round2(pct_promoters - pct_detractors),
        promoters,
        passives,
        detractors,
        total_responses: total,
        pct_promoters: round2(pct_promoters),
        pct_detractors: round2(pct_detractors),
    })
}

pub fn compute_csat(dataset: &Dataset, column: &str) -> Computation<CsatResult> {
    let scores = scores(dataset, column)?;

    let satisfied = scores.iter().filter(|&&s| s >= SATISFIED_MIN).count() as u64;
    let total = scores.len() as u64;
    let average = scores.iter().sum::<f64>() / total as f64;

    Ok(CsatResult {
        value: round2(percentage(satisfied as f64, total as f64)),
        satisfied,
        total_responses: total,
        average: round2(average),
    })
}
