//! KPI computation over a [`crate::dataset::Dataset`].
//!
//! Every calculation is a pure function of the dataset, the column names it reads
//! and fixed thresholds. It yields either a fully populated result or a
//! [`NotComputed`] reason; [`KpiEngine`] logs the reason and records only complete
//! results in its [`KpiStore`].

mod conversion;
mod engine;
mod fields;
mod lifecycle;
pub mod report;
mod sales;
mod satisfaction;
mod store;

pub use conversion::{compute_conversion_rate, ConversionResult, ConversionSource};
pub use engine::KpiEngine;
pub use fields::{BucketKey, Field, FieldValue, PeriodKey};
pub use lifecycle::{analyze_product_lifecycle, LifecycleResult};
pub use sales::{compute_sales_metrics, SalesResult};
pub use satisfaction::{compute_csat, compute_nps, CsatResult, NpsResult};
pub use store::KpiStore;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKind {
    Nps,
    Csat,
    ConversionRate,
    Sales,
    ProductLifecycle,
}

impl MetricKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Nps,
            Self::Csat,
            Self::ConversionRate,
            Self::Sales,
            Self::ProductLifecycle,
        ]
    }

    /// Store key of the metric.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nps => "nps",
            Self::Csat => "csat",
            Self::ConversionRate => "conversion_rate",
            Self::Sales => "sales",
            Self::ProductLifecycle => "product_lifecycle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a calculation produced no result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotComputed {
    #[error("column '{column}' not found")]
    MissingColumn { column: String },
    #[error("column '{column}' has no usable values")]
    NoValues { column: String },
    #[error("neither '{conversions}'+'{visitors}' nor '{flag}' columns are available")]
    NoConversionSource {
        conversions: String,
        visitors: String,
        flag: String,
    },
    #[error("visitor count is zero")]
    ZeroVisitors,
    #[error("conversions ({conversions}) exceed visitors ({visitors})")]
    ConversionsExceedVisitors { conversions: f64, visitors: f64 },
    #[error("neither '{status}' nor '{date}' columns are available")]
    NoLifecycleColumns { status: String, date: String },
}

pub type Computation<T> = Result<T, NotComputed>;

/// Common surface of every KPI result type.
pub trait Metric {
    const KIND: MetricKind;

    /// Name and value of the field that stands for the metric as a whole, if any.
    fn headline(&self) -> Option<(&'static str, f64)>;

    /// All fields in a stable order.
    fn fields(&self) -> Vec<Field>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum KpiResult {
    Nps(NpsResult),
    Csat(CsatResult),
    ConversionRate(ConversionResult),
    Sales(SalesResult),
    ProductLifecycle(LifecycleResult),
}

impl KpiResult {
    pub fn kind(&self) -> MetricKind {
        match self {
            Self::Nps(_) => NpsResult::KIND,
            Self::Csat(_) => CsatResult::KIND,
            Self::ConversionRate(_) => ConversionResult::KIND,
            Self::Sales(_) => SalesResult::KIND,
            Self::ProductLifecycle(_) => LifecycleResult::KIND,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn headline(&self) -> Option<(&'static str, f64)> {
        match self {
            Self::Nps(result) => result.headline(),
            Self::Csat(result) => result.headline(),
            Self::ConversionRate(result) => result.headline(),
            Self::Sales(result) => result.headline(),
            Self::ProductLifecycle(result) => result.headline(),
        }
    }

    pub fn fields(&self) -> Vec<Field> {
        match self {
            Self::Nps(result) => result.fields(),
            Self::Csat(result) => result.fields(),
            Self::ConversionRate(result) => result.fields(),
            Self::Sales(result) => result.fields(),
            Self::ProductLifecycle(result) => result.fields(),
        }
    }
}

impl From<NpsResult> for KpiResult {
    fn from(value: NpsResult) -> Self {
        Self::Nps(value)
    }
}

impl From<CsatResult> for KpiResult {
    fn from(value: CsatResult) -> Self {
        Self::Csat(value)
    }
}

impl From<ConversionResult> for KpiResult {
    fn from(value: ConversionResult) -> Self {
        Self::ConversionRate(value)
    }
}

impl From<SalesResult> for KpiResult {
    fn from(value: SalesResult) -> Self {
        Self::Sales(value)
    }
}

impl From<LifecycleResult> for KpiResult {
    fn from(value: LifecycleResult) -> Self {
        Self::ProductLifecycle(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_round_trip() {
        for kind in MetricKind::ordered() {
            assert_eq!(MetricKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(MetricKind::from_name("NPS"), Some(MetricKind::Nps));
        assert_eq!(MetricKind::from_name("churn"), None);
    }
}
