use super::{
    analyze_product_lifecycle, compute_conversion_rate, compute_csat, compute_nps,
    compute_sales_metrics, Computation, ConversionSource, KpiResult, KpiStore, Metric,
};
use crate::config::ColumnMapping;
use crate::dataset::Dataset;
use tracing::{info, warn};

/// Runs KPI calculations over one dataset and accumulates the results.
///
/// The engine is the only writer of its store; readers borrow it through
/// [`KpiEngine::store`] once calculations are sequenced.
#[derive(Debug)]
pub struct KpiEngine<'a> {
    dataset: &'a Dataset,
    store: KpiStore,
}

impl<'a> KpiEngine<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self::with_store(dataset, KpiStore::new())
    }

    pub fn with_store(dataset: &'a Dataset, store: KpiStore) -> Self {
        Self { dataset, store }
    }

    pub fn store(&self) -> &KpiStore {
        &self.store
    }

    pub fn into_store(self) -> KpiStore {
        self.store
    }

    pub fn calculate_nps(&mut self, column: &str) -> Option<&KpiResult> {
        let outcome = compute_nps(self.dataset, column);
        if let Ok(nps) = &outcome {
            info!(value = nps.value, responses = nps.total_responses, "NPS calculated");
        }
        self.record(outcome)
    }

    pub fn calculate_csat(&mut self, column: &str) -> Option<&KpiResult> {
        let outcome = compute_csat(self.dataset, column);
        if let Ok(csat) = &outcome {
            info!(value = csat.value, responses = csat.total_responses, "CSAT calculated");
        }
        self.record(outcome)
    }

    pub fn calculate_conversion_rate(
        &mut self,
        source: ConversionSource<'_>,
    ) -> Option<&KpiResult> {
        let outcome = compute_conversion_rate(self.dataset, source);
        if let Ok(rate) = &outcome {
            info!(
                value = rate.value,
                conversions = rate.conversions,
                visitors = rate.visitors,
                "conversion rate calculated"
            );
        }
        self.record(outcome)
    }

    pub fn calculate_sales_metrics(
        &mut self,
        sales_column: &str,
        date_column: &str,
    ) -> Option<&KpiResult> {
        let outcome = compute_sales_metrics(self.dataset, sales_column, date_column);
        if let Ok(sales) = &outcome {
            info!(total = sales.total, growth = ?sales.growth, "sales metrics calculated");
        }
        self.record(outcome)
    }

    pub fn analyze_product_lifecycle(
        &mut self,
        date_column: &str,
        status_column: &str,
    ) -> Option<&KpiResult> {
        let outcome = analyze_product_lifecycle(self.dataset, date_column, status_column);
        if outcome.is_ok() {
            info!("product lifecycle analysis completed");
        }
        self.record(outcome)
    }

    /// Runs every calculation with the configured column names.
    pub fn calculate_all(&mut self, columns: &ColumnMapping) -> &KpiStore {
        self.calculate_nps(&columns.nps);
        self.calculate_csat(&columns.csat);
        self.calculate_conversion_rate(columns.conversion_source());
        self.calculate_sales_metrics(&columns.sales, &columns.date);
        self.analyze_product_lifecycle(&columns.date, &columns.status);
        &self.store
    }

    fn record<T>(&mut self, outcome: Computation<T>) -> Option<&KpiResult>
    where
        T: Metric + Into<KpiResult>,
    {
        match outcome {
            Ok(result) => {
                self.store.insert(result);
                self.store.get(T::KIND)
            }
            Err(reason) => {
                warn!(metric = %T::KIND, %reason, "metric not computed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Record, Value};
    use crate::kpi::MetricKind;

    fn survey() -> Dataset {
        let records = [9.0, 10.0, 3.0]
            .into_iter()
            .map(|score| Record::new(vec![Value::Number(score)]))
            .collect();
        Dataset::from_columns(["nps_score"], records).expect("dataset builds")
    }

    #[test]
    fn failed_calculation_leaves_previous_result() {
        let dataset = survey();
        let mut engine = KpiEngine::new(&dataset);

        assert!(engine.calculate_nps("nps_score").is_some());
        let before = engine.store().clone();

        assert!(engine.calculate_nps("missing_column").is_none());
        assert_eq!(engine.store(), &before);
    }

    #[test]
    fn calculate_all_skips_unavailable_metrics() {
        let dataset = survey();
        let mut engine = KpiEngine::new(&dataset);
        let store = engine.calculate_all(&ColumnMapping::default());

        assert_eq!(store.len(), 1);
        assert!(store.contains(MetricKind::Nps));
    }

    #[test]
    fn repeated_calculation_is_idempotent() {
        let dataset = survey();
        let mut engine = KpiEngine::new(&dataset);
        let first = engine.calculate_nps("nps_score").cloned();
        let second = engine.calculate_nps("nps_score").cloned();
        assert_eq!(first, second);
    }
}
