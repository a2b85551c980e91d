use super::{
    ConversionResult, CsatResult, KpiResult, LifecycleResult, MetricKind, NpsResult, SalesResult,
};
use std::collections::BTreeMap;

/// Latest result per metric. A metric that is absent could not be computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiStore {
    results: BTreeMap<MetricKind, KpiResult>,
}

impl KpiStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `result` under its metric name, returning the result it replaced.
    pub fn insert(&mut self, result: impl Into<KpiResult>) -> Option<KpiResult> {
        let result = result.into();
        self.results.insert(result.kind(), result)
    }

    pub fn get(&self, kind: MetricKind) -> Option<&KpiResult> {
        self.results.get(&kind)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&KpiResult> {
        MetricKind::from_name(name).and_then(|kind| self.get(kind))
    }

    pub fn contains(&self, kind: MetricKind) -> bool {
        self.results.contains_key(&kind)
    }

    /// Results in display order.
    pub fn iter(&self) -> impl Iterator<Item = &KpiResult> {
        self.results.values()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn nps(&self) -> Option<&NpsResult> {
        match self.get(MetricKind::Nps) {
            Some(KpiResult::Nps(result)) => Some(result),
            _ => None,
        }
    }

    pub fn csat(&self) -> Option<&CsatResult> {
        match self.get(MetricKind::Csat) {
            Some(KpiResult::Csat(result)) => Some(result),
            _ => None,
        }
    }

    pub fn conversion_rate(&self) -> Option<&ConversionResult> {
        match self.get(MetricKind::ConversionRate) {
            Some(KpiResult::ConversionRate(result)) => Some(result),
            _ => None,
        }
    }

    pub fn sales(&self) -> Option<&SalesResult> {
        match self.get(MetricKind::Sales) {
            Some(KpiResult::Sales(result)) => Some(result),
            _ => None,
        }
    }

    pub fn product_lifecycle(&self) -> Option<&LifecycleResult> {
        match self.get(MetricKind::ProductLifecycle) {
            Some(KpiResult::ProductLifecycle(result)) => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversion(value: f64) -> ConversionResult {
        ConversionResult {
            value,
            conversions: value,
            visitors: 100.0,
        }
    }

    #[test]
    fn last_write_wins() {
        let mut store = KpiStore::new();
        assert!(store.insert(conversion(10.0)).is_none());
        let replaced = store.insert(conversion(12.0)).expect("previous result returned");

        assert_eq!(replaced, KpiResult::ConversionRate(conversion(10.0)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.conversion_rate().map(|r| r.value), Some(12.0));
        assert_eq!(
            store.get_by_name("conversion_rate").map(KpiResult::kind),
            Some(MetricKind::ConversionRate)
        );
    }

    #[test]
    fn iterates_in_display_order() {
        let mut store = KpiStore::new();
        store.insert(LifecycleResult::default());
        store.insert(conversion(1.0));
        let kinds: Vec<_> = store.iter().map(KpiResult::kind).collect();
        assert_eq!(
            kinds,
            vec![MetricKind::ConversionRate, MetricKind::ProductLifecycle]
        );
        assert!(store.nps().is_none());
    }
}
