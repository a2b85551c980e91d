use super::{ExportError, Exporter};
use crate::dashboard::{DashboardSnapshot, DocumentValue};
use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use serde::Serialize;
use serde_json::Value as Json;

/// JSON document listing every metric that has a headline value, for Power BI style
/// consumers.
#[derive(Debug, Clone, Default)]
pub struct MetricDocument {
    timestamp: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Serialize)]
struct MetricDocumentBody {
    timestamp: String,
    metrics: Vec<MetricEntry>,
}

#[derive(Debug, Serialize)]
struct MetricEntry {
    name: String,
    value: Json,
    details: Json,
}

impl MetricDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl Exporter for MetricDocument {
    const DEFAULT_FILE_NAME: &'static str = "powerbi_data.json";

    fn render(&self, snapshot: &DashboardSnapshot) -> Result<Vec<u8>, ExportError> {
        let timestamp = self.timestamp.unwrap_or_else(|| Local::now().into());

        let metrics = snapshot
            .kpis()
            .iter()
            .filter_map(|result| {
                let (_, value) = result.headline()?;
                Some(MetricEntry {
                    name: result.name().to_ascii_uppercase(),
                    value: DocumentValue::Number(value).to_json(),
                    details: DocumentValue::from(result).to_json(),
                })
            })
            .collect();

        let body = MetricDocumentBody {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Micros, false),
            metrics,
        };

        Ok(serde_json::to_vec_pretty(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardAssembler;
    use crate::dataset::Dataset;
    use crate::kpi::{ConversionResult, KpiStore, LifecycleResult};

    #[test]
    fn skips_metrics_without_headline() {
        let dataset = Dataset::from_columns(["conversion"], Vec::new()).expect("dataset builds");
        let mut store = KpiStore::new();
        store.insert(ConversionResult {
            value: 15.0,
            conversions: 15.0,
            visitors: 100.0,
        });
        store.insert(LifecycleResult::default());
        let snapshot = DashboardAssembler::new(&dataset, &store).build_snapshot();

        let timestamp = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00")
            .expect("valid timestamp");
        let bytes = MetricDocument::new()
            .with_timestamp(timestamp)
            .render(&snapshot)
            .expect("document renders");
        let json: Json = serde_json::from_slice(&bytes).expect("valid JSON");

        assert_eq!(json["timestamp"], "2024-05-01T12:00:00.000000+02:00");
        let metrics = json["metrics"].as_array().expect("metrics array");
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0]["name"], "CONVERSION_RATE");
        assert_eq!(metrics[0]["value"], 15.0);
        assert_eq!(metrics[0]["details"]["visitors"], 100);
        assert!(metrics[0]["details"]["conversions"].is_u64());
    }
}
