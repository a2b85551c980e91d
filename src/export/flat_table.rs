use super::{finish_csv, ExportError, Exporter, UTF8_BOM};
use crate::dashboard::DashboardSnapshot;
use crate::kpi::{KpiResult, MetricKind};
use chrono::{Local, NaiveDate};
use serde::Serialize;

const HEADER: [&str; 4] = ["Metric", "Valor", "Categoria", "Fecha"];

/// One row per headline metric, the shape BI tools like Tableau ingest directly.
#[derive(Debug, Clone, Default)]
pub struct FlatMetricTable {
    export_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct FlatMetricRow {
    metric: &'static str,
    value: f64,
    category: &'static str,
    date: String,
}

impl FlatMetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the `Fecha` column instead of using today's date.
    pub fn with_export_date(mut self, date: NaiveDate) -> Self {
        self.export_date = Some(date);
        self
    }
}

/// Label and category of metrics allowed in the flat table.
fn allow_listed(kind: MetricKind) -> Option<(&'static str, &'static str)> {
    match kind {
        MetricKind::Nps => Some(("NPS", "Satisfaction")),
        MetricKind::Csat => Some(("CSAT", "Satisfaction")),
        MetricKind::ConversionRate => Some(("Conversion Rate", "Performance")),
        MetricKind::Sales => Some(("Total Sales", "Sales")),
        MetricKind::ProductLifecycle => None,
    }
}

fn row(result: &KpiResult, date: &str) -> Option<FlatMetricRow> {
    let (metric, category) = allow_listed(result.kind())?;
    let (_, value) = result.headline()?;
    Some(FlatMetricRow {
        metric,
        value,
        category,
        date: date.to_string(),
    })
}

impl Exporter for FlatMetricTable {
    const DEFAULT_FILE_NAME: &'static str = "tableau_data.csv";

    fn render(&self, snapshot: &DashboardSnapshot) -> Result<Vec<u8>, ExportError> {
        let date = self
            .export_date
            .unwrap_or_else(|| Local::now().date_naive())
            .format("%Y-%m-%d")
            .to_string();

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(UTF8_BOM.to_vec());
        writer.write_record(HEADER)?;
        for row in snapshot.kpis().iter().filter_map(|result| row(result, &date)) {
            writer.serialize(row)?;
        }

        finish_csv(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardAssembler;
    use crate::dataset::Dataset;
    use crate::kpi::{KpiStore, LifecycleResult, SalesResult};

    #[test]
    fn sales_row_uses_total_and_lifecycle_is_skipped() {
        let dataset = Dataset::from_columns(["sales"], Vec::new()).expect("dataset builds");
        let mut store = KpiStore::new();
        store.insert(SalesResult {
            total: 600.0,
            average: 200.0,
            median: 200.0,
            growth: Some(200.0),
        });
        store.insert(LifecycleResult::default());
        let snapshot = DashboardAssembler::new(&dataset, &store).build_snapshot();

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
        let bytes = FlatMetricTable::new()
            .with_export_date(date)
            .render(&snapshot)
            .expect("table renders");

        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).expect("utf-8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Metric,Valor,Categoria,Fecha");
        let cells: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(cells[0], "Total Sales");
        assert_eq!(cells[1].parse::<f64>().expect("numeric value"), 600.0);
        assert_eq!(cells[2], "Sales");
        assert_eq!(cells[3], "2024-05-01");
    }
}
