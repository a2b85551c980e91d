//! Immutable dashboard snapshots and their structured JSON document.

mod document;

pub use document::DocumentValue;

use crate::dataset::Dataset;
use crate::export::{write_payload, ExportError};
use crate::kpi::KpiStore;
use chrono::{DateTime, FixedOffset, Local};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_DOCUMENT_FILE: &str = "dashboard_data.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub record_count: usize,
    pub column_names: Vec<String>,
}

impl DatasetSummary {
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            record_count: dataset.len(),
            column_names: dataset.column_names().to_vec(),
        }
    }
}

/// Timestamped copy of every computed KPI plus the dataset summary.
///
/// A snapshot owns all of its data; later engine writes never reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    timestamp: DateTime<FixedOffset>,
    kpis: KpiStore,
    summary: DatasetSummary,
}

impl DashboardSnapshot {
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn kpis(&self) -> &KpiStore {
        &self.kpis
    }

    pub fn summary(&self) -> &DatasetSummary {
        &self.summary
    }

    pub fn to_document(&self) -> DocumentValue {
        DocumentValue::Mapping(vec![
            (
                "timestamp".to_string(),
                DocumentValue::Timestamp(self.timestamp),
            ),
            ("kpis".to_string(), DocumentValue::from(&self.kpis)),
            (
                "summary".to_string(),
                DocumentValue::Mapping(vec![
                    (
                        "record_count".to_string(),
                        DocumentValue::Count(self.summary.record_count as u64),
                    ),
                    (
                        "column_names".to_string(),
                        DocumentValue::Sequence(
                            self.summary
                                .column_names
                                .iter()
                                .cloned()
                                .map(DocumentValue::Text)
                                .collect(),
                        ),
                    ),
                ]),
            ),
        ])
    }
}

/// Bundles the current KPI store with dataset metadata.
#[derive(Debug, Clone, Copy)]
pub struct DashboardAssembler<'a> {
    dataset: &'a Dataset,
    store: &'a KpiStore,
}

impl<'a> DashboardAssembler<'a> {
    pub fn new(dataset: &'a Dataset, store: &'a KpiStore) -> Self {
        Self { dataset, store }
    }

    pub fn build_snapshot(&self) -> DashboardSnapshot {
        self.build_snapshot_at(Local::now().into())
    }

    pub fn build_snapshot_at(&self, timestamp: DateTime<FixedOffset>) -> DashboardSnapshot {
        DashboardSnapshot {
            timestamp,
            kpis: self.store.clone(),
            summary: DatasetSummary::of(self.dataset),
        }
    }
}

/// Writes the snapshot as one pretty-printed JSON document and returns the path written.
pub fn export_to_structured_document(
    snapshot: &DashboardSnapshot,
    path: impl AsRef<Path>,
) -> Result<PathBuf, ExportError> {
    let path = path.as_ref();
    let payload = serde_json::to_vec_pretty(&snapshot.to_document().to_json())?;
    write_payload(path, &payload)?;
    info!(path = %path.display(), metrics = snapshot.kpis().len(), "dashboard data exported");
    Ok(path.to_path_buf())
}
