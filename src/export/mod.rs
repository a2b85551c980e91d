//! Projections of a [`DashboardSnapshot`] into files for external BI tools.
//!
//! Every exporter renders its whole payload in memory and writes it with a single
//! call, so a failed export never leaves a half-written file behind as valid output.

mod flat_table;
mod metric_document;
mod summary_table;

pub use flat_table::FlatMetricTable;
pub use metric_document::MetricDocument;
pub use summary_table::SummaryTable;

use crate::dashboard::{export_to_structured_document, DashboardSnapshot, DEFAULT_DOCUMENT_FILE};
use std::path::{Path, PathBuf};
use tracing::info;

/// UTF-8 byte-order marker, written first so spreadsheet tools detect the encoding.
pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode delimited output: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait Exporter {
    /// File name used when the caller has no preference.
    const DEFAULT_FILE_NAME: &'static str;

    fn render(&self, snapshot: &DashboardSnapshot) -> Result<Vec<u8>, ExportError>;

    /// Renders and writes the payload, returning the path written.
    fn export(
        &self,
        snapshot: &DashboardSnapshot,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf, ExportError> {
        let path = path.as_ref();
        let payload = self.render(snapshot)?;
        write_payload(path, &payload)?;
        info!(
            path = %path.display(),
            format = Self::DEFAULT_FILE_NAME,
            "export written"
        );
        Ok(path.to_path_buf())
    }

    fn export_to_dir(
        &self,
        snapshot: &DashboardSnapshot,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, ExportError> {
        self.export(snapshot, dir.as_ref().join(Self::DEFAULT_FILE_NAME))
    }
}

pub(crate) fn write_payload(path: &Path, payload: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, payload).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Finishes an in-memory CSV writer whose buffer already starts with the BOM.
pub(crate) fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer
        .into_inner()
        .map_err(|err| ExportError::Csv(csv::Error::from(err.into_error())))
}

/// Writes the structured document and every exporter's file into `dir`.
pub fn export_all(
    snapshot: &DashboardSnapshot,
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, ExportError> {
    let dir = dir.as_ref();
    let written = vec![
        export_to_structured_document(snapshot, dir.join(DEFAULT_DOCUMENT_FILE))?,
        FlatMetricTable::new().export_to_dir(snapshot, dir)?,
        MetricDocument::new().export_to_dir(snapshot, dir)?,
        SummaryTable.export_to_dir(snapshot, dir)?,
    ];
    Ok(written)
}
