use super::{finish_csv, ExportError, Exporter, UTF8_BOM};
use crate::dashboard::DashboardSnapshot;
use crate::kpi::KpiResult;

const KPI_COLUMN: &str = "KPI";
const VALUE_COLUMN: &str = "Valor";
/// Only a field with this exact name fills the `Valor` column.
const VALUE_FIELD: &str = "value";

/// One row per stored metric with its scalar fields spread across columns.
///
/// The column set is the union of every row's fields in first-seen order; cells a
/// metric does not have are left empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryTable;

struct SummaryRow {
    kpi: String,
    cells: Vec<(String, String)>,
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn summary_row(result: &KpiResult) -> SummaryRow {
    let mut cells = Vec::new();
    for (name, value) in result.fields() {
        let Some(text) = value.scalar_text() else {
            continue;
        };
        let column = if name == VALUE_FIELD {
            VALUE_COLUMN.to_string()
        } else {
            capitalize(name)
        };
        cells.push((column, text));
    }

    SummaryRow {
        kpi: result.name().to_ascii_uppercase(),
        cells,
    }
}

impl Exporter for SummaryTable {
    const DEFAULT_FILE_NAME: &'static str = "kpis_summary.csv";

    fn render(&self, snapshot: &DashboardSnapshot) -> Result<Vec<u8>, ExportError> {
        let rows: Vec<SummaryRow> = snapshot.kpis().iter().map(summary_row).collect();

        let mut columns = vec![VALUE_COLUMN.to_string()];
        for row in &rows {
            for (column, _) in &row.cells {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(UTF8_BOM.to_vec());
        writer.write_record(std::iter::once(KPI_COLUMN).chain(columns.iter().map(String::as_str)))?;

        for row in &rows {
            let cells = columns.iter().map(|column| {
                row.cells
                    .iter()
                    .find(|(name, _)| name == column)
                    .map_or("", |(_, value)| value.as_str())
            });
            writer.write_record(std::iter::once(row.kpi.as_str()).chain(cells))?;
        }

        finish_csv(writer)
    }
}
