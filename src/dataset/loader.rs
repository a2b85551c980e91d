use super::dates::parse_datetime;
use super::{Dataset, DatasetError, Record, Value};
use calamine::{open_workbook_auto, Data, Reader};
use std::io::Read;
use std::path::Path;

enum InputFormat {
    Delimited,
    Spreadsheet,
}

impl InputFormat {
    fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Delimited),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

pub(super) fn load(path: &Path) -> Result<Dataset, DatasetError> {
    let format = InputFormat::detect(path).ok_or_else(|| DatasetError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    tracing::info!(path = %path.display(), "loading dataset");
    let dataset = match format {
        InputFormat::Delimited => {
            let bytes = std::fs::read(path).map_err(|source| DatasetError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            read_delimited(&bytes[..])?
        }
        InputFormat::Spreadsheet => read_spreadsheet(path)?,
    };

    tracing::info!(
        records = dataset.len(),
        columns = dataset.column_names().len(),
        "dataset loaded"
    );
    Ok(dataset)
}

pub(super) fn read_delimited<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = header_names(csv_reader.headers()?.iter());

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        records.push(Record::new(row.iter().map(Value::infer).collect()));
    }

    Dataset::from_columns(columns, records)
}

fn read_spreadsheet(path: &Path) -> Result<Dataset, DatasetError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DatasetError::EmptyWorkbook {
            path: path.to_path_buf(),
        })??;

    let mut rows = range.rows();
    let columns = match rows.next() {
        Some(header) => header_names(header.iter().map(|cell| cell.to_string())),
        None => Vec::new(),
    };

    let records = rows
        .map(|row| {
            let mut values: Vec<Value> = row.iter().map(cell_value).collect();
            values.resize(columns.len(), Value::Missing);
            Record::new(values)
        })
        .collect();

    Dataset::from_columns(columns, records)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Missing,
        Data::String(text) => Value::infer(text),
        Data::Float(number) => Value::Number(*number),
        Data::Int(number) => Value::Number(*number as f64),
        Data::Bool(flag) => Value::Boolean(*flag),
        Data::DateTime(dt) => dt.as_datetime().map_or(Value::Missing, Value::Date),
        Data::DateTimeIso(text) => {
            parse_datetime(text).map_or_else(|| Value::Text(text.clone()), Value::Date)
        }
        Data::DurationIso(text) => Value::Text(text.clone()),
    }
}

/// Cleans header cells; blank ones are named by position, `Unnamed: <index>`.
fn header_names<S: AsRef<str>>(cells: impl Iterator<Item = S>) -> Vec<String> {
    cells
        .enumerate()
        .map(|(position, cell)| {
            let name = cell
                .as_ref()
                .replace(['\u{feff}', '\u{200b}'], "")
                .trim()
                .to_string();
            if name.is_empty() {
                format!("Unnamed: {position}")
            } else {
                name
            }
        })
        .collect()
}
