//! In-memory tabular input for the KPI engine.
//!
//! A [`Dataset`] is immutable once built. The only state it carries besides its rows
//! is a per-column cache of parsed calendar days, filled on first use so that several
//! date-dependent calculations on the same instance parse each column once.

mod dates;
mod loader;
mod value;

pub use value::Value;

use dates::calendar_day;

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("unsupported input format for {path}: expected .csv, .xlsx, .xls, .xlsm or .ods")]
    UnsupportedFormat { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid delimited data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid spreadsheet data: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("spreadsheet {path} contains no worksheets")]
    EmptyWorkbook { path: PathBuf },
    #[error("column '{0}' appears more than once in the header")]
    DuplicateColumn(String),
    #[error("row {row} has {found} cells but the header declares {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// One row of a dataset, aligned with the dataset's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }
}

type ParsedDays = Rc<[Option<NaiveDate>]>;

#[derive(Debug)]
pub struct Dataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    records: Vec<Record>,
    day_cache: RefCell<HashMap<String, ParsedDays>>,
}

impl Dataset {
    /// Builds a dataset from a header and rows of equal width.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        records: Vec<Record>,
    ) -> Result<Self, DatasetError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(columns.len());
        for (position, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), position).is_some() {
                return Err(DatasetError::DuplicateColumn(name.clone()));
            }
        }

        for (row, record) in records.iter().enumerate() {
            if record.values.len() != columns.len() {
                return Err(DatasetError::RowWidth {
                    row,
                    expected: columns.len(),
                    found: record.values.len(),
                });
            }
        }

        Ok(Self {
            columns,
            index,
            records,
            day_cache: RefCell::new(HashMap::new()),
        })
    }

    /// Loads a dataset, choosing the reader from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        loader::load(path.as_ref())
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        loader::read_delimited(reader)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates the cells of one column in row order.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value> + 'a> {
        let position = *self.index.get(name)?;
        Some(
            self.records
                .iter()
                .map(move |record| &record.values[position]),
        )
    }

    /// Calendar day per row for a date column, `None` where the cell does not parse.
    ///
    /// The parsed column is cached on this instance; rows are never dropped or reordered.
    pub fn parsed_dates(&self, name: &str) -> Option<ParsedDays> {
        if let Some(cached) = self.day_cache.borrow().get(name) {
            return Some(Rc::clone(cached));
        }

        let parsed: ParsedDays = self.column(name)?.map(calendar_day).collect();
        let unparsed = parsed.iter().filter(|day| day.is_none()).count();
        if unparsed > 0 {
            tracing::debug!(column = name, unparsed, "date cells could not be parsed");
        }

        self.day_cache
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&parsed));
        Some(parsed)
    }
}
