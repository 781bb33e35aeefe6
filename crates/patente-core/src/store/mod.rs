//! Append-only row store for check records.

mod csv_store;
mod memory;

pub use csv_store::CsvStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::record::{CheckRecord, COLUMNS, TIMESTAMP_COLUMN};

/// Row-oriented store: append a row, read every row back.
pub trait RecordStore {
    /// Append one row of values in [`COLUMNS`] order.
    fn append_row(&mut self, values: &[String]) -> Result<(), StoreError>;

    /// Every stored row, header and blank rows included.
    fn read_all_rows(&self) -> Result<Vec<Vec<String>>, StoreError>;

    /// Append a check record.
    fn append(&mut self, record: &CheckRecord) -> Result<(), StoreError> {
        self.append_row(&record.to_row())
    }

    /// Read the store as a table with named columns.
    fn table(&self) -> Result<RecordTable, StoreError> {
        RecordTable::from_rows(self.read_all_rows()?)
    }
}

/// Reject rows that do not match the column schema.
pub(crate) fn check_row(values: &[String]) -> Result<(), StoreError> {
    if values.len() != COLUMNS.len() {
        return Err(StoreError::ColumnMismatch {
            expected: COLUMNS.len(),
            found: values.len(),
        });
    }
    Ok(())
}

/// Stored rows with column names recovered from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable {
    /// Column names, trimmed and uppercased.
    pub header: Vec<String>,
    /// Data rows following the header.
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Build a table from raw store rows.
    ///
    /// Blank rows are dropped. The header is the first row with a cell
    /// reading `DATA_ORA` (trimmed, any case); it need not be the first
    /// row, and rows above it are ignored. A store with no non-blank rows
    /// yields an empty table.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, StoreError> {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .filter(|r| r.iter().any(|cell| !cell.trim().is_empty()))
            .collect();

        if rows.is_empty() {
            return Ok(Self {
                header: COLUMNS.iter().map(|c| c.to_string()).collect(),
                rows: Vec::new(),
            });
        }

        let header_index = locate_header(&rows).ok_or(StoreError::MissingHeader(TIMESTAMP_COLUMN))?;
        let mut rows = rows.into_iter().skip(header_index);

        let header = rows
            .next()
            .unwrap_or_default()
            .iter()
            .map(|c| c.trim().to_uppercase())
            .collect();

        Ok(Self {
            header,
            rows: rows.collect(),
        })
    }

    /// Index of a column by name (any case).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.eq_ignore_ascii_case(name.trim()))
    }

    /// Trimmed cell of a row; empty when the column or cell is missing.
    pub fn cell<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        self.column(name)
            .and_then(|i| row.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    /// Rows that parse as check records.
    pub fn records(&self) -> Vec<CheckRecord> {
        self.rows
            .iter()
            .filter_map(|row| CheckRecord::from_row(&self.header, row))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Index of the header row: the first row with a `DATA_ORA` cell.
pub fn locate_header(rows: &[Vec<String>]) -> Option<usize> {
    rows.iter().position(|row| {
        row.iter()
            .any(|cell| cell.trim().eq_ignore_ascii_case(TIMESTAMP_COLUMN))
    })
}
