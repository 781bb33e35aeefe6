//! In-memory record store.

use crate::error::StoreError;
use crate::models::record::COLUMNS;

use super::{check_row, RecordStore};

/// Store kept in memory, starting with the header row.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    rows: Vec<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: vec![COLUMNS.iter().map(|c| c.to_string()).collect()],
        }
    }

    /// Store holding exactly these rows, e.g. a sheet export.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn append_row(&mut self, values: &[String]) -> Result<(), StoreError> {
        check_row(values)?;
        self.rows.push(values.to_vec());
        Ok(())
    }

    fn read_all_rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.rows.clone())
    }
}
