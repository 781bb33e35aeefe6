//! CSV file record store.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::record::COLUMNS;

use super::{check_row, RecordStore};

/// Append-only CSV file; the header is written when the file is created.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Open (creating if needed) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let needs_header = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        if needs_header {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(COLUMNS)?;
            writer.flush()?;
            info!("Created record store at {}", path.display());
        }

        Ok(Self { path })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for CsvStore {
    fn append_row(&mut self, values: &[String]) -> Result<(), StoreError> {
        check_row(values)?;

        let file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(values)?;
        writer.flush()?;

        debug!("Appended row to {}", self.path.display());
        Ok(())
    }

    fn read_all_rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{CheckRecord, FieldRecord};
    use chrono::NaiveDate;

    fn record(municipality: &str) -> CheckRecord {
        let ts = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let identity = FieldRecord {
            surname: "BIANCHI".into(),
            given_name: "LUCA".into(),
            birth_place: "GENOVA".into(),
            birth_date: "02.03.1990".into(),
            ..Default::default()
        };
        CheckRecord::new(ts, municipality, &identity).with_vehicle("Fiat Ducato, bianco", "AA000AA")
    }

    #[test]
    fn test_new_store_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::open(dir.path().join("sub").join("controlli.csv")).unwrap();

        let rows = store.read_all_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], COLUMNS.to_vec());
    }

    #[test]
    fn test_append_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controlli.csv");

        let mut store = CsvStore::open(&path).unwrap();
        store.append(&record("gavi")).unwrap();
        drop(store);

        let mut store = CsvStore::open(&path).unwrap();
        store.append(&record("lerma")).unwrap();

        let table = store.table().unwrap();
        assert_eq!(table.len(), 2);
        let records = table.records();
        assert_eq!(records[0].municipality, "GAVI");
        assert_eq!(records[1].municipality, "LERMA");
        assert_eq!(records[1].vehicle, "FIAT DUCATO, BIANCO");
    }

    #[test]
    fn test_rejects_short_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::open(dir.path().join("c.csv")).unwrap();
        let err = store.append_row(&["x".to_string()]).unwrap_err();
        assert!(matches!(err, StoreError::ColumnMismatch { expected: 12, found: 1 }));
    }
}
