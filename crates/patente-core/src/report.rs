//! End-of-shift report: per-municipality summaries of stored checks.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::record::{is_yes, parse_timestamp, DAY_FORMAT, TIMESTAMP_FORMAT};
use crate::store::RecordTable;

/// Label used for rows without a municipality.
pub const UNKNOWN_MUNICIPALITY: &str = "NON DEFINITO";

/// Which stored rows belong to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftFilter {
    /// Every row.
    All,
    /// Rows whose timestamp falls on this day.
    Day(NaiveDate),
}

impl ShiftFilter {
    fn accepts(&self, timestamp_cell: &str) -> bool {
        match self {
            ShiftFilter::All => true,
            ShiftFilter::Day(day) => timestamp_cell
                .trim()
                .starts_with(&day.format(DAY_FORMAT).to_string()),
        }
    }
}

/// Activity at one municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MunicipalitySummary {
    pub municipality: String,
    /// Earliest check, chronologically.
    pub first_check: Option<NaiveDateTime>,
    /// Latest check, chronologically.
    pub last_check: Option<NaiveDateTime>,
    /// Vehicles (and subjects) checked.
    pub vehicles: usize,
    pub commercial: usize,
    pub private: usize,
    /// Checks with contested findings.
    pub contested: usize,
    /// Checks with a COPE intervention.
    pub cope: usize,
    /// Checks with a dog-unit intervention.
    pub dog_unit: usize,
}

impl MunicipalitySummary {
    fn new(municipality: &str) -> Self {
        Self {
            municipality: municipality.to_string(),
            first_check: None,
            last_check: None,
            vehicles: 0,
            commercial: 0,
            private: 0,
            contested: 0,
            cope: 0,
            dog_unit: 0,
        }
    }
}

/// Summaries per municipality, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftReport {
    pub municipalities: Vec<MunicipalitySummary>,
    /// Rows included in the report.
    pub total: usize,
}

impl ShiftReport {
    /// Summarize the rows of `table` accepted by `filter`.
    pub fn build(table: &RecordTable, filter: ShiftFilter) -> Self {
        let mut municipalities: Vec<MunicipalitySummary> = Vec::new();
        let mut total = 0;

        for row in &table.rows {
            let timestamp_cell = table.cell(row, "DATA_ORA");
            if !filter.accepts(timestamp_cell) {
                continue;
            }
            total += 1;

            let name = match table.cell(row, "COMUNE") {
                "" => UNKNOWN_MUNICIPALITY.to_string(),
                name => name.to_uppercase(),
            };

            let index = match municipalities.iter().position(|m| m.municipality == name) {
                Some(i) => i,
                None => {
                    municipalities.push(MunicipalitySummary::new(&name));
                    municipalities.len() - 1
                }
            };
            let summary = &mut municipalities[index];

            summary.vehicles += 1;
            if is_yes(table.cell(row, "COMMERCIALE")) {
                summary.commercial += 1;
            } else {
                summary.private += 1;
            }
            if is_contested(table.cell(row, "RILIEVI")) {
                summary.contested += 1;
            }
            if is_yes(table.cell(row, "COPE")) {
                summary.cope += 1;
            }
            if is_yes(table.cell(row, "CINOFILI")) {
                summary.dog_unit += 1;
            }

            if let Some(ts) = parse_timestamp(timestamp_cell) {
                summary.first_check = Some(summary.first_check.map_or(ts, |t| t.min(ts)));
                summary.last_check = Some(summary.last_check.map_or(ts, |t| t.max(ts)));
            }
        }

        Self {
            municipalities,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn is_contested(cell: &str) -> bool {
    !cell.is_empty() && !cell.eq_ignore_ascii_case("NO")
}

fn format_time(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for ShiftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.municipalities {
            writeln!(f, "Municipality: {}", m.municipality)?;
            writeln!(f, "  Start: {}  End: {}", format_time(m.first_check), format_time(m.last_check))?;
            writeln!(f, "  Vehicles checked: {}", m.vehicles)?;
            writeln!(f, "  Commercial: {}  Private: {}", m.commercial, m.private)?;
            writeln!(f, "  Subjects checked: {}", m.vehicles)?;
            writeln!(f, "  Contested findings: {}  COPE: {}  Dog unit: {}", m.contested, m.cope, m.dog_unit)?;
        }
        write!(f, "Total checks: {}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, RecordStore};
    use pretty_assertions::assert_eq;

    fn row(cells: [&str; 12]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        let rows = [
            row(["14/03/2025 10:15:00", "GAVI", "FIAT", "AA", "R", "M", "ROMA", "", "SI", "NO", "", "NO"]),
            row(["14/03/2025 09:05:00", "GAVI", "IVECO", "BB", "R", "M", "ROMA", "", "NO", "SI", "ART 7", "SI"]),
            row(["13/03/2025 23:50:00", "LERMA", "VW", "CC", "R", "M", "ROMA", "", "NO", "NO", "NO", "NO"]),
            row(["01/04/2025 08:00:00", "", "VW", "DD", "R", "M", "ROMA", "", "SÌ", "NO", "", "NO"]),
        ];
        for r in &rows {
            store.append_row(r).unwrap();
        }
        store
    }

    fn at(d: u32, m: u32, h: u32, min: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2025, m, d).and_then(|d| d.and_hms_opt(h, min, 0))
    }

    #[test]
    fn test_all_rows() {
        let table = store().table().unwrap();
        let report = ShiftReport::build(&table, ShiftFilter::All);

        assert_eq!(report.total, 4);
        let names: Vec<&str> = report.municipalities.iter().map(|m| m.municipality.as_str()).collect();
        assert_eq!(names, vec!["GAVI", "LERMA", UNKNOWN_MUNICIPALITY]);

        let gavi = &report.municipalities[0];
        assert_eq!(gavi.first_check, at(14, 3, 9, 5));
        assert_eq!(gavi.last_check, at(14, 3, 10, 15));
        assert_eq!((gavi.vehicles, gavi.commercial, gavi.private), (2, 1, 1));
        assert_eq!((gavi.contested, gavi.cope, gavi.dog_unit), (1, 1, 1));

        assert_eq!(report.municipalities[1].contested, 0);
        assert_eq!(report.municipalities[2].commercial, 1);
    }

    #[test]
    fn test_day_filter() {
        let table = store().table().unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let report = ShiftReport::build(&table, ShiftFilter::Day(day));

        assert_eq!(report.total, 2);
        assert_eq!(report.municipalities.len(), 1);
    }

    #[test]
    fn test_empty_report() {
        let table = MemoryStore::new().table().unwrap();
        let report = ShiftReport::build(&table, ShiftFilter::All);
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "Total checks: 0");
    }

    #[test]
    fn test_min_max_are_chronological() {
        let mut store = MemoryStore::new();
        store
            .append_row(&row(["02/01/2025 08:00:00", "GAVI", "", "", "", "", "", "", "NO", "NO", "", "NO"]))
            .unwrap();
        store
            .append_row(&row(["31/12/2024 22:00:00", "GAVI", "", "", "", "", "", "", "NO", "NO", "", "NO"]))
            .unwrap();

        let report = ShiftReport::build(&store.table().unwrap(), ShiftFilter::All);
        let gavi = &report.municipalities[0];
        assert_eq!(gavi.first_check, NaiveDate::from_ymd_opt(2024, 12, 31).and_then(|d| d.and_hms_opt(22, 0, 0)));
        assert_eq!(gavi.last_check, at(2, 1, 8, 0));
    }
}
