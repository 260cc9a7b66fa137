//! スプレッドシート（xlsx / xls / xlsm / ods）の名簿読み込み
//!
//! 先頭シートの 1 行目を見出しとして読む。日付型セルは Excel のシリアル値から日付に変換する。

use crate::adapter::roster_columns::{Cell, RosterColumns};
use crate::domain::PersonRecord;
use crate::ports::outbound::RosterSource;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Days, NaiveDate};
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct XlsxRosterSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    columns: RosterColumns,
}

impl XlsxRosterSource {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>, columns: RosterColumns) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
            columns,
        }
    }
}

impl RosterSource for XlsxRosterSource {
    fn load(&self) -> Result<Vec<PersonRecord>, Error> {
        if !self.fs.exists(&self.path) {
            return Err(Error::input_unavailable(format!(
                "'{}' not found",
                self.path.display()
            )));
        }
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            Error::input_unavailable(format!(
                "cannot open '{}' (close it if it is open in a spreadsheet program): {}",
                self.path.display(),
                e
            ))
        })?;
        let sheet = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| {
                Error::input_unavailable(format!("'{}' has no sheets", self.path.display()))
            })?;
        let range = workbook.worksheet_range(&sheet).map_err(|e| {
            Error::input_unavailable(format!(
                "cannot read sheet '{}' of '{}': {}",
                sheet,
                self.path.display(),
                e
            ))
        })?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(h) => h.iter().map(header_text).collect(),
            None => return Ok(Vec::new()),
        };
        let cells = rows.map(|r| r.iter().map(cell_from_data).collect::<Vec<_>>());
        self.columns.build_records(&headers, cells)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn header_text(cell: &Data) -> String {
    match cell_from_data(cell) {
        Cell::Text(s) => s,
        _ => String::new(),
    }
}

fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(n) => Cell::Text(n.to_string()),
        Data::Float(f) => Cell::Text(format!("{}", f)),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::Error(_) => Cell::Empty,
        Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
            Some(d) => Cell::Date(d),
            None => Cell::Text(dt.as_f64().to_string()),
        },
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Excel のシリアル日付（1900 年方式、基準日 1899-12-30）を日付に変換する
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_days(Days::new(serial.floor() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawDate;
    use common::adapter::StdFileSystem;

    fn source(path: &Path, date_column: &str) -> XlsxRosterSource {
        XlsxRosterSource::new(Arc::new(StdFileSystem), path, RosterColumns::new(date_column))
    }

    fn fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("src/tests/fixtures/students.xlsx")
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(
            excel_serial_to_date(45292.0),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            excel_serial_to_date(45292.75),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(excel_serial_to_date(0.5), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(
            cell_from_data(&Data::String("Asha".into())),
            Cell::Text("Asha".into())
        );
        assert_eq!(cell_from_data(&Data::Int(7)), Cell::Text("7".into()));
    }

    #[test]
    fn test_missing_file_is_input_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let src = source(&dir.path().join("Students.xlsx"), "Date");
        let err = src.load().unwrap_err();
        assert!(matches!(err, Error::InputUnavailable(_)));
        assert_eq!(err.exit_code(), 66);
    }

    #[test]
    fn test_not_a_workbook_is_input_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Students.xlsx");
        std::fs::write(&path, "definitely not a zip").unwrap();
        let src = source(&path, "Date");
        assert!(matches!(src.load(), Err(Error::InputUnavailable(_))));
    }

    #[test]
    fn test_reads_first_sheet_of_workbook() {
        let records = source(&fixture(), "DOB").load().unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Asha", "Ravi", "Kiran"]);

        assert_eq!(
            records[0].raw_date,
            RawDate::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        );
        assert_eq!(records[0].event_type, "birthday");
        assert_eq!(records[0].gender.as_deref(), Some("female"));
        assert_eq!(records[0].role, None);

        assert_eq!(records[1].raw_date, RawDate::text("25/12/1990"));
        assert_eq!(records[1].event_type, "anniversary");
        assert_eq!(records[1].role.as_deref(), Some("Staff"));

        assert_eq!(records[2].event_type, "birthday");
        assert_eq!(
            records[2].raw_date,
            RawDate::Date(NaiveDate::from_ymd_opt(1988, 7, 4).unwrap())
        );
    }

    #[test]
    fn test_workbook_dates_normalize_to_day_month() {
        let records = source(&fixture(), "DOB").load().unwrap();
        let keys: Vec<String> = records
            .iter()
            .map(|r| r.date_key().map(|k| k.to_string()).unwrap_or_default())
            .collect();
        assert_eq!(keys, vec!["01-01", "25-12", "04-07"]);
    }

    #[test]
    fn test_workbook_date_column_falls_back_to_alias() {
        // 見出しは DOB のみ
        let records = source(&fixture(), "Date").load().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.name != "Old Entry"));
    }
}
