//! JSON 配列の名簿読み込み
//!
//! `[{"Name": "Asha", "Date": "01-01", "Event": "birthday"}, ...]` の形式。
//! キーは xlsx の見出しと同じ規則で解決する。

use crate::adapter::roster_columns::{Cell, RosterColumns};
use crate::domain::PersonRecord;
use crate::ports::outbound::RosterSource;
use common::error::Error;
use common::ports::outbound::FileSystem;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct JsonRosterSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    columns: RosterColumns,
}

impl JsonRosterSource {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>, columns: RosterColumns) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
            columns,
        }
    }

    fn parse(&self, content: &str) -> Result<Vec<PersonRecord>, Error> {
        let value: Value = serde_json::from_str(content).map_err(|e| {
            Error::input_unavailable(format!("'{}' is not valid JSON: {}", self.path.display(), e))
        })?;
        let items = value.as_array().ok_or_else(|| {
            Error::input_unavailable(format!(
                "'{}' must contain a JSON array of objects",
                self.path.display()
            ))
        })?;
        let objects: Vec<&Map<String, Value>> = items.iter().filter_map(Value::as_object).collect();

        // 見出し = 全オブジェクトのキー（小文字化して初出順、大文字小文字違いは同じ列）
        let mut headers: Vec<String> = Vec::new();
        for obj in &objects {
            for key in obj.keys() {
                let key = key.trim().to_lowercase();
                if !headers.contains(&key) {
                    headers.push(key);
                }
            }
        }
        if objects.is_empty() {
            return Ok(Vec::new());
        }
        let rows = objects.iter().map(|obj| {
            headers
                .iter()
                .map(|h| {
                    obj.iter()
                        .find(|(k, _)| k.trim().to_lowercase() == *h)
                        .map(|(_, v)| cell_from_value(v))
                        .unwrap_or(Cell::Empty)
                })
                .collect::<Vec<_>>()
        });
        self.columns.build_records(&headers, rows)
    }
}

fn cell_from_value(v: &Value) -> Cell {
    match v {
        Value::Null => Cell::Empty,
        Value::String(s) => Cell::Text(s.clone()),
        Value::Number(n) => Cell::Text(n.to_string()),
        Value::Bool(b) => Cell::Text(b.to_string()),
        Value::Array(_) | Value::Object(_) => Cell::Empty,
    }
}

impl RosterSource for JsonRosterSource {
    fn load(&self) -> Result<Vec<PersonRecord>, Error> {
        if !self.fs.exists(&self.path) {
            return Err(Error::input_unavailable(format!(
                "'{}' not found",
                self.path.display()
            )));
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .map_err(|e| Error::input_unavailable(e.to_string()))?;
        self.parse(&content)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
