//! 名簿の列解決と行 → PersonRecord 変換（xlsx / json 共通）
//!
//! 見出しは前後空白を除いて大文字小文字を無視して照合する。

use crate::domain::{PersonRecord, RawDate};
use chrono::NaiveDate;
use common::error::Error;

const NAME_ALIASES: &[&str] = &["name"];
const DATE_ALIASES: &[&str] = &["date", "dob"];
const EVENT_ALIASES: &[&str] = &["event", "event type", "event_type", "type", "occasion"];
const GENDER_ALIASES: &[&str] = &["gender", "sex"];
const ROLE_ALIASES: &[&str] = &["role", "position"];

/// 1 セルの値
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    fn raw_date(&self) -> RawDate {
        match self {
            Cell::Date(d) => RawDate::Date(*d),
            Cell::Text(s) => RawDate::Text(s.clone()),
            Cell::Empty => RawDate::Text(String::new()),
        }
    }
}

/// 解決済みの列位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    name: usize,
    date: usize,
    event_type: Option<usize>,
    gender: Option<usize>,
    role: Option<usize>,
}

/// 列名の設定（日付列名は "Date" / "DOB" など設定で変わる）
#[derive(Debug, Clone)]
pub struct RosterColumns {
    date_column: String,
}

impl RosterColumns {
    pub fn new(date_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
        }
    }

    /// 見出し行から列位置を解決する。名前列・日付列が無ければ InputUnavailable。
    pub fn resolve(&self, headers: &[String]) -> Result<ColumnIndex, Error> {
        let name = find(headers, NAME_ALIASES)
            .ok_or_else(|| Error::input_unavailable("roster has no 'Name' column"))?;
        let configured = self.date_column.trim().to_lowercase();
        let date = find(headers, &[configured.as_str()])
            .or_else(|| find(headers, DATE_ALIASES))
            .ok_or_else(|| {
                Error::input_unavailable(format!(
                    "roster has no '{}' column (also tried Date, DOB)",
                    self.date_column
                ))
            })?;
        Ok(ColumnIndex {
            name,
            date,
            event_type: find(headers, EVENT_ALIASES),
            gender: find(headers, GENDER_ALIASES),
            role: find(headers, ROLE_ALIASES),
        })
    }

    /// 行を PersonRecord の列に変換する。名前が空の行は除外する。
    pub fn build_records<I>(&self, headers: &[String], rows: I) -> Result<Vec<PersonRecord>, Error>
    where
        I: IntoIterator<Item = Vec<Cell>>,
    {
        let idx = self.resolve(headers)?;
        let mut out = Vec::new();
        for row in rows {
            let cell = |i: usize| row.get(i).cloned().unwrap_or(Cell::Empty);
            let Some(name) = cell(idx.name).text() else {
                continue;
            };
            let optional = |i: Option<usize>| i.and_then(|i| cell(i).text());
            let mut record = PersonRecord::new(name, cell(idx.date).raw_date())
                .with_gender(optional(idx.gender))
                .with_role(optional(idx.role));
            if let Some(t) = optional(idx.event_type) {
                record = record.with_event_type(t);
            }
            out.push(record);
        }
        Ok(out)
    }
}

fn find(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(alias))
    })
}
