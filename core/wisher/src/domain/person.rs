//! 名簿 1 行（人と記念日）のドメイン型

use crate::domain::event_date::{match_key, NormalizedDate, RawDate};

/// 記念日種別の既定値
pub const DEFAULT_EVENT_TYPE: &str = "birthday";

/// 名簿 1 行
///
/// `name` は送信履歴のキーになるため空でないこと（名簿アダプタが空行を除外する）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub name: String,
    pub raw_date: RawDate,
    pub event_type: String,
    pub gender: Option<String>,
    pub role: Option<String>,
}

impl PersonRecord {
    /// 必須項目だけで作る（種別は birthday）
    pub fn new(name: impl Into<String>, raw_date: RawDate) -> Self {
        Self {
            name: name.into(),
            raw_date,
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            gender: None,
            role: None,
        }
    }

    /// 記念日種別を設定する。空白のみなら既定値のまま。
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        let t = event_type.into();
        let t = t.trim();
        if !t.is_empty() {
            self.event_type = t.to_string();
        }
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = non_blank(gender);
        self
    }

    pub fn with_role(mut self, role: Option<String>) -> Self {
        self.role = non_blank(role);
        self
    }

    /// 照合キー（`DD-MM` に正規化できなければ None = 照合対象外）
    pub fn date_key(&self) -> Option<NormalizedDate> {
        match_key(&self.raw_date)
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
