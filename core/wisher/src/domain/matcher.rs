//! 今日の記念日の抽出

use crate::domain::event_date::NormalizedDate;
use crate::domain::person::PersonRecord;

/// 正規化した日付が `today` と一致する行を名簿順のまま返す
pub fn match_today(roster: &[PersonRecord], today: NormalizedDate) -> Vec<&PersonRecord> {
    roster
        .iter()
        .filter(|p| p.date_key() == Some(today))
        .collect()
}
