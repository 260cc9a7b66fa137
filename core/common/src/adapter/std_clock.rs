//! 標準時刻実装（chrono の Local を委譲）

use crate::ports::outbound::Clock;
use chrono::NaiveDate;

/// システム時刻とローカルタイムゾーンを使う Clock 実装
#[derive(Debug, Clone, Default)]
pub struct StdClock;

impl Clock for StdClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// 日付を固定した Clock 実装（`--today` 指定時とテスト用）
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }
}
