//! 時刻 Outbound ポート
//!
//! usecase はこの trait 経由で「今日」を取得する。名簿の照合・曜日名・月名はここから決まる。

use chrono::NaiveDate;

/// 時刻取得の抽象
///
/// 実装は `common::adapter::StdClock` やテスト用の固定日付など。
pub trait Clock: Send + Sync {
    /// ローカルタイムゾーンでの今日の日付
    fn today(&self) -> NaiveDate;
}
