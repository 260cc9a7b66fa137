//! 乱数の Outbound ポート
//!
//! 文体指示・フォールバック文面の選択に使う。テストでは選択列を固定した実装を注入する。

pub trait RandomSource: Send + Sync {
    /// `0..len` から 1 つ選ぶ（len > 0）
    fn pick(&self, len: usize) -> usize;
}
