//! wisher コマンドの enum（Command Pattern）

/// wisher の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum WisherCommand {
    /// ヘルプ表示
    Help,
    /// 今日の記念日を照合し、メッセージを生成して配信する
    Run,
}
