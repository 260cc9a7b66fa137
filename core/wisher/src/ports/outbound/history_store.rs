//! 送信履歴の永続化 Outbound ポート
//!
//! 履歴はマップ全体を読み込み、全体を書き戻す。不変条件（追記のみ・重複なし）は
//! ドメイン型 WishHistory が持ち、このポートは読み書きだけを担う。

use crate::domain::WishHistory;
use common::error::Error;

pub trait HistoryStore: Send + Sync {
    /// 永続化された履歴を読む
    ///
    /// * 未作成なら空の履歴
    /// * 存在するが解析できなければ `Error::CorruptStore`（空扱いにはしない）
    fn load(&self) -> Result<WishHistory, Error>;

    /// 履歴全体を書き戻す。戻った時点で永続化済みであること。
    fn save(&self, history: &WishHistory) -> Result<(), Error>;

    /// ログ・メッセージ用の保存先表示
    fn location(&self) -> String;
}
