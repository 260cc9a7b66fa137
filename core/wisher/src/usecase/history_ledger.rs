//! 送信履歴の読み書き（1 回の実行中に保持する）
//!
//! `record` はメモリ上の履歴に追加してから全体を書き戻す。同じ文面の再記録は何もしない。

use crate::domain::WishHistory;
use crate::ports::outbound::HistoryStore;
use common::error::Error;
use std::sync::Arc;

pub struct HistoryLedger {
    store: Arc<dyn HistoryStore>,
    history: WishHistory,
}

impl HistoryLedger {
    /// 永続化済みの履歴を読み込む（解析できなければ CorruptStore）
    pub fn open(store: Arc<dyn HistoryStore>) -> Result<Self, Error> {
        let history = store.load()?;
        Ok(Self { store, history })
    }

    pub fn history(&self) -> &WishHistory {
        &self.history
    }

    #[allow(dead_code)] // テストで使用
    pub fn contains(&self, name: &str, text: &str) -> bool {
        self.history.contains(name, text)
    }

    /// 追加して書き戻す。追加した場合 true。
    pub fn record(&mut self, name: &str, text: &str) -> Result<bool, Error> {
        if !self.history.insert(name, text) {
            return Ok(false);
        }
        self.store.save(&self.history)?;
        Ok(true)
    }
}
