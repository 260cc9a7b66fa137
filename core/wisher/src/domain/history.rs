//! 送信履歴（人ごとの送信済みメッセージ列）のドメイン型
//!
//! 追記のみ。同じ人について同一テキストは 2 度入らない。

use std::collections::BTreeMap;

/// 送信履歴
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishHistory {
    entries: BTreeMap<String, Vec<String>>,
}

impl WishHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 読み込んだマップから作る。人ごとの重複は最初の 1 件を残して除き、除いた件数を返す。
    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> (Self, usize) {
        let mut history = Self::new();
        let mut dropped = 0;
        for (name, texts) in map {
            let list = history.entries.entry(name).or_default();
            for text in texts {
                if list.contains(&text) {
                    dropped += 1;
                } else {
                    list.push(text);
                }
            }
        }
        (history, dropped)
    }

    pub fn contains(&self, name: &str, text: &str) -> bool {
        self.entries
            .get(name)
            .map(|list| list.iter().any(|t| t == text))
            .unwrap_or(false)
    }

    /// 未登録なら末尾に追加して true。登録済みなら何もしない。
    pub fn insert(&mut self, name: &str, text: &str) -> bool {
        if self.contains(name, text) {
            return false;
        }
        self.entries
            .entry(name.to_string())
            .or_default()
            .push(text.to_string());
        true
    }

    #[allow(dead_code)] // テストで使用
    pub fn messages_for(&self, name: &str) -> &[String] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 履歴を持つ人数
    pub fn people(&self) -> usize {
        self.entries.len()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.entries
    }

    #[allow(dead_code)] // テストで使用
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
