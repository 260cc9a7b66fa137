//! メモリ上だけの送信履歴（`--dry-run` とテスト用）
//!
//! `seeded_from` で作ると、最初の load で元のストアを読み、以降はメモリ上だけで更新する。
//! 元のストアには書き戻さない。

use crate::domain::WishHistory;
use crate::ports::outbound::HistoryStore;
use common::error::Error;
use std::sync::{Arc, Mutex};

pub struct MemoryHistoryStore {
    seed: Option<Arc<dyn HistoryStore>>,
    /// None は元のストアをまだ読んでいない状態
    history: Mutex<Option<WishHistory>>,
    saves: Mutex<usize>,
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::with_history(WishHistory::default())
    }
}

impl MemoryHistoryStore {
    #[allow(dead_code)] // テストで使用
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期内容を持たせる
    #[allow(dead_code)] // テストで使用
    pub fn with_history(history: WishHistory) -> Self {
        Self {
            seed: None,
            history: Mutex::new(Some(history)),
            saves: Mutex::new(0),
        }
    }

    /// 初回 load で `seed` の内容を読み込む（dry-run で実ファイルの履歴を使う）
    pub fn seeded_from(seed: Arc<dyn HistoryStore>) -> Self {
        Self {
            seed: Some(seed),
            history: Mutex::new(None),
            saves: Mutex::new(0),
        }
    }

    /// 現在の内容（未読み込みなら空）
    #[allow(dead_code)] // テストで使用
    pub fn snapshot(&self) -> WishHistory {
        self.history
            .lock()
            .ok()
            .and_then(|h| h.clone())
            .unwrap_or_default()
    }

    /// save が呼ばれた回数
    #[allow(dead_code)] // テストで使用
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<WishHistory, Error> {
        let mut h = self
            .history
            .lock()
            .map_err(|_| Error::system("history lock poisoned"))?;
        if let Some(ref current) = *h {
            return Ok(current.clone());
        }
        let loaded = match self.seed {
            Some(ref seed) => seed.load()?,
            None => WishHistory::default(),
        };
        *h = Some(loaded.clone());
        Ok(loaded)
    }

    fn save(&self, history: &WishHistory) -> Result<(), Error> {
        let mut h = self
            .history
            .lock()
            .map_err(|_| Error::system("history lock poisoned"))?;
        *h = Some(history.clone());
        if let Ok(mut n) = self.saves.lock() {
            *n += 1;
        }
        Ok(())
    }

    fn location(&self) -> String {
        match self.seed {
            Some(ref seed) => format!("(memory, seeded from {})", seed.location()),
            None => "(memory)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct CorruptHistoryStore;

    impl HistoryStore for CorruptHistoryStore {
        fn load(&self) -> Result<WishHistory, Error> {
            Err(Error::corrupt_store(PathBuf::from("wish_history.json"), "unexpected EOF"))
        }
        fn save(&self, _history: &WishHistory) -> Result<(), Error> {
            Err(Error::system("save must not be called"))
        }
        fn location(&self) -> String {
            "wish_history.json".to_string()
        }
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryHistoryStore::new();
        let mut h = store.load().unwrap();
        assert!(h.is_empty());
        h.insert("Asha", "hi");
        store.save(&h).unwrap();
        assert_eq!(store.load().unwrap(), h);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_seed_is_read_on_first_load_only() {
        let mut seeded = WishHistory::default();
        seeded.insert("Asha", "last year");
        let seed = Arc::new(MemoryHistoryStore::with_history(seeded.clone()));
        let store = MemoryHistoryStore::seeded_from(seed.clone());
        assert!(store.snapshot().is_empty());

        let mut h = store.load().unwrap();
        assert_eq!(h, seeded);
        h.insert("Asha", "this year");
        store.save(&h).unwrap();

        assert_eq!(store.load().unwrap().messages_for("Asha").len(), 2);
        assert_eq!(seed.snapshot(), seeded);
        assert_eq!(seed.save_count(), 0);
    }

    #[test]
    fn test_corrupt_seed_fails_only_when_loaded() {
        let store = MemoryHistoryStore::seeded_from(Arc::new(CorruptHistoryStore));
        assert!(store.location().contains("memory"));
        assert_eq!(store.load().unwrap_err().exit_code(), 65);
    }
}
