//! 送信履歴の JSON ファイル実装
//!
//! 形式は `{ "名前": ["文面", ...], ... }`（キーはソート済み・整形出力）。
//! 書き込みは一時ファイル経由の rename で置き換える。

use crate::domain::WishHistory;
use crate::ports::outbound::HistoryStore;
use common::error::Error;
use common::ports::outbound::{FileSystem, Log, LogLevel, LogRecord};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct JsonHistoryStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    log: Arc<dyn Log>,
}

impl JsonHistoryStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>, log: Arc<dyn Log>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
            log,
        }
    }

    fn log(&self, level: LogLevel, message: &str, fields: &[(&str, serde_json::Value)]) {
        let mut rec = LogRecord::new(level, message)
            .layer("adapter")
            .kind("history")
            .field("path", self.path.display().to_string());
        for (k, v) in fields {
            rec = rec.field(k, v.clone());
        }
        let _ = self.log.log(&rec);
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<WishHistory, Error> {
        if !self.fs.exists(&self.path) {
            self.log(LogLevel::Info, "history not found, starting empty", &[]);
            return Ok(WishHistory::new());
        }
        let content = self.fs.read_to_string(&self.path)?;
        let map: BTreeMap<String, Vec<String>> = serde_json::from_str(&content)
            .map_err(|e| Error::corrupt_store(&self.path, e.to_string()))?;
        let (history, dropped) = WishHistory::from_map(map);
        if dropped > 0 {
            self.log(
                LogLevel::Warn,
                "duplicate history entries dropped on load",
                &[("dropped", serde_json::json!(dropped))],
            );
        }
        self.log(
            LogLevel::Info,
            "history loaded",
            &[("people", serde_json::json!(history.people()))],
        );
        Ok(history)
    }

    fn save(&self, history: &WishHistory) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(history.as_map())?;
        self.fs.write_atomic(&self.path, &json)?;
        self.log(
            LogLevel::Debug,
            "history saved",
            &[("people", serde_json::json!(history.people()))],
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::{NoopLog, StdFileSystem};

    fn store(path: &Path) -> JsonHistoryStore {
        JsonHistoryStore::new(Arc::new(StdFileSystem), path, Arc::new(NoopLog))
    }

    #[test]
    fn test_load_missing_is_empty_and_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wish_history.json");
        let h = store(&path).load().unwrap();
        assert!(h.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("wish_history.json");
        let s = store(&path);

        let mut h = WishHistory::new();
        h.insert("Ravi", "Have a great day!");
        h.insert("Asha", "Happy birthday, Asha!");
        h.insert("Asha", "Another year of smiles!");
        s.save(&h).unwrap();

        let loaded = s.load().unwrap();
        assert_eq!(loaded, h);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.find("Asha").unwrap() < raw.find("Ravi").unwrap());
        assert!(raw.contains('\n'));
    }

    #[test]
    fn test_load_invalid_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wish_history.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = store(&path).load().unwrap_err();
        assert!(matches!(err, Error::CorruptStore { .. }));
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_load_wrong_shape_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wish_history.json");
        std::fs::write(&path, r#"{"Asha": "not a list"}"#).unwrap();
        assert!(matches!(
            store(&path).load(),
            Err(Error::CorruptStore { .. })
        ));

        std::fs::write(&path, r#"["Asha"]"#).unwrap();
        assert!(matches!(
            store(&path).load(),
            Err(Error::CorruptStore { .. })
        ));
    }

    #[test]
    fn test_load_empty_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wish_history.json");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            store(&path).load(),
            Err(Error::CorruptStore { .. })
        ));
    }

    #[test]
    fn test_load_drops_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wish_history.json");
        std::fs::write(&path, r#"{"Asha": ["a", "a", "b"]}"#).unwrap();
        let h = store(&path).load().unwrap();
        assert_eq!(h.messages_for("Asha"), &["a".to_string(), "b".to_string()]);
    }
}
