//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。各バリアントは sysexits 風の終了コードを持つ。

use std::path::PathBuf;

/// エラー型
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// 引数・設定値の不正
    #[error("{0}")]
    InvalidArgument(String),
    /// 名簿（roster）が読めない（存在しない・ロックされている・形式不正）
    #[error("Roster unavailable: {0}")]
    InputUnavailable(String),
    /// 送信履歴ファイルが存在するが解析できない
    #[error("History store '{}' is corrupt: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },
    /// 上限回数まで再生成しても履歴と重複した
    #[error("Could not produce a new message for '{name}' after {attempts} attempts")]
    DuplicateExhausted { name: String, attempts: usize },
    /// 配信チャネルの失敗
    #[error("Delivery failed: {0}")]
    Delivery(String),
    #[error("{0}")]
    Json(String),
    #[error("{0}")]
    Io(String),
    /// 環境変数・ホームディレクトリ解決の失敗
    #[error("{0}")]
    Env(String),
    #[error("{0}")]
    System(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn input_unavailable(msg: impl Into<String>) -> Self {
        Self::InputUnavailable(msg.into())
    }

    pub fn corrupt_store(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptStore {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// 使い方の誤りか（main で usage を表示するかの判定）
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// プロセスの終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::CorruptStore { .. } => 65,
            Self::InputUnavailable(_) => 66,
            Self::Delivery(_) => 69,
            Self::System(_) => 70,
            Self::Json(_) | Self::Io(_) => 74,
            Self::DuplicateExhausted { .. } => 75,
            Self::Env(_) => 78,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
