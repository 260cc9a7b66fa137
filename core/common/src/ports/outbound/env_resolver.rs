//! 環境変数解決 Outbound ポート
//!
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::HomeDir;
use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. WISHER_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/wisher（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/wisher
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// カレントディレクトリ（既定の名簿ファイルの置き場所）
    fn current_dir(&self) -> Result<PathBuf, Error>;

    /// 任意の環境変数（API キー等）。空文字は未設定として扱う。
    fn var(&self, name: &str) -> Option<String>;
}
