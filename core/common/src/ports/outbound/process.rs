//! サブプロセス実行 Outbound ポート
//!
//! 外部配信コマンドなど、プロセス起動を trait で抽象化する。

use crate::error::Error;
use std::path::Path;

/// サブプロセス実行の抽象
///
/// 実装は `common::adapter::StdProcess`（std::process::Command）など。
pub trait Process: Send + Sync {
    /// 標準入力に `input` を流し込んで実行し、終了コードを返す
    fn run_with_stdin(&self, program: &Path, args: &[String], input: &str) -> Result<i32, Error>;
}
