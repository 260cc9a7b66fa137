//! 標準サブプロセス実行（std::process::Command を委譲）

use crate::error::Error;
use crate::ports::outbound::Process;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// 標準ライブラリの Command を使う Process 実装
#[derive(Debug, Clone, Default)]
pub struct StdProcess;

impl Process for StdProcess {
    fn run_with_stdin(&self, program: &Path, args: &[String], input: &str) -> Result<i32, Error> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::io_msg(format!("Failed to execute '{}': {}", program.display(), e))
            })?;
        // stdin は書き込み後に閉じる（子プロセスに EOF を渡す）
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(input.as_bytes()),
            None => Ok(()),
        };
        let status = child.wait().map_err(|e| {
            Error::io_msg(format!("Failed to wait for '{}': {}", program.display(), e))
        })?;
        let code = status.code().unwrap_or(1);
        // 入力を読まずに終了した場合（EPIPE）は子の終了コードを優先する
        if let Err(e) = written {
            if code != 0 {
                return Ok(code);
            }
            return Err(Error::io_msg(format!(
                "Failed to write stdin of '{}' (exit {}): {}",
                program.display(),
                code,
                e
            )));
        }
        Ok(code)
    }
}
