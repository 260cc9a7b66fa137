//! 配信チャネルの実装
//!
//! - ConsoleDelivery: 宛先と本文を標準出力に出す
//! - CommandDelivery: 外部プログラムに宛先を引数、本文を標準入力で渡す（ブラウザ自動化などは外部に任せる）

use crate::ports::outbound::DeliveryChannel;
use common::error::Error;
use common::ports::outbound::Process;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 標準出力への配信
pub struct ConsoleDelivery {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleDelivery {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl DeliveryChannel for ConsoleDelivery {
    fn name(&self) -> &str {
        "console"
    }

    fn deliver(&self, destination: &str, payload: &str) -> Result<(), Error> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::system("console writer lock poisoned"))?;
        writeln!(out, "To: {}", destination)
            .and_then(|_| writeln!(out, "{}", payload))
            .and_then(|_| out.flush())
            .map_err(|e| Error::delivery(format!("write to console: {}", e)))
    }
}

/// 外部コマンドへの配信
pub struct CommandDelivery {
    process: Arc<dyn Process>,
    program: PathBuf,
    args: Vec<String>,
}

impl CommandDelivery {
    /// `args` の後ろに宛先を 1 つ追加して起動する
    pub fn new(process: Arc<dyn Process>, program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            process,
            program: program.into(),
            args,
        }
    }
}

impl DeliveryChannel for CommandDelivery {
    fn name(&self) -> &str {
        "command"
    }

    fn deliver(&self, destination: &str, payload: &str) -> Result<(), Error> {
        let mut args = self.args.clone();
        args.push(destination.to_string());
        let code = self
            .process
            .run_with_stdin(&self.program, &args, payload)
            .map_err(|e| Error::delivery(e.to_string()))?;
        if code != 0 {
            return Err(Error::delivery(format!(
                "'{}' exited with status {}",
                self.program.display(),
                code
            )));
        }
        Ok(())
    }
}
