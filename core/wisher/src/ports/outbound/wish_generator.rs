//! メッセージ生成器の Outbound ポート
//!
//! 失敗は型付きで返す。呼び出し側（MessageComposer）はどの失敗でもフォールバックへ分岐する。

use common::error::Error;
use common::llm::LlmError;

/// 生成の失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    Timeout(String),
    Transport(String),
    Malformed(String),
}

impl GenerationFailure {
    pub fn reason(&self) -> &str {
        match self {
            Self::Timeout(m) | Self::Transport(m) | Self::Malformed(m) => m,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "transport",
            Self::Malformed(_) => "malformed",
        }
    }
}

impl From<LlmError> for GenerationFailure {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout(m) => Self::Timeout(m),
            LlmError::Transport(m) => Self::Transport(m),
            LlmError::Malformed(m) => Self::Malformed(m),
        }
    }
}

pub trait WishGenerator: Send + Sync {
    /// 生成を始める前の準備（資格情報の確認など）。ここでの失敗は実行全体の失敗。
    fn prepare(&self) -> Result<(), Error> {
        Ok(())
    }

    /// プロンプトから文面を 1 つ生成する（前後の空白は除去済み・空でない）
    fn generate(&self, prompt: &str, temperature: f64) -> Result<String, GenerationFailure>;
}
