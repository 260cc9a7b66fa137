//! Echoプロバイダの実装
//!
//! 実際にLLM APIを呼び出さず、プロンプトから決定的な文面を組み立てる。
//! `--dry-run` やオフラインでの動作確認に使う。

use crate::llm::provider::{LlmError, LlmProvider};

/// Echoプロバイダ
#[derive(Debug, Clone, Default)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn complete(&self, prompt: &str, _temperature: f64) -> Result<String, LlmError> {
        // 先頭行（依頼文）をそのまま返す。スタイル指示が変われば文面も変わる。
        let first = prompt.lines().map(str::trim).find(|l| !l.is_empty());
        match first {
            Some(line) => Ok(format!("[echo] {}", line)),
            None => Err(LlmError::Malformed("empty prompt".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_provider_name() {
        assert_eq!(EchoProvider::new().name(), "echo");
    }

    #[test]
    fn test_echo_returns_first_non_empty_line() {
        let p = EchoProvider::new();
        let out = p.complete("\n  Write a wish for Asha.\nMore details", 0.9).unwrap();
        assert_eq!(out, "[echo] Write a wish for Asha.");
    }

    #[test]
    fn test_echo_empty_prompt_is_malformed() {
        assert!(matches!(
            EchoProvider::new().complete("  \n", 0.9),
            Err(LlmError::Malformed(_))
        ));
    }
}
