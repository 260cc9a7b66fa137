//! LLMプロバイダのトレイト定義

/// 単発生成の失敗（呼び出し側はどの失敗でもフォールバックへ分岐する）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    /// 応答がタイムアウト内に返らなかった
    #[error("LLM request timed out: {0}")]
    Timeout(String),
    /// 接続失敗・HTTP エラーステータス
    #[error("LLM transport error: {0}")]
    Transport(String),
    /// 応答を解析できない・本文が空
    #[error("Malformed LLM response: {0}")]
    Malformed(String),
}

/// LLMプロバイダのトレイト
///
/// 各プロバイダ（OpenAI 互換、Echo など）はこのトレイトを実装する。
pub trait LlmProvider: Send + Sync {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// プロンプト 1 件から応答テキスト全文を得る
    ///
    /// # Arguments
    /// * `prompt` - ユーザープロンプト
    /// * `temperature` - 温度パラメータ
    ///
    /// # Returns
    /// * `Ok(String)` - 応答テキスト（前後の空白は除去済み・空でない）
    /// * `Err(LlmError)` - タイムアウト・通信・応答形式の失敗
    fn complete(&self, prompt: &str, temperature: f64) -> Result<String, LlmError>;
}

/// 応答テキストを整形する。空なら Malformed。
pub fn non_empty_reply(text: Option<&str>) -> Result<String, LlmError> {
    let text = text
        .map(str::trim)
        .ok_or_else(|| LlmError::Malformed("response has no text content".to_string()))?;
    if text.is_empty() {
        return Err(LlmError::Malformed("response text is empty".to_string()));
    }
    Ok(text.to_string())
}
