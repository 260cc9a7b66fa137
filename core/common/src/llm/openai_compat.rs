//! OpenAI Chat Completions 互換 (/chat/completions) プロバイダ
//!
//! base_url で任意のエンドポイントを指定可能。openai 種別は api.openai.com を既定にする。

use crate::llm::provider::{non_empty_reply, LlmError, LlmProvider};
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI Chat Completions 互換プロバイダ
pub struct OpenAiCompatProvider {
    name: &'static str,
    model: String,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl OpenAiCompatProvider {
    /// 新しいプロバイダを作成
    ///
    /// * `name` - ログ用のプロバイダ名（"openai" / "openai_compat"）
    /// * `model` - モデル名
    /// * `base_url` - ベース URL（None のとき DEFAULT_BASE_URL）
    /// * `api_key` - Bearer トークン（None のとき Authorization を付けない）
    /// * `timeout` - 1 リクエストのタイムアウト
    pub fn new(
        name: &'static str,
        model: impl Into<String>,
        base_url: Option<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            name,
            model: model.into(),
            base_url,
            api_key,
            timeout,
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// リクエストペイロードを生成
    pub fn make_request_payload(&self, prompt: &str, temperature: f64) -> Value {
        json!({
            "model": self.model,
            "temperature": temperature,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        })
    }

    /// レスポンスからテキストを抽出
    pub fn parse_response_text(&self, response_json: &str) -> Result<String, LlmError> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| LlmError::Malformed(format!("Failed to parse response JSON: {}", e)))?;

        if let Some(err) = v.get("error") {
            let msg = err["message"].as_str().unwrap_or("Unknown error");
            return Err(LlmError::Transport(format!("API error: {}", msg)));
        }

        non_empty_reply(v["choices"][0]["message"]["content"].as_str())
    }

    fn make_http_request(&self, payload: &Value) -> Result<String, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LlmError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        let mut builder = client
            .post(self.url())
            .header("Content-Type", "application/json")
            .json(payload);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().map_err(classify_reqwest_error)?;

        let status = response.status();
        let response_text = response.text().map_err(classify_reqwest_error)?;

        if !status.is_success() {
            // エラーレスポンスを解析してメッセージを抽出
            let error_msg = serde_json::from_str::<Value>(&response_text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
                .unwrap_or_else(|| format!("HTTP {}: {}", status, response_text));
            return Err(LlmError::Transport(format!(
                "Chat completions error: {}",
                error_msg
            )));
        }

        Ok(response_text)
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout(e.to_string())
    } else {
        LlmError::Transport(format!("HTTP request failed: {}", e))
    }
}

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn complete(&self, prompt: &str, temperature: f64) -> Result<String, LlmError> {
        let payload = self.make_request_payload(prompt, temperature);
        let response_text = self.make_http_request(&payload)?;
        self.parse_response_text(&response_text)
    }
}
