//! config.json の "generator" セクション用の設定型
//!
//! プロバイダ種別とオプション（base_url / model / api_key_env / temperature / timeout_secs）を保持する。

use serde::Deserialize;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.9;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// 生成器 1 つ分の設定
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorProfile {
    /// プロバイダ種別: openai | openai_compat | echo
    pub type_: ProviderTypeKind,
    /// API のベース URL（省略時は各プロバイダのデフォルト）
    pub base_url: Option<String>,
    /// モデル名（省略時は DEFAULT_MODEL）
    pub model: Option<String>,
    /// API キーを読む環境変数名
    pub api_key_env: Option<String>,
    /// 温度（省略時は DEFAULT_TEMPERATURE）
    pub temperature: Option<f64>,
    /// 1 リクエストのタイムアウト秒
    pub timeout_secs: Option<u64>,
}

impl Default for GeneratorProfile {
    fn default() -> Self {
        Self {
            type_: ProviderTypeKind::Openai,
            base_url: None,
            model: None,
            api_key_env: None,
            temperature: None,
            timeout_secs: None,
        }
    }
}

impl GeneratorProfile {
    pub fn echo() -> Self {
        Self {
            type_: ProviderTypeKind::Echo,
            ..Self::default()
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// API キーの環境変数名。openai は未指定でも OPENAI_API_KEY を使う。
    pub fn api_key_env(&self) -> Option<&str> {
        match (&self.api_key_env, self.type_) {
            (Some(name), _) => Some(name.as_str()),
            (None, ProviderTypeKind::Openai) => Some(DEFAULT_API_KEY_ENV),
            (None, _) => None,
        }
    }
}

/// JSON の "type" で使うプロバイダ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderTypeKind {
    Openai,
    OpenaiCompat,
    Echo,
}

impl ProviderTypeKind {
    /// 文字列からプロバイダ種別を解析（CLI の -p 用）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "gpt" => Some(Self::Openai),
            "openai_compat" | "ollama" => Some(Self::OpenaiCompat),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::OpenaiCompat => "openai_compat",
            Self::Echo => "echo",
        }
    }
}

/// serde 用の内部構造（type が予約語のため）
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorProfileRaw {
    #[serde(rename = "type", alias = "provider", default)]
    type_: Option<ProviderTypeKindSerde>,
    base_url: Option<String>,
    #[serde(alias = "default_model")]
    model: Option<String>,
    api_key_env: Option<String>,
    temperature: Option<f64>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ProviderTypeKindSerde {
    #[serde(alias = "gpt")]
    Openai,
    #[serde(rename = "openai_compat", alias = "ollama")]
    OpenaiCompat,
    Echo,
}

impl From<ProviderTypeKindSerde> for ProviderTypeKind {
    fn from(s: ProviderTypeKindSerde) -> Self {
        match s {
            ProviderTypeKindSerde::Openai => ProviderTypeKind::Openai,
            ProviderTypeKindSerde::OpenaiCompat => ProviderTypeKind::OpenaiCompat,
            ProviderTypeKindSerde::Echo => ProviderTypeKind::Echo,
        }
    }
}

impl From<GeneratorProfileRaw> for GeneratorProfile {
    fn from(r: GeneratorProfileRaw) -> Self {
        GeneratorProfile {
            type_: r.type_.map(Into::into).unwrap_or(ProviderTypeKind::Openai),
            base_url: r.base_url,
            model: r.model,
            api_key_env: r.api_key_env,
            temperature: r.temperature,
            timeout_secs: r.timeout_secs,
        }
    }
}

impl GeneratorProfile {
    /// JSON 文字列からパース（ファイル読みは設定ローダーで行う）
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let raw: GeneratorProfileRaw = serde_json::from_str(json)?;
        Ok(raw.into())
    }
}
