//! LLMプロバイダの実装
//!
//! 祝いメッセージの生成に使う単発補完（プロンプト 1 件 → 応答全文）を提供する。

pub mod config;
pub mod echo;
pub mod factory;
pub mod openai_compat;
pub mod provider;

pub use config::{GeneratorProfile, ProviderTypeKind};
pub use factory::create_provider;
pub use provider::{LlmError, LlmProvider};
