//! プロバイダファクトリー
//!
//! GeneratorProfile に基づいて適切なプロバイダを作成する。

use crate::error::Error;
use crate::llm::config::{GeneratorProfile, ProviderTypeKind};
use crate::llm::echo::EchoProvider;
use crate::llm::openai_compat::OpenAiCompatProvider;
use crate::llm::provider::LlmProvider;
use crate::ports::outbound::EnvResolver;
use std::time::Duration;

/// 設定からプロバイダを作成する
///
/// openai 種別で API キーの環境変数が未設定ならエラー（起動時に気付けるように）。
/// openai_compat はキー無し（ローカルサーバ等）を許す。
pub fn create_provider(
    profile: &GeneratorProfile,
    env: &dyn EnvResolver,
) -> Result<Box<dyn LlmProvider>, Error> {
    let timeout = Duration::from_secs(profile.timeout_secs());
    match profile.type_ {
        ProviderTypeKind::Echo => Ok(Box::new(EchoProvider::new())),
        ProviderTypeKind::Openai => {
            let key_env = profile.api_key_env().unwrap_or("OPENAI_API_KEY");
            let api_key = env.var(key_env).ok_or_else(|| {
                Error::invalid_argument(format!("{} environment variable is not set", key_env))
            })?;
            Ok(Box::new(OpenAiCompatProvider::new(
                "openai",
                profile.model(),
                profile.base_url.clone(),
                Some(api_key),
                timeout,
            )))
        }
        ProviderTypeKind::OpenaiCompat => {
            let base_url = profile.base_url.clone().ok_or_else(|| {
                Error::invalid_argument("generator.base_url is required for openai_compat")
            })?;
            let api_key = profile.api_key_env().and_then(|name| env.var(name));
            Ok(Box::new(OpenAiCompatProvider::new(
                "openai_compat",
                profile.model(),
                Some(base_url),
                api_key,
                timeout,
            )))
        }
    }
}
