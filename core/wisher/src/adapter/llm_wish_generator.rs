//! LLM プロバイダを WishGenerator ポートに合わせるアダプタ
//!
//! プロバイダは最初に必要になった時点で作る。今日の記念日が無い実行では
//! API キーの有無を問わない。

use crate::ports::outbound::{GenerationFailure, WishGenerator};
use common::error::Error;
use common::llm::{create_provider, GeneratorProfile, LlmProvider};
use common::ports::outbound::EnvResolver;
use std::sync::{Arc, OnceLock};

type ProviderFactory = Box<dyn Fn() -> Result<Box<dyn LlmProvider>, Error> + Send + Sync>;

pub struct LlmWishGenerator {
    factory: ProviderFactory,
    provider: OnceLock<Box<dyn LlmProvider>>,
}

impl LlmWishGenerator {
    pub fn new(
        factory: impl Fn() -> Result<Box<dyn LlmProvider>, Error> + Send + Sync + 'static,
    ) -> Self {
        Self {
            factory: Box::new(factory),
            provider: OnceLock::new(),
        }
    }

    /// 生成器設定から作る（API キーは環境変数から初回利用時に読む）
    pub fn from_profile(profile: GeneratorProfile, env: Arc<dyn EnvResolver>) -> Self {
        Self::new(move || create_provider(&profile, env.as_ref()))
    }

    fn provider(&self) -> Result<&dyn LlmProvider, Error> {
        if let Some(p) = self.provider.get() {
            return Ok(p.as_ref());
        }
        let created = (self.factory)()?;
        Ok(self.provider.get_or_init(|| created).as_ref())
    }
}

impl WishGenerator for LlmWishGenerator {
    fn prepare(&self) -> Result<(), Error> {
        self.provider().map(|_| ())
    }

    fn generate(&self, prompt: &str, temperature: f64) -> Result<String, GenerationFailure> {
        let provider = self
            .provider()
            .map_err(|e| GenerationFailure::Transport(e.to_string()))?;
        provider
            .complete(prompt, temperature)
            .map_err(GenerationFailure::from)
    }
}
