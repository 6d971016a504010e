// file: src/relevance/mod.rs
// description: language-model relevance judgement
// reference: internal module structure

mod filter;
mod ollama;
mod verdict;

pub use filter::{RelevanceFilter, build_prompt};
pub use ollama::OllamaClient;
pub use verdict::Verdict;

use crate::error::Result;
use async_trait::async_trait;

/// Free-text completion from a model endpoint.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String>;
}
