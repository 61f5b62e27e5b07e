//! Generator trait — the single capability the flow engine needs from an LLM.
//!
//! The engine hands over one fully composed prompt and a temperature and gets
//! text back. Whether that text comes from OpenAI, Gemini, or a scripted test
//! double is decided by whoever constructs the engine.

use async_trait::async_trait;

use crate::error::ProviderError;

/// `generate(prompt, temperature) -> text`, failing with [`ProviderError`].
///
/// Implementations must be safe to call concurrently (`Send + Sync`): the
/// engine is stateless per call and may be shared across tasks.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name used in logs (e.g. "openai:gpt-4o").
    fn name(&self) -> &str;

    /// Generate a completion for `prompt` at the given sampling temperature.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError>;
}
