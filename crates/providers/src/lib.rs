//! LLM Provider implementations for Love-OS.
//!
//! All providers implement the `loveos_core::Provider` trait. The router
//! selects the provider named in configuration, and [`ProviderGenerator`]
//! turns it into the `Generator` capability the flow engine consumes.

pub mod gemini;
pub mod generator;
pub mod openai_compat;
pub mod router;

pub use gemini::GeminiProvider;
pub use generator::ProviderGenerator;
pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;

/// Timeout applied to every outbound HTTP request.
const REQUEST_TIMEOUT_SECS: u64 = 120;

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}
