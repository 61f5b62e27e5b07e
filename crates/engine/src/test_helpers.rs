//! Shared test helpers for engine tests.

use loveos_core::error::ProviderError;
use loveos_core::generator::Generator;
use std::sync::Mutex;

/// One recorded `generate` call.
#[derive(Debug, Clone)]
pub struct GenerationCall {
    pub prompt: String,
    pub temperature: f32,
}

/// A generator that always answers with the same scripted outcome and
/// records every call it receives.
pub struct ScriptedGenerator {
    reply: Result<String, ProviderError>,
    calls: Mutex<Vec<GenerationCall>>,
}

impl ScriptedGenerator {
    /// Always succeed with `text`.
    pub fn text(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(GenerationCall {
            prompt: prompt.to_string(),
            temperature,
        });
        self.reply.clone()
    }
}
