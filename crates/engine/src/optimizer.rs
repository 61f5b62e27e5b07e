//! ResponseOptimizer — one request through classify → retrieve → compose →
//! generate → score.
//!
//! The optimizer never fails. A [`ProviderError`] from the generator becomes
//! a `[System Error: ...]` marker in the response text, and a missing
//! generator becomes `(LLM not connected)`. Callers always get a complete
//! [`OptimizationResult`].

use std::sync::Arc;

use loveos_config::EngineConfig;
use loveos_core::error::ProviderError;
use loveos_core::generator::Generator;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::flow::ControlParams;
use crate::knowledge::KnowledgeBase;
use crate::phase::{Phase, PhaseClassifier};
use crate::prompt::PromptComposer;

/// Reason tag attached to every optimization result.
pub const REASON: &str = "rag_unified";
/// Response text used when no generator is attached.
pub const NOT_CONNECTED: &str = "(LLM not connected)";
/// Display length of a citation snippet, in characters.
pub const CITATION_CHARS: usize = 30;

/// Tunables of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerSettings {
    /// Default voltage for [`ResponseOptimizer::optimize`]
    pub voltage: f64,
    /// Default resistance for [`ResponseOptimizer::optimize`]
    pub base_resistance: f64,
    /// Responsiveness used for every request
    pub xi: f64,
    /// Noise used for every request
    pub epsilon: f64,
    /// Declared `(min, max)` range for resistance. Checked when loading
    /// configuration; the optimizer reports it but does not clamp.
    pub resistance_bounds: (f64, f64),
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            voltage: 0.8,
            base_resistance: 0.2,
            xi: 0.9,
            epsilon: 0.2,
            resistance_bounds: (0.05, 0.6),
        }
    }
}

/// Placeholder audit scores reported with every result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AuditScores {
    pub safety: f64,
    pub intent_shift: f64,
    pub coherence: f64,
}

impl Default for AuditScores {
    fn default() -> Self {
        Self {
            safety: 0.0,
            intent_shift: 0.1,
            coherence: 0.9,
        }
    }
}

/// How the response text was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationOutcome {
    Generated,
    ProviderFailed,
    NotConnected,
}

/// Everything one request produced. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub phase: Phase,
    pub temperature: f32,
    #[serde(flatten)]
    pub params: ControlParams,
    /// Flow `I`
    pub flow: f64,
    /// `I * 0.5 + 0.5`, not clamped
    pub love: f64,
    pub audit: AuditScores,
    pub needs_clarification: bool,
    pub context: String,
    pub prompt: String,
    pub response: String,
    pub outcome: GenerationOutcome,
    pub reason: String,
    pub cites: Vec<String>,
}

/// Orchestrates classifier, knowledge base, composer, flow model and generator.
pub struct ResponseOptimizer {
    generator: Option<Arc<dyn Generator>>,
    classifier: PhaseClassifier,
    knowledge: KnowledgeBase,
    composer: PromptComposer,
    settings: OptimizerSettings,
}

impl ResponseOptimizer {
    /// Create an optimizer with the built-in axioms and default settings.
    pub fn new(generator: Option<Arc<dyn Generator>>) -> Self {
        Self {
            generator,
            classifier: PhaseClassifier::new(),
            knowledge: KnowledgeBase::axioms(),
            composer: PromptComposer::default(),
            settings: OptimizerSettings::default(),
        }
    }

    /// Build an optimizer from validated engine configuration.
    pub fn from_config(config: &EngineConfig, generator: Option<Arc<dyn Generator>>) -> Self {
        let [min, max] = config.resistance_bounds;
        Self::new(generator)
            .with_composer(PromptComposer::new(config.language.clone()))
            .with_settings(OptimizerSettings {
                voltage: config.voltage,
                base_resistance: config.base_resistance,
                resistance_bounds: (min, max),
                ..OptimizerSettings::default()
            })
    }

    pub fn with_knowledge(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = knowledge;
        self
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_settings(mut self, settings: OptimizerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn is_connected(&self) -> bool {
        self.generator.is_some()
    }

    /// Run the pipeline with the configured voltage and base resistance.
    pub async fn optimize(&self, user_text: &str) -> OptimizationResult {
        self.optimize_with(
            user_text,
            self.settings.voltage,
            self.settings.base_resistance,
        )
        .await
    }

    /// Run the pipeline with an explicit voltage and base resistance.
    pub async fn optimize_with(
        &self,
        user_text: &str,
        voltage: f64,
        base_resistance: f64,
    ) -> OptimizationResult {
        let classification = self.classifier.classify(user_text);
        info!(
            phase = %classification.phase,
            temperature = classification.temperature,
            trigger = classification.trigger.unwrap_or("-"),
            "Phase selected"
        );

        let context = self.knowledge.retrieve(user_text);
        let prompt = self.composer.compose(&context, user_text);
        debug!(prompt_len = prompt.len(), "Prompt composed");

        let (response, outcome) = self.generate(&prompt, classification.temperature).await;

        let params = ControlParams {
            voltage,
            xi: self.settings.xi,
            resistance: base_resistance,
            epsilon: self.settings.epsilon,
        };
        let flow = params.flow();
        let love = flow * 0.5 + 0.5;

        let cites = vec![context.chars().take(CITATION_CHARS).collect()];

        OptimizationResult {
            phase: classification.phase,
            temperature: classification.temperature,
            params,
            flow,
            love,
            audit: AuditScores::default(),
            needs_clarification: false,
            context,
            prompt,
            response,
            outcome,
            reason: REASON.to_string(),
            cites,
        }
    }

    async fn generate(&self, prompt: &str, temperature: f32) -> (String, GenerationOutcome) {
        let Some(generator) = &self.generator else {
            return (NOT_CONNECTED.to_string(), GenerationOutcome::NotConnected);
        };

        match generator.generate(prompt, temperature).await {
            Ok(text) => {
                debug!(generator = generator.name(), response_len = text.len(), "Generation succeeded");
                (text, GenerationOutcome::Generated)
            }
            Err(e) => {
                warn!(generator = generator.name(), error = %e, "Generation failed");
                (error_marker(&e), GenerationOutcome::ProviderFailed)
            }
        }
    }
}

/// Inline marker substituted for a failed generation.
pub fn error_marker(error: &ProviderError) -> String {
    format!("[System Error: {error}]")
}
