//! The Love-OS flow engine.
//!
//! Every request goes through the same stateless pipeline:
//!
//! 1. **Classify** the utterance into a [`Phase`] (fixes the temperature)
//! 2. **Retrieve** up to three axioms from the [`KnowledgeBase`]
//! 3. **Compose** the outbound prompt with the [`PromptComposer`]
//! 4. **Generate** through the injected `Generator`; failures become text
//! 5. **Score** the control parameters with the closed-form [`flow`] model
//!
//! [`ResponseOptimizer`] runs steps 1–5; [`DualAwarenessEngine`] wraps it and
//! adds the user/ideal gap report.

pub mod dual;
pub mod flow;
pub mod knowledge;
pub mod optimizer;
pub mod phase;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use dual::{DualAwarenessEngine, DualGapResult, DualOptions, GapReport};
pub use flow::{ControlParams, flow, ideal_flow};
pub use knowledge::{KnowledgeBase, ReferenceEntry, RetrievalHit};
pub use optimizer::{AuditScores, OptimizationResult, OptimizerSettings, ResponseOptimizer};
pub use phase::{Classification, Phase, PhaseClassifier};
pub use prompt::PromptComposer;
