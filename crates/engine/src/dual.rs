//! Dual-awareness: one optimizer run plus two gap measurements.
//!
//! - **User gap**: how far the realized flow falls short of the target
//!   flow level `0.8`.
//! - **Ideal gap**: how far it falls short of the ideal flow at the same
//!   voltage (`Xi = 1.0`, `R = 0.001`, `Epsilon = 0.0`).
//!
//! Both gaps are clamped at zero; exceeding a target is not a negative deficit.

use std::sync::Arc;

use loveos_config::EngineConfig;
use loveos_core::generator::Generator;
use serde::Serialize;
use tracing::{debug, info};

use crate::flow::ControlParams;
use crate::optimizer::{AuditScores, OptimizationResult, ResponseOptimizer};

/// Flow level the user-facing gap is measured against.
pub const TARGET_FLOW: f64 = 0.8;
/// Reason tag attached to dual results.
pub const DUAL_REASON: &str = "unified_rag";
/// Appended to the policy note when exploration is requested.
pub const EXPLORATION_MARKER: &str = " [Exploration: Active]";

/// Per-call switches for [`DualAwarenessEngine::evaluate_dual_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DualOptions {
    /// Reserved for a second optimization pass. Accepted and logged; the
    /// engine currently always runs a single pass.
    pub two_pass: bool,
    /// Mark the result as produced in exploration mode.
    pub explore: bool,
}

impl Default for DualOptions {
    fn default() -> Self {
        Self {
            two_pass: true,
            explore: true,
        }
    }
}

/// The two gaps and their human-readable summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapReport {
    pub user_delta: f64,
    pub ideal_delta: f64,
    pub policy_note: String,
}

impl GapReport {
    /// Measure both gaps for one set of control parameters.
    pub fn measure(params: &ControlParams, explore: bool) -> Self {
        let observed = params.flow();
        let ideal_delta = (params.ideal_flow() - observed).max(0.0);
        let user_delta = (TARGET_FLOW - observed).max(0.0);

        let mut policy_note = format!("Delta-User={user_delta:.2}, Delta-AI={ideal_delta:.2}");
        if explore {
            policy_note.push_str(EXPLORATION_MARKER);
        }

        Self {
            user_delta,
            ideal_delta,
            policy_note,
        }
    }
}

/// One optimizer result wrapped with its gap report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualGapResult {
    pub result: OptimizationResult,
    pub gap: GapReport,
    pub audit: AuditScores,
    pub reason: String,
}

impl DualGapResult {
    pub fn response(&self) -> &str {
        &self.result.response
    }

    pub fn cites(&self) -> &[String] {
        &self.result.cites
    }

    pub fn policy_note(&self) -> &str {
        &self.gap.policy_note
    }
}

/// Wraps a [`ResponseOptimizer`] and adds gap measurement.
pub struct DualAwarenessEngine {
    optimizer: ResponseOptimizer,
    options: DualOptions,
}

impl DualAwarenessEngine {
    pub fn new(optimizer: ResponseOptimizer) -> Self {
        Self {
            optimizer,
            options: DualOptions::default(),
        }
    }

    /// Build the full engine from validated configuration.
    pub fn from_config(config: &EngineConfig, generator: Option<Arc<dyn Generator>>) -> Self {
        Self::new(ResponseOptimizer::from_config(config, generator)).with_options(DualOptions {
            two_pass: config.two_pass,
            explore: config.explore,
        })
    }

    /// Replace the options used by [`Self::evaluate_dual`].
    pub fn with_options(mut self, options: DualOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> DualOptions {
        self.options
    }

    pub fn optimizer(&self) -> &ResponseOptimizer {
        &self.optimizer
    }

    /// Evaluate with the engine's configured options.
    pub async fn evaluate_dual(&self, user_text: &str) -> DualGapResult {
        self.evaluate_dual_with(user_text, self.options).await
    }

    /// Run the optimizer once and measure both gaps.
    pub async fn evaluate_dual_with(&self, user_text: &str, options: DualOptions) -> DualGapResult {
        if options.two_pass {
            debug!("Two-pass requested; running single pass");
        }

        let result = self.optimizer.optimize(user_text).await;
        let gap = GapReport::measure(&result.params, options.explore);

        info!(
            phase = %result.phase,
            flow = result.flow,
            user_delta = gap.user_delta,
            ideal_delta = gap.ideal_delta,
            "Dual evaluation complete"
        );

        DualGapResult {
            audit: result.audit,
            result,
            gap,
            reason: DUAL_REASON.to_string(),
        }
    }
}
