//! Phase detection: first-match trigger keywords over a fixed, ordered table.
//!
//! Matching is a case-sensitive substring test on the raw input. The table
//! order is part of the contract: "fix my sad code" is ENGINEERING because
//! ENGINEERING is checked before EMPATHY.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating mode selected per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Engineering,
    Empathy,
    Structural,
}

impl Phase {
    /// Every phase, in classification order.
    pub const ALL: [Phase; 3] = [Phase::Engineering, Phase::Empathy, Phase::Structural];

    /// Selected when no trigger matches.
    pub const FALLBACK: Phase = Phase::Structural;

    pub fn triggers(&self) -> &'static [&'static str] {
        match self {
            Phase::Engineering => &["fix", "code", "deploy", "error", "log", "debug", "api"],
            Phase::Empathy => &[
                "sad", "pain", "worry", "anxious", "love", "tired", "feel", "help",
            ],
            Phase::Structural => &[
                "why",
                "reason",
                "plan",
                "define",
                "logic",
                "what",
                "difference",
            ],
        }
    }

    /// Sampling temperature used for generation in this phase.
    pub fn temperature(&self) -> f32 {
        match self {
            Phase::Engineering => 0.1,
            Phase::Empathy => 0.7,
            Phase::Structural => 0.4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Engineering => "ENGINEERING",
            Phase::Empathy => "EMPATHY",
            Phase::Structural => "STRUCTURAL",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub phase: Phase,
    pub temperature: f32,
    /// The trigger that selected the phase; `None` for the fallback.
    pub trigger: Option<&'static str>,
}

/// Stateless classifier over [`Phase::ALL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseClassifier;

impl PhaseClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Pick the first phase (in table order) with a trigger contained in `text`.
    pub fn classify(&self, text: &str) -> Classification {
        for phase in Phase::ALL {
            if let Some(trigger) = phase.triggers().iter().find(|t| text.contains(**t)) {
                return Classification {
                    phase,
                    temperature: phase.temperature(),
                    trigger: Some(*trigger),
                };
            }
        }

        Classification {
            phase: Phase::FALLBACK,
            temperature: Phase::FALLBACK.temperature(),
            trigger: None,
        }
    }
}
