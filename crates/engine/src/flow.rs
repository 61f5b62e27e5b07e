//! The closed-form flow model: `I = (V * Xi) / max(R + Epsilon, 1e-6)`.

use serde::{Deserialize, Serialize};

/// Smallest denominator the model will divide by.
pub const MIN_DENOMINATOR: f64 = 1e-6;

/// Responsiveness of the theoretical ideal state.
pub const IDEAL_XI: f64 = 1.0;
/// Residual resistance of the theoretical ideal state.
pub const IDEAL_RESISTANCE: f64 = 0.001;
/// Noise of the theoretical ideal state.
pub const IDEAL_EPSILON: f64 = 0.0;

/// Flow `I` for voltage `V`, responsiveness `Xi`, resistance `R` and noise `Epsilon`.
///
/// Total: a zero or negative `R + Epsilon` is clamped to [`MIN_DENOMINATOR`].
pub fn flow(voltage: f64, xi: f64, resistance: f64, epsilon: f64) -> f64 {
    (voltage * xi) / (resistance + epsilon).max(MIN_DENOMINATOR)
}

/// The maximum flow reachable at `voltage`; reference point for gap scoring.
pub fn ideal_flow(voltage: f64) -> f64 {
    flow(voltage, IDEAL_XI, IDEAL_RESISTANCE, IDEAL_EPSILON)
}

/// The four inputs of the flow model, carried together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlParams {
    pub voltage: f64,
    pub xi: f64,
    pub resistance: f64,
    pub epsilon: f64,
}

impl ControlParams {
    pub fn flow(&self) -> f64 {
        flow(self.voltage, self.xi, self.resistance, self.epsilon)
    }

    pub fn ideal_flow(&self) -> f64 {
        ideal_flow(self.voltage)
    }
}
