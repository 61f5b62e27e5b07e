//! `loveos inspect` — Run the pipeline without a model and show what it measured.

use loveos_config::AppConfig;
use loveos_engine::{DualAwarenessEngine, DualGapResult};

pub async fn run(text: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let engine = DualAwarenessEngine::from_config(&config.engine, None);

    let dual = engine.evaluate_dual(text).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&dual)?);
    } else {
        let (min, max) = engine.optimizer().settings().resistance_bounds;
        println!("{}", render(&dual, (min, max)));
    }

    Ok(())
}

pub(crate) fn render(dual: &DualGapResult, bounds: (f64, f64)) -> String {
    let r = &dual.result;
    let p = &r.params;
    let mut lines = vec![
        format!("  Phase:        {} (temperature {})", r.phase, r.temperature),
        format!(
            "  Control:      V={} Xi={} R={} Eps={} (R bounds {}..{})",
            p.voltage, p.xi, p.resistance, p.epsilon, bounds.0, bounds.1
        ),
        format!("  Flow:         I={:.4} love={:.4}", r.flow, r.love),
        format!(
            "  Gaps:         user={:.4} ideal={:.4}",
            dual.gap.user_delta, dual.gap.ideal_delta
        ),
        format!("  Policy:       {}", dual.policy_note()),
        format!("  Context:      {}", r.context),
    ];
    for cite in dual.cites() {
        lines.push(format!("  Cites:        {cite}"));
    }
    lines.join("\n")
}
