//! `loveos doctor` — Diagnose configuration and provider health.

use loveos_config::{AppConfig, ConfigError};
use loveos_core::provider::Provider;
use loveos_providers::router;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Love-OS Doctor — System Diagnostics");
    println!("===================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — run `loveos onboard` (using defaults)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 blocking issue found. Fix the config file and re-run.");
            return Ok(());
        }
    };

    println!(
        "  ✅ Engine: V={} R={} bounds {:?} language {}",
        config.engine.voltage,
        config.engine.base_resistance,
        config.engine.resistance_bounds,
        config.engine.language
    );

    let credentials_ok = match config.require_credentials() {
        Ok(()) => {
            println!("  ✅ Credentials for '{}' configured", config.default_provider);
            true
        }
        Err(ConfigError::MissingCredentials(reason)) => {
            println!("  ⚠️  {reason}");
            issues += 1;
            false
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
            false
        }
    };

    let providers = router::build_from_config(&config);
    println!("  ✅ Providers registered: {}", providers.list().join(", "));

    let model = config.model_for(&config.default_provider);
    match providers.default() {
        Some(provider) if credentials_ok => match provider.health_check().await {
            Ok(true) => {
                println!("  ✅ Provider '{}' reachable", provider.name());
                match provider.list_models().await {
                    Ok(models) => {
                        let (found, line) = model_report(&models, &model);
                        println!("{line}");
                        if !found {
                            issues += 1;
                        }
                    }
                    Err(e) => println!("  ⚠️  Could not list models: {e}"),
                }
            }
            Ok(false) => {
                println!("  ⚠️  Provider '{}' did not respond", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider '{}' check failed: {e}", provider.name());
                issues += 1;
            }
        },
        Some(provider) => {
            println!("  ⏭️  Skipping '{}' health check (no credentials)", provider.name());
        }
        None => {
            println!("  ❌ Provider '{}' not available", config.default_provider);
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// Whether `model` is among `models`, with the line to print.
///
/// An empty list means the backend does not enumerate models, which is not
/// counted as an issue.
fn model_report(models: &[String], model: &str) -> (bool, String) {
    if models.is_empty() {
        (true, format!("  ⏭️  Model '{model}' not verified (no model list)"))
    } else if models.iter().any(|m| m == model) {
        (true, format!("  ✅ Model '{model}' available"))
    } else {
        (
            false,
            format!(
                "  ⚠️  Model '{model}' not offered ({} models listed)",
                models.len()
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn listed_model_is_available() {
        let (found, line) = model_report(&names(&["gpt-4o-mini", "gpt-4o"]), "gpt-4o");
        assert!(found);
        assert!(line.contains("'gpt-4o' available"));
    }

    #[test]
    fn missing_model_is_an_issue() {
        let (found, line) = model_report(&names(&["gemini-1.5-flash"]), "gemini-2.0-pro");
        assert!(!found);
        assert!(line.contains("1 models listed"));
    }

    #[test]
    fn empty_list_is_not_an_issue() {
        let (found, line) = model_report(&[], "llama3");
        assert!(found);
        assert!(line.contains("not verified"));
    }
}
