//! Configuration loading, validation, and management for Love-OS.
//!
//! Loads configuration from `~/.loveos/config.toml` with environment
//! variable overrides. Validates all settings at startup, so the flow engine
//! only ever sees a checked [`EngineConfig`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default system instruction sent alongside every composed prompt.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Love-OS. Based on the Love Equation (I=V/R), conduct a dialogue that minimizes resistance. Speak in English.";

/// Marker found in the key shipped in example configs.
const PLACEHOLDER_KEY_MARKER: &str = "xxxx";

/// The root configuration structure.
///
/// Maps directly to `~/.loveos/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider ("openai", "gemini", or any OpenAI-compatible name)
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Max tokens per LLM response (unset = provider default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// System instruction sent with every prompt
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Flow engine parameters
    #[serde(default)]
    pub engine: EngineConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt", &self.system_prompt)
            .field("engine", &self.engine)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// Parameters of the flow pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Voltage V: the will to connect
    #[serde(default = "default_voltage")]
    pub voltage: f64,

    /// Base resistance R used for every request
    #[serde(default = "default_base_resistance")]
    pub base_resistance: f64,

    /// Allowed `[min, max]` range for `base_resistance`
    #[serde(default = "default_resistance_bounds")]
    pub resistance_bounds: [f64; 2],

    /// Language the model is asked to answer in
    #[serde(default = "default_language")]
    pub language: String,

    /// Reserved second optimization pass (currently a no-op)
    #[serde(default = "default_true")]
    pub two_pass: bool,

    /// Mark results as produced in exploration mode
    #[serde(default = "default_true")]
    pub explore: bool,
}

fn default_voltage() -> f64 {
    0.8
}
fn default_base_resistance() -> f64 {
    0.2
}
fn default_resistance_bounds() -> [f64; 2] {
    [0.05, 0.6]
}
fn default_language() -> String {
    "English".into()
}
fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            voltage: default_voltage(),
            base_resistance: default_base_resistance(),
            resistance_bounds: default_resistance_bounds(),
            language: default_language(),
            two_pass: true,
            explore: true,
        }
    }
}

impl EngineConfig {
    /// Validate the engine parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.voltage.is_finite() || self.voltage < 0.0 {
            return Err(ConfigError::ValidationError(
                "engine.voltage must be a finite, non-negative number".into(),
            ));
        }

        let [min, max] = self.resistance_bounds;
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
            return Err(ConfigError::ValidationError(format!(
                "engine.resistance_bounds [{min}, {max}] must satisfy 0 <= min <= max"
            )));
        }

        if !(min..=max).contains(&self.base_resistance) {
            return Err(ConfigError::ValidationError(format!(
                "engine.base_resistance {} is outside [{min}, {max}]",
                self.base_resistance
            )));
        }

        if self.language.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "engine.language must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.loveos/config.toml).
    ///
    /// Environment overrides are applied on top, then the result is
    /// validated again. See [`AppConfig::apply_env_overrides`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_dir().join("config.toml"), |name| {
            std::env::var(name).ok()
        })
    }

    /// Load from `path`, apply overrides read through `var`, and validate.
    pub fn load_with_env(
        path: &Path,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides(var);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides.
    ///
    /// - `LOVEOS_PROVIDER` replaces `default_provider`
    /// - `LOVEOS_MODEL` replaces `default_model` and the selected provider's
    ///   `default_model`, so it wins over both
    /// - when no key is configured, the selected provider's own variable is
    ///   used (`GEMINI_API_KEY` then `GOOGLE_API_KEY` for gemini/google,
    ///   `OPENAI_API_KEY` otherwise), falling back to `LOVEOS_API_KEY`
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = var("LOVEOS_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = var("LOVEOS_MODEL") {
            if let Some(provider) = self.providers.get_mut(&self.default_provider) {
                provider.default_model = Some(model.clone());
            }
            self.default_model = model;
        }

        if self.api_key_for(&self.default_provider).is_none() {
            let specific: &[&str] = if is_google(&self.default_provider) {
                &["GEMINI_API_KEY", "GOOGLE_API_KEY"]
            } else {
                &["OPENAI_API_KEY"]
            };
            self.api_key = specific
                .iter()
                .chain(std::iter::once(&"LOVEOS_API_KEY"))
                .find_map(|name| var(name).filter(|key| !key.trim().is_empty()));
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".loveos")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_provider.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_provider must not be empty".into(),
            ));
        }

        if self.max_tokens == Some(0) {
            return Err(ConfigError::ValidationError(
                "max_tokens must be greater than 0".into(),
            ));
        }

        self.engine.validate()
    }

    /// The model to request from `provider`: its own `default_model` first,
    /// then the global one.
    pub fn model_for(&self, provider: &str) -> String {
        self.providers
            .get(provider)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| self.default_model.clone())
    }

    /// The key to use for `provider`: per-provider key first, then the global one.
    pub fn api_key_for(&self, provider: &str) -> Option<String> {
        self.providers
            .get(provider)
            .and_then(|p| p.api_key.clone())
            .or_else(|| self.api_key.clone())
    }

    /// Check that the default provider has a usable (non-placeholder) key.
    ///
    /// Local OpenAI-compatible servers (ollama, vllm, llama.cpp) need none.
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        if is_keyless(&self.default_provider) {
            return Ok(());
        }

        match self.api_key_for(&self.default_provider) {
            None => Err(ConfigError::MissingCredentials(format!(
                "no API key configured for provider '{}'",
                self.default_provider
            ))),
            Some(key) if key.trim().is_empty() || key.contains(PLACEHOLDER_KEY_MARKER) => {
                Err(ConfigError::MissingCredentials(format!(
                    "the API key for provider '{}' is still a placeholder",
                    self.default_provider
                )))
            }
            Some(_) => Ok(()),
        }
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            max_tokens: None,
            system_prompt: default_system_prompt(),
            engine: EngineConfig::default(),
            providers: HashMap::new(),
        }
    }
}

fn is_google(provider: &str) -> bool {
    matches!(provider, "gemini" | "google")
}

fn is_keyless(provider: &str) -> bool {
    matches!(provider, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-4o");
        assert!((config.engine.voltage - 0.8).abs() < f64::EPSILON);
        assert!((config.engine.base_resistance - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.engine.resistance_bounds, [0.05, 0.6]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.engine.language, "English");
        assert_eq!(parsed.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn resistance_outside_bounds_rejected() {
        let mut config = AppConfig::default();
        config.engine.base_resistance = 0.9;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_resistance"));

        config.engine.base_resistance = 0.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut config = AppConfig::default();
        config.engine.resistance_bounds = [0.6, 0.05];
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_voltage_rejected() {
        let mut config = AppConfig::default();
        config.engine.voltage = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().default_provider, "openai");
    }

    #[test]
    fn load_from_file_with_engine_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
default_provider = "gemini"
default_model = "gemini-1.5-flash"

[engine]
voltage = 1.2
base_resistance = 0.3
explore = false

[providers.gemini]
api_key = "g-key"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.default_provider, "gemini");
        assert!((config.engine.voltage - 1.2).abs() < f64::EPSILON);
        assert!(!config.engine.explore);
        assert!(config.engine.two_pass);
        assert_eq!(config.api_key_for("gemini").as_deref(), Some("g-key"));
    }

    #[test]
    fn invalid_file_is_a_validation_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nbase_resistance = 5.0").unwrap();

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine = [[[").unwrap();

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn placeholder_key_is_missing_credentials() {
        let config = AppConfig {
            api_key: Some("sk-xxxxxxxxxxxxxxxxxxxxxxxx".into()),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.require_credentials(),
            Err(ConfigError::MissingCredentials(_))
        ));
    }

    #[test]
    fn absent_key_is_missing_credentials() {
        let config = AppConfig::default();
        assert!(config.require_credentials().is_err());
    }

    #[test]
    fn local_provider_needs_no_key() {
        let config = AppConfig {
            default_provider: "ollama".into(),
            ..AppConfig::default()
        };
        assert!(config.require_credentials().is_ok());
    }

    #[test]
    fn real_key_passes() {
        let config = AppConfig {
            api_key: Some("sk-live-123".into()),
            ..AppConfig::default()
        };
        assert!(config.require_credentials().is_ok());
    }

    #[test]
    fn debug_output_redacts_keys() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("openai"));
        assert!(toml_str.contains("base_resistance"));
    }

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn gemini_provider_picks_gemini_key() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("OPENAI_API_KEY", "sk-openai-key"),
            ("GEMINI_API_KEY", "gemini-key"),
            ("LOVEOS_PROVIDER", "gemini"),
        ]));
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.api_key_for("gemini").as_deref(), Some("gemini-key"));
    }

    #[test]
    fn google_key_used_when_gemini_key_absent() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("OPENAI_API_KEY", "sk-openai-key"),
            ("GOOGLE_API_KEY", "google-key"),
            ("LOVEOS_PROVIDER", "google"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("google-key"));
    }

    #[test]
    fn openai_provider_ignores_gemini_key() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("GEMINI_API_KEY", "gemini-key"),
            ("OPENAI_API_KEY", "sk-openai-key"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-openai-key"));
    }

    #[test]
    fn generic_key_is_the_fallback() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("GEMINI_API_KEY", "gemini-key"),
            ("LOVEOS_API_KEY", "generic-key"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("generic-key"));
    }

    #[test]
    fn file_key_is_not_replaced_by_env() {
        let mut config = AppConfig {
            api_key: Some("file-key".into()),
            ..AppConfig::default()
        };
        config.apply_env_overrides(env(&[("OPENAI_API_KEY", "sk-openai-key")]));
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn model_override_beats_provider_model() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
default_provider = "gemini"

[providers.gemini]
api_key = "g-key"
default_model = "gemini-1.5-flash"
"#
        )
        .unwrap();

        let config =
            AppConfig::load_with_env(file.path(), env(&[("LOVEOS_MODEL", "gemini-2.0-pro")]))
                .unwrap();
        assert_eq!(config.model_for("gemini"), "gemini-2.0-pro");
        assert_eq!(config.default_model, "gemini-2.0-pro");
    }

    #[test]
    fn provider_model_beats_global_model() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "gemini".into(),
            ProviderConfig {
                api_key: None,
                api_url: None,
                default_model: Some("gemini-1.5-flash".into()),
            },
        );
        assert_eq!(config.model_for("gemini"), "gemini-1.5-flash");
        assert_eq!(config.model_for("openai"), "gpt-4o");
    }

    #[test]
    fn empty_provider_override_fails_validation() {
        let err = AppConfig::load_with_env(
            Path::new("/nonexistent/config.toml"),
            env(&[("LOVEOS_PROVIDER", "")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
