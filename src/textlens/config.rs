// SPDX-License-Identifier: MIT

//! Analyzer configuration
//!
//! Configuration is an explicit value handed to the analyzer at startup.
//! It is assembled from an optional YAML file, then overlaid with the
//! process environment (`.env` is loaded by the binary). Nothing below
//! the entry points reads the environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::adk::error::ConfigError;
use crate::adk::model::{GenerationConfig, Provider, ProviderSettings};
use crate::textlens::steps::{PromptProfile, PromptSet, StepKind};

pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Everything needed to build an analyzer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// `OpenAI` or `Anthropic`; inferred from the model name when unset
    pub provider: Option<String>,
    /// [`DEFAULT_MODEL`] when neither the file, the caller nor the
    /// environment names one
    pub model_name: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub profile: PromptProfile,
    /// Replaces the profile's templates when set
    pub prompts: Option<PromptSet>,
    pub classify_temperature: f32,
    pub extract_temperature: f32,
    pub summarize_temperature: f32,
    pub request_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model_name: None,
            api_key: None,
            base_url: None,
            profile: PromptProfile::default(),
            prompts: None,
            classify_temperature: 0.0,
            extract_temperature: 0.0,
            summarize_temperature: 0.1,
            request_timeout_secs: 120,
        }
    }
}

impl AnalyzerConfig {
    /// Parse a YAML config document
    pub fn parse_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a YAML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_yaml(&content)
    }

    /// Overlay values from an environment lookup.
    ///
    /// Recognised keys: `MODEL_PROVIDER`, `TEXTLENS_MODEL`, the provider's
    /// API key variable and its base URL variable. Values already present
    /// in the config win over the environment.
    pub fn with_env(mut self, env: &HashMap<String, String>) -> Self {
        if self.provider.is_none() {
            self.provider = env.get("MODEL_PROVIDER").cloned();
        }
        if self.model_name.is_none() {
            self.model_name = env
                .get("TEXTLENS_MODEL")
                .filter(|m| !m.trim().is_empty())
                .cloned();
        }

        if let Ok(provider) = self.resolve_provider() {
            if self.api_key.is_none() {
                self.api_key = env
                    .get(provider.api_key_env())
                    .filter(|k| !k.trim().is_empty())
                    .cloned();
            }
            if self.base_url.is_none() {
                self.base_url = env.get(provider.base_url_env()).cloned();
            }
        }
        self
    }

    /// Overlay values from the process environment
    pub fn with_process_env(self) -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        self.with_env(&env)
    }

    /// Model in effect
    pub fn model(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn resolve_provider(&self) -> Result<Provider, ConfigError> {
        match &self.provider {
            Some(name) => Provider::parse(name),
            None => Ok(Provider::infer_from_model(self.model())),
        }
    }

    /// Prompt templates in effect
    pub fn prompt_set(&self) -> PromptSet {
        self.prompts
            .clone()
            .unwrap_or_else(|| PromptSet::for_profile(self.profile))
    }

    pub fn generation_config(&self, kind: StepKind) -> GenerationConfig {
        let temperature = match kind {
            StepKind::Classify => self.classify_temperature,
            StepKind::Extract => self.extract_temperature,
            StepKind::Summarize => self.summarize_temperature,
        };
        GenerationConfig::with_temperature(temperature)
    }

    /// Check the config and produce provider settings.
    ///
    /// A missing API key is the fatal startup condition.
    pub fn validate(&self) -> Result<ProviderSettings, ConfigError> {
        let provider = self.resolve_provider()?;

        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey {
                provider: provider.to_string(),
                env_var: provider.api_key_env(),
            })?;

        let base_url = self
            .base_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string());
        url::Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        self.prompt_set().validate()?;

        Ok(ProviderSettings {
            provider,
            api_key,
            model_name: self.model().to_string(),
            base_url,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textlens::steps::PromptTemplate;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.classify_temperature, 0.0);
        assert_eq!(config.summarize_temperature, 0.1);
        assert_eq!(config.resolve_provider().unwrap(), Provider::OpenAI);
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = AnalyzerConfig::default().validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingApiKey {
                env_var: "OPENAI_API_KEY",
                ..
            }
        ));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = AnalyzerConfig::default().with_env(&env(&[("OPENAI_API_KEY", "  ")]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overlay_provides_key_and_base_url() {
        let config = AnalyzerConfig::default().with_env(&env(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
        ]));

        let settings = config.validate().unwrap();
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.base_url, "http://localhost:8080/v1");
        assert_eq!(settings.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_env_model_selects_anthropic() {
        let config = AnalyzerConfig::default().with_env(&env(&[
            ("TEXTLENS_MODEL", "claude-3-5-haiku-latest"),
            ("ANTHROPIC_API_KEY", "ak-test"),
            ("OPENAI_API_KEY", "sk-ignored"),
        ]));

        let settings = config.validate().unwrap();
        assert_eq!(settings.provider, Provider::Anthropic);
        assert_eq!(settings.api_key, "ak-test");
        assert_eq!(settings.base_url, "https://api.anthropic.com/v1");
    }

    #[test]
    fn test_explicit_model_wins_over_env() {
        let config = AnalyzerConfig {
            model_name: Some("gpt-4o".to_string()),
            ..AnalyzerConfig::default()
        }
        .with_env(&env(&[
            ("TEXTLENS_MODEL", "claude-3-5-haiku-latest"),
            ("OPENAI_API_KEY", "sk-test"),
        ]));

        assert_eq!(config.model(), "gpt-4o");
        let settings = config.validate().unwrap();
        assert_eq!(settings.provider, Provider::OpenAI);
        assert_eq!(settings.model_name, "gpt-4o");
        assert_eq!(settings.api_key, "sk-test");
    }

    #[test]
    fn test_yaml_model_wins_over_env() {
        let config = AnalyzerConfig::parse_yaml("model_name: gpt-4o\n")
            .unwrap()
            .with_env(&env(&[("TEXTLENS_MODEL", "claude-3-5-haiku-latest")]));

        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.resolve_provider().unwrap(), Provider::OpenAI);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = AnalyzerConfig {
            api_key: Some("sk-test".to_string()),
            base_url: Some("not a url".to_string()),
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = AnalyzerConfig {
            provider: Some("Gemini".to_string()),
            api_key: Some("k".to_string()),
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
model_name: gpt-3.5-turbo
profile: document
summarize_temperature: 0.1
classify_temperature: 0.1
request_timeout_secs: 30
"#;
        let config = AnalyzerConfig::parse_yaml(yaml).unwrap();
        assert_eq!(config.model(), "gpt-3.5-turbo");
        assert_eq!(config.profile, PromptProfile::Document);
        assert_eq!(config.extract_temperature, 0.0);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.prompt_set().classify.as_str().contains("Harvard Case"));
    }

    #[test]
    fn test_yaml_prompt_override_validated() {
        let yaml = r#"
prompts:
  classify: "Label this: {text}"
  extract: "Entities in: {text}"
  summarize: "Summarize."
"#;
        let config = AnalyzerConfig::parse_yaml(yaml)
            .unwrap()
            .with_env(&env(&[("OPENAI_API_KEY", "sk-test")]));

        assert_eq!(
            config.prompt_set().classify,
            PromptTemplate::new("Label this: {text}")
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTemplate { step }) if step == "summarize"
        ));
    }

    #[test]
    fn test_invalid_yaml_returns_error() {
        let result = AnalyzerConfig::parse_yaml("model_name: [unclosed");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_generation_config_per_step() {
        let config = AnalyzerConfig::default();
        assert_eq!(
            config.generation_config(StepKind::Summarize).temperature,
            Some(0.1)
        );
        assert_eq!(
            config.generation_config(StepKind::Extract).temperature,
            Some(0.0)
        );
    }
}
