// SPDX-License-Identifier: MIT

//! Model module - the boundary to the hosted LLM
//!
//! This module provides the core Model trait and shared types.
//! Model implementations are in their own submodules:
//! - [anthropic] - Anthropic's Claude API
//! - [openai] - OpenAI's Chat Completions API

pub mod anthropic;
pub mod openai;

use crate::adk::error::{ConfigError, ExternalCallError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for model generation
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

impl GenerationConfig {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..Self::default()
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    /// A single user message carrying `text`
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts, ignoring thinking output
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Thinking(_) => None,
            })
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Parts of a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    /// Regular text output from the model
    Text(String),
    /// Reasoning content from thinking models, never used as a completion
    Thinking(String),
}

/// Core trait for LLM model implementations
#[async_trait]
pub trait Model: Send + Sync {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, ExternalCallError>;
}

/// Supported hosted providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    OpenAI,
    Anthropic,
}

impl Provider {
    /// Parse a provider name as written in config or env
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name {
            "OpenAI" | "openai" => Ok(Self::OpenAI),
            "Anthropic" | "anthropic" => Ok(Self::Anthropic),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }

    /// Infer the provider from the model name prefix
    pub fn infer_from_model(model_name: &str) -> Self {
        if model_name.starts_with("claude") {
            Self::Anthropic
        } else {
            Self::OpenAI
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn base_url_env(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_BASE_URL",
            Self::Anthropic => "ANTHROPIC_BASE_URL",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAI => write!(f, "OpenAI"),
            Self::Anthropic => write!(f, "Anthropic"),
        }
    }
}

/// Everything an adapter needs to talk to its provider
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub provider: Provider,
    pub api_key: String,
    pub model_name: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

/// Build the model adapter for the configured provider
pub fn create_model(settings: &ProviderSettings) -> Result<Arc<dyn Model>, ConfigError> {
    log::debug!(
        "Using provider '{}' with model '{}'",
        settings.provider,
        settings.model_name
    );

    let client = reqwest::Client::builder()
        .timeout(settings.request_timeout)
        .build()?;

    let model: Arc<dyn Model> = match settings.provider {
        Provider::OpenAI => Arc::new(openai::OpenAIModel::new(client, settings)),
        Provider::Anthropic => Arc::new(anthropic::AnthropicModel::new(client, settings)),
    };
    Ok(model)
}

/// Map a non-success HTTP response to the matching error
pub(crate) async fn error_from_response(
    provider: Provider,
    resp: reqwest::Response,
) -> ExternalCallError {
    let status = resp.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        return ExternalCallError::RateLimited {
            provider: provider.to_string(),
            retry_after_secs,
        };
    }

    let message = resp.text().await.unwrap_or_default();
    ExternalCallError::api(provider.to_string(), status.as_u16(), message)
}
