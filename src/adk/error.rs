// SPDX-License-Identifier: MIT

//! Typed error handling for textlens-rs
//!
//! Errors are split by the phase in which they can occur:
//! - [`BuildError`] - pipeline construction, never at run time
//! - [`StepExecutionError`] - a step failed while a pipeline was running
//! - [`ExternalCallError`] - the LLM collaborator failed
//! - [`DocumentError`] - the document-to-text collaborator failed
//! - [`ConfigError`] - startup configuration is unusable
//!
//! [`TextlensError`] wraps all of them for the entry points.

use std::path::PathBuf;
use thiserror::Error;

use crate::textlens::state::StateField;

/// Top-level error type for textlens-rs
#[derive(Debug, Error)]
pub enum TextlensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline build error: {0}")]
    Build(#[from] BuildError),

    #[error(transparent)]
    Execution(#[from] StepExecutionError),

    #[error("Invalid state: {0}")]
    State(#[from] StateError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// Errors raised while assembling a pipeline
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Step '{name}' is already registered")]
    DuplicateStep { name: String },

    #[error("Step '{name}' is not registered")]
    UnknownStep { name: String },

    #[error("Malformed pipeline: {0}")]
    MalformedPipeline(String),
}

impl BuildError {
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateStep { name: name.into() }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownStep { name: name.into() }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPipeline(reason.into())
    }
}

/// Failures of the remote LLM collaborator
#[derive(Debug, Error)]
pub enum ExternalCallError {
    /// Non-success response from the provider
    #[error("API error from {provider} (status {status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    /// HTTP 429 from the provider
    #[error("Rate limit exceeded for {provider}, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        provider: String,
        retry_after_secs: Option<u64>,
    },

    /// The provider answered but the payload had no usable completion
    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ExternalCallError {
    pub fn api(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

/// Violations of the state record contract
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Input text is empty")]
    EmptyText,

    #[error("Field '{field}' read before any step populated it")]
    FieldNotPopulated { field: StateField },
}

/// Anything a step function can fail with
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    External(#[from] ExternalCallError),

    #[error(transparent)]
    State(#[from] StateError),
}

/// A step failed; the whole execution is discarded
#[derive(Debug, Error)]
#[error("Step '{step}' failed: {source}")]
pub struct StepExecutionError {
    pub step: String,
    #[source]
    pub source: StepError,
}

impl StepExecutionError {
    pub fn new(step: impl Into<String>, source: impl Into<StepError>) -> Self {
        Self {
            step: step.into(),
            source: source.into(),
        }
    }
}

/// Failures of the document-to-text collaborator
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Not a PDF document (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    #[error("Required tool not found: {0}")]
    ToolNotFound(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Document contains no extractable text")]
    NoText,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Startup configuration problems; all of them are fatal
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not configured for provider {provider}; set {env_var}")]
    MissingApiKey {
        provider: String,
        env_var: &'static str,
    },

    #[error("Unknown model provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Prompt template for {step} has no {{text}} placeholder")]
    InvalidTemplate { step: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
