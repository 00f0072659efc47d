// SPDX-License-Identifier: MIT

//! Analysis steps - one LLM call each
//!
//! - `classify` - assigns a free-form category label
//! - `extract` - lists named entities
//! - `summarize` - writes a markdown summary

pub mod postprocess;
pub mod prompts;

use async_trait::async_trait;
use std::sync::Arc;

use crate::adk::error::{ExternalCallError, StepError};
use crate::adk::model::{Content, GenerationConfig, Model};
use crate::textlens::state::{StateRecord, StateUpdate};
use crate::textlens::workflow::Step;

pub use prompts::{PromptProfile, PromptSet, PromptTemplate};

/// The three analysis stages, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Classify,
    Extract,
    Summarize,
}

impl StepKind {
    pub const ALL: [StepKind; 3] = [StepKind::Classify, StepKind::Extract, StepKind::Summarize];

    /// Step name used when registering with the pipeline
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Classify => "classify",
            StepKind::Extract => "extract",
            StepKind::Summarize => "summarize",
        }
    }

    /// Turn a raw completion into the update this stage owns
    pub fn to_update(&self, raw: &str) -> StateUpdate {
        match self {
            StepKind::Classify => StateUpdate::classification(postprocess::parse_classification(raw)),
            StepKind::Extract => StateUpdate::entities(postprocess::split_entities(raw)),
            StepKind::Summarize => StateUpdate::summary(postprocess::clean_summary(raw)),
        }
    }
}

/// A step that renders a prompt from the input text and asks the model
pub struct PromptStep {
    kind: StepKind,
    template: PromptTemplate,
    model: Arc<dyn Model>,
    generation: GenerationConfig,
}

impl PromptStep {
    pub fn new(
        kind: StepKind,
        template: PromptTemplate,
        model: Arc<dyn Model>,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            kind,
            template,
            model,
            generation,
        }
    }
}

#[async_trait]
impl Step for PromptStep {
    async fn run(&self, state: &StateRecord) -> Result<StateUpdate, StepError> {
        let prompt = self.template.render(state.text());
        log::debug!(
            "Step '{}' prompt length: {} chars",
            self.kind.name(),
            prompt.len()
        );

        let response = self
            .model
            .generate_content(&[Content::user(prompt)], Some(&self.generation))
            .await?;

        let raw = response
            .text()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                ExternalCallError::invalid_response(format!(
                    "empty completion for step '{}'",
                    self.kind.name()
                ))
            })?;

        Ok(self.kind.to_update(&raw))
    }
}
