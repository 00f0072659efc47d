// SPDX-License-Identifier: MIT

//! Analyzer - wires the standard classify → extract → summarize pipeline

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::adk::error::{BuildError, TextlensError};
use crate::adk::model::{create_model, Model};
use crate::textlens::config::AnalyzerConfig;
use crate::textlens::state::{AnalysisReport, StateRecord};
use crate::textlens::steps::{PromptStep, StepKind};
use crate::textlens::workflow::{Pipeline, PipelineBuilder, PipelineEvent, END};

pub const PIPELINE_NAME: &str = "text-analysis";

/// Build the three-step analysis pipeline around `model`
pub fn build_pipeline(
    config: &AnalyzerConfig,
    model: Arc<dyn Model>,
) -> Result<Pipeline, BuildError> {
    let prompts = config.prompt_set();

    let mut builder = PipelineBuilder::new(PIPELINE_NAME);
    for kind in StepKind::ALL {
        let step = PromptStep::new(
            kind,
            prompts.get(kind).clone(),
            model.clone(),
            config.generation_config(kind),
        );
        builder = builder.add_step(kind.name(), Arc::new(step))?;
    }

    builder
        .set_entry(StepKind::Classify.name())?
        .add_edge(StepKind::Classify.name(), StepKind::Extract.name())?
        .add_edge(StepKind::Extract.name(), StepKind::Summarize.name())?
        .add_edge(StepKind::Summarize.name(), END)?
        .build()
}

/// Shareable front end over the analysis pipeline
#[derive(Clone)]
pub struct Analyzer {
    pipeline: Arc<Pipeline>,
}

impl Analyzer {
    /// Build an analyzer around an existing model
    pub fn new(config: &AnalyzerConfig, model: Arc<dyn Model>) -> Result<Self, TextlensError> {
        config.prompt_set().validate()?;
        let pipeline = build_pipeline(config, model)?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
        })
    }

    /// Validate `config` and build the provider model from it
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, TextlensError> {
        let settings = config.validate()?;
        log::info!(
            "Using provider: {} with model: {}",
            settings.provider,
            settings.model_name
        );
        let model = create_model(&settings)?;
        Self::new(config, model)
    }

    pub fn pipeline(&self) -> Arc<Pipeline> {
        self.pipeline.clone()
    }

    /// Run the pipeline over `text` with a fresh state record
    pub async fn analyze(&self, text: &str) -> Result<AnalysisReport, TextlensError> {
        let state = StateRecord::new(text)?;
        let state = self.pipeline.run(state).await?;
        Ok(AnalysisReport::try_from(state)?)
    }

    /// Like [`Analyzer::analyze`], reporting progress on `tx`
    pub async fn analyze_with_events(
        &self,
        text: &str,
        tx: mpsc::Sender<PipelineEvent>,
    ) -> Result<AnalysisReport, TextlensError> {
        let state = StateRecord::new(text)?;
        let state = self.pipeline.run_with_events(state, tx).await?;
        Ok(AnalysisReport::try_from(state)?)
    }
}
