// SPDX-License-Identifier: MIT

//! Pipeline graph type definitions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adk::error::StepError;
use crate::textlens::state::{StateField, StateRecord, StateUpdate};

/// Name of the terminal marker accepted by `add_edge`
pub const END: &str = "__end__";

/// A unit of work: reads the current state, returns the fields it owns
#[async_trait]
pub trait Step: Send + Sync {
    async fn run(&self, state: &StateRecord) -> Result<StateUpdate, StepError>;
}

/// Adapter turning a synchronous closure into a [`Step`]
pub struct FnStep<F> {
    f: F,
}

impl<F> FnStep<F>
where
    F: Fn(&StateRecord) -> Result<StateUpdate, StepError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }

    pub fn shared(f: F) -> Arc<dyn Step>
    where
        F: 'static,
    {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F> Step for FnStep<F>
where
    F: Fn(&StateRecord) -> Result<StateUpdate, StepError> + Send + Sync,
{
    async fn run(&self, state: &StateRecord) -> Result<StateUpdate, StepError> {
        (self.f)(state)
    }
}

/// Destination of an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Step(String),
    End,
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        if name == END {
            Target::End
        } else {
            Target::Step(name.to_string())
        }
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::from(name.as_str())
    }
}

/// A registered step on the validated path
pub struct CompiledStep {
    pub name: String,
    pub step: Arc<dyn Step>,
}

/// Progress notifications emitted by `Pipeline::run_with_events`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    StepStarted {
        run_id: String,
        step: String,
    },
    StepCompleted {
        run_id: String,
        step: String,
        fields: Vec<StateField>,
    },
    StepFailed {
        run_id: String,
        step: String,
        error: String,
    },
    Completed {
        run_id: String,
        state: serde_json::Value,
    },
}
