// SPDX-License-Identifier: MIT

//! Pipeline executor

use tokio::sync::mpsc;
use uuid::Uuid;

use super::types::{CompiledStep, PipelineEvent};
use crate::adk::error::StepExecutionError;
use crate::textlens::state::StateRecord;

/// A validated, immutable linear pipeline
///
/// Steps are stored in path order as resolved by
/// [`PipelineBuilder::build`](crate::textlens::workflow::builder::PipelineBuilder::build):
/// entry first, the step whose edge leads to `END` last. The pipeline holds
/// no per-run state and can be shared behind an `Arc` by any number of
/// concurrent executions.
pub struct Pipeline {
    name: String,
    steps: Vec<CompiledStep>,
}

impl Pipeline {
    pub(crate) fn new(name: String, steps: Vec<CompiledStep>) -> Self {
        Self { name, steps }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order against `state` and return the final record.
    ///
    /// The first failing step aborts the run; its error is returned and the
    /// partially updated record is dropped.
    pub async fn run(&self, state: StateRecord) -> Result<StateRecord, StepExecutionError> {
        self.execute(state, None).await
    }

    /// Like [`Pipeline::run`], also reporting progress on `tx`.
    ///
    /// A dropped receiver does not affect the run.
    pub async fn run_with_events(
        &self,
        state: StateRecord,
        tx: mpsc::Sender<PipelineEvent>,
    ) -> Result<StateRecord, StepExecutionError> {
        self.execute(state, Some(&tx)).await
    }

    async fn execute(
        &self,
        mut state: StateRecord,
        events: Option<&mpsc::Sender<PipelineEvent>>,
    ) -> Result<StateRecord, StepExecutionError> {
        let run_id = Uuid::new_v4().to_string();
        log::info!(
            "Pipeline '{}' run {} starting ({} steps)",
            self.name,
            run_id,
            self.steps.len()
        );

        for (i, compiled) in self.steps.iter().enumerate() {
            log::info!(
                "Run {}: executing step {}/{} '{}'",
                run_id,
                i + 1,
                self.steps.len(),
                compiled.name
            );
            emit(
                events,
                PipelineEvent::StepStarted {
                    run_id: run_id.clone(),
                    step: compiled.name.clone(),
                },
            )
            .await;

            let update = match compiled.step.run(&state).await {
                Ok(update) => update,
                Err(e) => {
                    log::error!("Run {}: step '{}' failed: {}", run_id, compiled.name, e);
                    emit(
                        events,
                        PipelineEvent::StepFailed {
                            run_id: run_id.clone(),
                            step: compiled.name.clone(),
                            error: e.to_string(),
                        },
                    )
                    .await;
                    return Err(StepExecutionError::new(compiled.name.clone(), e));
                }
            };

            if update.is_empty() {
                log::warn!(
                    "Run {}: step '{}' returned an empty update",
                    run_id,
                    compiled.name
                );
            }
            let fields = update.fields();
            state.apply(update);

            log::info!("Run {}: step '{}' completed", run_id, compiled.name);
            emit(
                events,
                PipelineEvent::StepCompleted {
                    run_id: run_id.clone(),
                    step: compiled.name.clone(),
                    fields,
                },
            )
            .await;
        }

        log::info!("Pipeline '{}' run {} finished", self.name, run_id);
        if events.is_some() {
            let snapshot = serde_json::to_value(&state).unwrap_or_default();
            emit(
                events,
                PipelineEvent::Completed {
                    run_id,
                    state: snapshot,
                },
            )
            .await;
        }

        Ok(state)
    }
}

async fn emit(events: Option<&mpsc::Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}
