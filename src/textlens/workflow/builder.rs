// SPDX-License-Identifier: MIT

//! Pipeline builder - registers steps and edges, validates the path
//!
//! The builder accepts a general edge list but only produces pipelines
//! that form a single simple path: entry → … → `END`, every registered
//! step visited exactly once. Anything else is rejected at `build()` time
//! so that execution never has to deal with branching or cycles.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::graph::{CompiledStep, Pipeline, Step, Target, END};
use crate::adk::error::BuildError;

/// Builder for [`Pipeline`]s
pub struct PipelineBuilder {
    name: String,
    /// Registration order, used for stable error messages
    steps: Vec<(String, Arc<dyn Step>)>,
    edges: Vec<(String, Target)>,
    entry: Option<String>,
}

impl PipelineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            edges: Vec::new(),
            entry: None,
        }
    }

    fn is_registered(&self, name: &str) -> bool {
        self.steps.iter().any(|(n, _)| n == name)
    }

    fn require_registered(&self, name: &str) -> Result<(), BuildError> {
        if self.is_registered(name) {
            Ok(())
        } else {
            Err(BuildError::unknown(name))
        }
    }

    /// Register a named step. [`END`] is taken by the terminal marker.
    pub fn add_step(
        mut self,
        name: impl Into<String>,
        step: Arc<dyn Step>,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        if name == END || self.is_registered(&name) {
            return Err(BuildError::duplicate(name));
        }
        self.steps.push((name, step));
        Ok(self)
    }

    /// Record a directed edge; `to` may be [`END`](super::graph::END)
    pub fn add_edge(
        mut self,
        from: impl Into<String>,
        to: impl Into<Target>,
    ) -> Result<Self, BuildError> {
        let from = from.into();
        let to = to.into();

        self.require_registered(&from)?;
        if let Target::Step(name) = &to {
            self.require_registered(name)?;
        }

        self.edges.push((from, to));
        Ok(self)
    }

    /// Designate the first step
    pub fn set_entry(mut self, name: impl Into<String>) -> Result<Self, BuildError> {
        let name = name.into();
        self.require_registered(&name)?;
        self.entry = Some(name);
        Ok(self)
    }

    /// Validate the graph and resolve it into an executable pipeline
    pub fn build(self) -> Result<Pipeline, BuildError> {
        let entry = self
            .entry
            .clone()
            .ok_or_else(|| BuildError::malformed("no entry step set"))?;

        let mut outgoing: HashMap<&str, &Target> = HashMap::new();
        for (from, to) in &self.edges {
            if outgoing.insert(from.as_str(), to).is_some() {
                return Err(BuildError::malformed(format!(
                    "step '{}' has more than one outgoing edge",
                    from
                )));
            }
        }

        let mut path: Vec<String> = Vec::with_capacity(self.steps.len());
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = entry.as_str();

        loop {
            if !visited.insert(current) {
                path.push(current.to_string());
                return Err(BuildError::malformed(format!(
                    "cycle detected: {}",
                    path.join(" -> ")
                )));
            }
            path.push(current.to_string());

            match outgoing.get(current) {
                None => {
                    return Err(BuildError::malformed(format!(
                        "step '{}' has no outgoing edge",
                        current
                    )))
                }
                Some(Target::End) => break,
                Some(Target::Step(next)) => current = next.as_str(),
            }
        }

        let unreachable: Vec<&str> = self
            .steps
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| !visited.contains(name))
            .collect();
        if !unreachable.is_empty() {
            return Err(BuildError::malformed(format!(
                "unreachable steps: {}",
                unreachable.join(", ")
            )));
        }

        let mut by_name: HashMap<String, Arc<dyn Step>> = self.steps.into_iter().collect();
        let compiled: Vec<CompiledStep> = path
            .into_iter()
            .filter_map(|name| {
                by_name
                    .remove(&name)
                    .map(|step| CompiledStep { name, step })
            })
            .collect();

        log::info!(
            "Built pipeline '{}' with {} steps: {}",
            self.name,
            compiled.len(),
            compiled
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(" -> ")
        );

        Ok(Pipeline::new(self.name, compiled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textlens::state::{StateRecord, StateUpdate};
    use crate::textlens::workflow::graph::FnStep;

    fn noop() -> Arc<dyn Step> {
        FnStep::shared(|_: &StateRecord| Ok(StateUpdate::default()))
    }

    fn builder_with(names: &[&str]) -> PipelineBuilder {
        names.iter().fold(PipelineBuilder::new("test"), |b, name| {
            b.add_step(*name, noop()).unwrap()
        })
    }

    fn malformed(result: Result<Pipeline, BuildError>) -> String {
        match result {
            Err(BuildError::MalformedPipeline(reason)) => reason,
            Err(other) => panic!("Expected MalformedPipeline, got {:?}", other),
            Ok(_) => panic!("Expected MalformedPipeline, got a pipeline"),
        }
    }

    #[test]
    fn test_linear_pipeline_builds() {
        let pipeline = builder_with(&["classify", "extract", "summarize"])
            .set_entry("classify")
            .unwrap()
            .add_edge("classify", "extract")
            .unwrap()
            .add_edge("extract", "summarize")
            .unwrap()
            .add_edge("summarize", END)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(pipeline.step_names(), vec!["classify", "extract", "summarize"]);
    }

    #[test]
    fn test_path_order_follows_edges_not_registration() {
        let pipeline = builder_with(&["c", "a", "b"])
            .set_entry("a")
            .unwrap()
            .add_edge("c", END)
            .unwrap()
            .add_edge("a", "b")
            .unwrap()
            .add_edge("b", "c")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(pipeline.step_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_step_rejected() {
        let result = builder_with(&["a"]).add_step("a", noop());
        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateStep {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn test_end_marker_is_not_a_step_name() {
        let result = PipelineBuilder::new("test").add_step(END, noop());
        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateStep {
                name: END.to_string()
            })
        );
    }

    #[test]
    fn test_edge_to_unknown_step_rejected() {
        let result = builder_with(&["a"]).add_edge("a", "missing");
        assert_eq!(
            result.err(),
            Some(BuildError::UnknownStep {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_edge_from_unknown_step_rejected() {
        let result = builder_with(&["a"]).add_edge("ghost", END);
        assert!(matches!(result, Err(BuildError::UnknownStep { name }) if name == "ghost"));
    }

    #[test]
    fn test_unknown_entry_rejected() {
        let result = builder_with(&["a"]).set_entry("b");
        assert!(matches!(result, Err(BuildError::UnknownStep { .. })));
    }

    #[test]
    fn test_missing_entry_is_malformed() {
        let result = builder_with(&["a"]).add_edge("a", END).unwrap().build();
        assert!(malformed(result).contains("no entry"));
    }

    #[test]
    fn test_branch_is_malformed() {
        let result = builder_with(&["a", "b", "c"])
            .set_entry("a")
            .unwrap()
            .add_edge("a", "b")
            .unwrap()
            .add_edge("a", "c")
            .unwrap()
            .add_edge("b", END)
            .unwrap()
            .add_edge("c", END)
            .unwrap()
            .build();

        assert!(malformed(result).contains("more than one outgoing edge"));
    }

    #[test]
    fn test_cycle_is_malformed() {
        let result = builder_with(&["a", "b"])
            .set_entry("a")
            .unwrap()
            .add_edge("a", "b")
            .unwrap()
            .add_edge("b", "a")
            .unwrap()
            .build();

        let reason = malformed(result);
        assert!(reason.contains("cycle"));
        assert!(reason.contains("a -> b -> a"));
    }

    #[test]
    fn test_self_loop_is_malformed() {
        let result = builder_with(&["a"])
            .set_entry("a")
            .unwrap()
            .add_edge("a", "a")
            .unwrap()
            .build();
        assert!(malformed(result).contains("cycle"));
    }

    #[test]
    fn test_unreachable_step_is_malformed() {
        let result = builder_with(&["a", "b", "orphan"])
            .set_entry("a")
            .unwrap()
            .add_edge("a", "b")
            .unwrap()
            .add_edge("b", END)
            .unwrap()
            .build();

        assert!(malformed(result).contains("orphan"));
    }

    #[test]
    fn test_dead_end_is_malformed() {
        let result = builder_with(&["a", "b"])
            .set_entry("a")
            .unwrap()
            .add_edge("a", "b")
            .unwrap()
            .build();

        assert!(malformed(result).contains("'b' has no outgoing edge"));
    }

    #[test]
    fn test_duplicate_end_edges_are_a_branch() {
        let result = builder_with(&["a"])
            .set_entry("a")
            .unwrap()
            .add_edge("a", END)
            .unwrap()
            .add_edge("a", END)
            .unwrap()
            .build();
        assert!(malformed(result).contains("more than one"));
    }
}
