// SPDX-License-Identifier: MIT

pub mod builder;
pub mod graph;

pub use builder::PipelineBuilder;
pub use graph::{FnStep, Pipeline, PipelineEvent, Step, Target, END};
