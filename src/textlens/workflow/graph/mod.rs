// SPDX-License-Identifier: MIT

//! Linear pipeline execution
//!
//! This module provides the executor that walks a validated pipeline
//! from its entry step to the terminal marker.

pub mod executor;
pub mod types;

pub use executor::Pipeline;
pub use types::{CompiledStep, FnStep, PipelineEvent, Step, Target, END};
