// SPDX-License-Identifier: MIT

//! State management for analysis pipelines
//!
//! This module provides:
//! - `StateRecord` - the per-execution record threaded through the steps
//! - `StateUpdate` - a step's partial update, merged last-write-wins
//! - `AnalysisReport` - the fully populated view handed to callers

mod record;
mod report;

pub use record::{StateField, StateRecord, StateUpdate};
pub use report::AnalysisReport;
