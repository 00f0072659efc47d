// SPDX-License-Identifier: MIT

pub mod analyzer;
pub mod config;
pub mod document;
pub mod sample;
pub mod server;
pub mod state;
pub mod steps;
pub mod workflow;

pub use analyzer::Analyzer;
pub use config::AnalyzerConfig;
