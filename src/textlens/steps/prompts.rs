// SPDX-License-Identifier: MIT

//! Prompt templates for the analysis steps

use serde::{Deserialize, Serialize};

use super::StepKind;
use crate::adk::error::ConfigError;

const PLACEHOLDER: &str = "{text}";

/// Built-in prompt sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptProfile {
    /// General categories, chemistry-oriented entities, 300-word summary
    #[default]
    Sample,
    /// Document categories, discipline entities, 500-word Spanish summary
    Document,
}

/// A prompt with a single `{text}` placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_placeholder(&self) -> bool {
        self.0.contains(PLACEHOLDER)
    }

    /// Substitute the input text into the template
    pub fn render(&self, text: &str) -> String {
        self.0.replace(PLACEHOLDER, text)
    }
}

/// One template per step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    pub classify: PromptTemplate,
    pub extract: PromptTemplate,
    pub summarize: PromptTemplate,
}

impl PromptSet {
    pub fn for_profile(profile: PromptProfile) -> Self {
        match profile {
            PromptProfile::Sample => Self {
                classify: PromptTemplate::new(
                    "Classify the following text into one of the categories: News, Blog, Physics, Chemistry, TIC or Other.\n\nText:{text}\n\nCategory:",
                ),
                extract: PromptTemplate::new(
                    "Extract all the entities (Person, Organization, Location, Chemical Molecules) from the following text. Provide the result as a comma-separated list.\n\nText:{text}\n\nEntities:",
                ),
                summarize: PromptTemplate::new(
                    "Summarize the following text in 300 words using Markdown.\n\nText:{text}\n\nSummary:\n\n",
                ),
            },
            PromptProfile::Document => Self {
                classify: PromptTemplate::new(
                    "Classify the following text into one of the categories: Harvard Case, News, Blog, Science, TIC or Other.\n\nText:{text}\n\nCategory:",
                ),
                extract: PromptTemplate::new(
                    "Extract all the entities (Person, Organization, Location, Discipline) from the following text. Provide the result as a comma-separated list.\n\nText:{text}\n\nEntities:",
                ),
                summarize: PromptTemplate::new(
                    "Summarize the following text in 500 words using Markdown, in Spanish.\n\nText:{text}\n\nSummary:\n\n",
                ),
            },
        }
    }

    pub fn get(&self, kind: StepKind) -> &PromptTemplate {
        match kind {
            StepKind::Classify => &self.classify,
            StepKind::Extract => &self.extract,
            StepKind::Summarize => &self.summarize,
        }
    }

    /// Every template must reference the input text
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in StepKind::ALL {
            if !self.get(kind).has_placeholder() {
                return Err(ConfigError::InvalidTemplate {
                    step: kind.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::for_profile(PromptProfile::default())
    }
}
