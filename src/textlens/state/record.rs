// SPDX-License-Identifier: MIT

//! Runtime state storage for pipeline execution

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::adk::error::StateError;

/// Names of the fields a state record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateField {
    Text,
    Classification,
    Entities,
    Summary,
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateField::Text => "text",
            StateField::Classification => "classification",
            StateField::Entities => "entities",
            StateField::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// Per-execution state. `text` is fixed at construction; the remaining
/// fields stay empty until the step owning them has run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateRecord {
    text: String,
    classification: Option<String>,
    entities: Option<Vec<String>>,
    summary: Option<String>,
}

impl StateRecord {
    /// Create a fresh record, rejecting blank input
    pub fn new(text: impl Into<String>) -> Result<Self, StateError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(StateError::EmptyText);
        }

        Ok(Self {
            text,
            classification: None,
            entities: None,
            summary: None,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn classification(&self) -> Result<&str, StateError> {
        self.classification
            .as_deref()
            .ok_or(StateError::FieldNotPopulated {
                field: StateField::Classification,
            })
    }

    pub fn entities(&self) -> Result<&[String], StateError> {
        self.entities
            .as_deref()
            .ok_or(StateError::FieldNotPopulated {
                field: StateField::Entities,
            })
    }

    pub fn summary(&self) -> Result<&str, StateError> {
        self.summary.as_deref().ok_or(StateError::FieldNotPopulated {
            field: StateField::Summary,
        })
    }

    /// Whether a step has populated `field` yet
    pub fn is_populated(&self, field: StateField) -> bool {
        match field {
            StateField::Text => true,
            StateField::Classification => self.classification.is_some(),
            StateField::Entities => self.entities.is_some(),
            StateField::Summary => self.summary.is_some(),
        }
    }

    /// Merge a partial update. Every field present in `update` replaces
    /// the current value.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(classification) = update.classification {
            self.classification = Some(classification);
        }
        if let Some(entities) = update.entities {
            self.entities = Some(entities);
        }
        if let Some(summary) = update.summary {
            self.summary = Some(summary);
        }
    }

    pub(crate) fn into_parts(self) -> (String, Option<String>, Option<Vec<String>>, Option<String>) {
        (self.text, self.classification, self.entities, self.summary)
    }
}

/// Partial update returned by a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl StateUpdate {
    pub fn classification(value: impl Into<String>) -> Self {
        Self {
            classification: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn entities(values: Vec<String>) -> Self {
        Self {
            entities: Some(values),
            ..Self::default()
        }
    }

    pub fn summary(value: impl Into<String>) -> Self {
        Self {
            summary: Some(value.into()),
            ..Self::default()
        }
    }

    /// Fields this update writes
    pub fn fields(&self) -> Vec<StateField> {
        let mut fields = Vec::new();
        if self.classification.is_some() {
            fields.push(StateField::Classification);
        }
        if self.entities.is_some() {
            fields.push(StateField::Entities);
        }
        if self.summary.is_some() {
            fields.push(StateField::Summary);
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}
