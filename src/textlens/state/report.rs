// SPDX-License-Identifier: MIT

//! Completed analysis view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{StateField, StateRecord};
use crate::adk::error::StateError;

/// A state record whose every field has been populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub text: String,
    pub classification: String,
    pub entities: Vec<String>,
    pub summary: String,
    pub completed_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Plain-text rendering used by the CLI
    pub fn to_text(&self) -> String {
        format!(
            "Classification: {}\n\nEntities: {:?}\n\nSummary: {}",
            self.classification, self.entities, self.summary
        )
    }
}

impl TryFrom<StateRecord> for AnalysisReport {
    type Error = StateError;

    fn try_from(state: StateRecord) -> Result<Self, Self::Error> {
        let (text, classification, entities, summary) = state.into_parts();

        let missing = |field| StateError::FieldNotPopulated { field };
        Ok(Self {
            text,
            classification: classification.ok_or_else(|| missing(StateField::Classification))?,
            entities: entities.ok_or_else(|| missing(StateField::Entities))?,
            summary: summary.ok_or_else(|| missing(StateField::Summary))?,
            completed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textlens::state::StateUpdate;

    fn complete_state() -> StateRecord {
        let mut state = StateRecord::new("Benceno (C6H6)").unwrap();
        state.apply(StateUpdate::classification("Chemistry"));
        state.apply(StateUpdate::entities(vec![
            "Benceno".to_string(),
            "C6H6".to_string(),
        ]));
        state.apply(StateUpdate::summary("## Resumen\n\nEnlaces."));
        state
    }

    #[test]
    fn test_report_from_complete_state() {
        let report = AnalysisReport::try_from(complete_state()).unwrap();
        assert_eq!(report.text, "Benceno (C6H6)");
        assert_eq!(report.classification, "Chemistry");
        assert_eq!(report.entities, vec!["Benceno", "C6H6"]);
        assert!(report.summary.starts_with("## Resumen"));
    }

    #[test]
    fn test_report_from_partial_state_fails() {
        let mut state = StateRecord::new("text").unwrap();
        state.apply(StateUpdate::classification("News"));

        let err = AnalysisReport::try_from(state).unwrap_err();
        assert_eq!(
            err,
            StateError::FieldNotPopulated {
                field: StateField::Entities
            }
        );
    }

    #[test]
    fn test_to_text_has_labeled_sections() {
        let text = AnalysisReport::try_from(complete_state()).unwrap().to_text();
        assert!(text.starts_with("Classification: Chemistry"));
        assert!(text.contains("\n\nEntities: [\"Benceno\", \"C6H6\"]"));
        assert!(text.contains("\n\nSummary: ## Resumen"));
    }
}
