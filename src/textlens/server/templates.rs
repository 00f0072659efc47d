// SPDX-License-Identifier: MIT

//! Askama templates for the upload UI.
//!
//! Each struct corresponds to an HTML file in the templates/ directory.

use askama::Template;

use crate::textlens::state::AnalysisReport;

/// Upload form
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
}

/// The three result panels plus the extracted text
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate<'a> {
    pub title: &'a str,
    pub filename: &'a str,
    pub report: &'a AnalysisReport,
}

/// Single error notice
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report() -> AnalysisReport {
        AnalysisReport {
            text: "Benceno <C6H6>".to_string(),
            classification: "Chemistry".to_string(),
            entities: vec!["Benceno".to_string(), "Metano".to_string()],
            summary: "## Resumen\n\n**Enlaces** covalentes.".to_string(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_index_has_upload_field() {
        let html = IndexTemplate { title: "Analyze" }.render().unwrap();
        assert!(html.contains(r#"name="document""#));
        assert!(html.contains(r#"action="/analyze""#));
    }

    #[test]
    fn test_results_render_panels() {
        let report = report();
        let html = ResultsTemplate {
            title: "Results",
            filename: "enlaces.pdf",
            report: &report,
        }
        .render()
        .unwrap();

        assert!(html.contains("enlaces.pdf"));
        assert!(html.contains("<p>Chemistry</p>"));
        assert!(html.contains("<li>Benceno</li>"));
        assert!(html.contains("<li>Metano</li>"));
        assert!(html.contains("<strong>Enlaces</strong>"));
        // Extracted text is escaped, not interpreted
        assert!(html.contains("Benceno &lt;C6H6&gt;"));
    }

    #[test]
    fn test_error_escapes_message() {
        let html = ErrorTemplate {
            title: "Analysis failed",
            message: "bad <input>",
        }
        .render()
        .unwrap();
        assert!(html.contains("Analysis failed"));
        assert!(html.contains("bad &lt;input&gt;"));
    }
}
