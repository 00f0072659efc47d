// SPDX-License-Identifier: MIT

//! HTTP front end: PDF upload UI plus a small JSON API

pub mod templates;

use askama::Template;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::adk::error::{DocumentError, StateError, TextlensError};
use crate::textlens::analyzer::Analyzer;
use crate::textlens::document::DocumentReader;
use crate::textlens::state::{AnalysisReport, StateRecord};

use templates::{ErrorTemplate, IndexTemplate, ResultsTemplate};

/// Multipart field carrying the uploaded PDF
pub const UPLOAD_FIELD: &str = "document";

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared by every request; each request still gets its own state record
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub reader: Arc<dyn DocumentReader>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, reader: Arc<dyn DocumentReader>) -> Self {
        Self { analyzer, reader }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze_upload))
        .route("/api/health", get(health_check))
        .route("/api/analyze", post(analyze_json))
        .route("/api/analyze/stream", post(stream_analysis))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn index() -> Html<String> {
    let template = IndexTemplate {
        title: "Analyze a document",
    };
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Failures of the upload flow, all rendered as one error notice
#[derive(Debug, Error)]
enum UploadError {
    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("No PDF was uploaded")]
    MissingDocument,

    #[error("Could not read the PDF: {0}")]
    Document(#[from] DocumentError),

    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] TextlensError),
}

/// Pull the `document` part out of the form
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Bytes), UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or("document.pdf")
            .to_string();
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(UploadError::MissingDocument);
        }
        return Ok((filename, bytes));
    }
    Err(UploadError::MissingDocument)
}

/// Extract text off the async runtime, then run the pipeline
async fn analyze_document(state: &AppState, bytes: Bytes) -> Result<AnalysisReport, UploadError> {
    let reader = state.reader.clone();
    let text = tokio::task::spawn_blocking(move || reader.extract_text(&bytes)).await??;
    log::info!("Extracted {} chars from upload", text.len());

    Ok(state.analyzer.analyze(&text).await?)
}

fn render_results(filename: &str, report: &AnalysisReport) -> String {
    let template = ResultsTemplate {
        title: "Results",
        filename,
        report,
    };
    template
        .render()
        .unwrap_or_else(|e| format!("Template error: {}", e))
}

fn render_error(err: &UploadError) -> String {
    let msg = err.to_string();
    let template = ErrorTemplate {
        title: "Analysis failed",
        message: &msg,
    };
    template.render().unwrap_or(msg)
}

async fn analyze_upload(State(state): State<AppState>, mut multipart: Multipart) -> Html<String> {
    let outcome = match read_upload(&mut multipart).await {
        Ok((filename, bytes)) => {
            log::info!("Received upload '{}' ({} bytes)", filename, bytes.len());
            analyze_document(&state, bytes)
                .await
                .map(|report| (filename, report))
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok((filename, report)) => Html(render_results(&filename, &report)),
        Err(e) => {
            log::error!("Upload analysis failed: {}", e);
            Html(render_error(&e))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// JSON error body with a status derived from the failure kind
pub struct ApiError(TextlensError);

impl From<TextlensError> for ApiError {
    fn from(e: TextlensError) -> Self {
        Self(e)
    }
}

impl From<StateError> for ApiError {
    fn from(e: StateError) -> Self {
        Self(e.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            TextlensError::State(_) | TextlensError::Document(_) => StatusCode::BAD_REQUEST,
            TextlensError::Execution(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self.0);
        } else {
            log::warn!("Request rejected: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

async fn analyze_json(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let report = state.analyzer.analyze(&payload.text).await?;
    Ok(Json(report))
}

async fn stream_analysis(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    // Reject blank input up front; once streaming starts only events go out
    StateRecord::new(payload.text.as_str())?;

    let (tx, rx) = mpsc::channel(100);

    tokio::spawn(async move {
        log::info!("Starting streaming analysis ({} chars)", payload.text.len());
        if let Err(e) = state.analyzer.analyze_with_events(&payload.text, tx).await {
            log::error!("Streaming analysis failed: {}", e);
        }
    });

    let stream = ReceiverStream::new(rx).map(|event| {
        Ok(Event::default()
            .json_data(&event)
            .unwrap_or_else(|e| Event::default().event("error").data(e.to_string())))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(1))))
}
