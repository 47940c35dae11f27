//! API request handlers
//!
//! Every filter response uses the `{status_code, message, data}` envelope.
//! Core errors are not classified: all of them come back as 500.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::server::AppState;
use crate::error::{FilterError, FilterResult};
use crate::filter::{run_eligibility, run_rules, EligibilityPayload, RuleRequest};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Standard API response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    /// `"Success"`, or a list holding the error text
    pub message: serde_json::Value,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            message: json!("Success"),
            data: Some(data),
        }
    }

    pub fn failure(err: &FilterError) -> Self {
        Self {
            status_code: error_status(err).as_u16(),
            message: json!([err.to_string()]),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Status for a failed request. Input mistakes and internal faults both map
/// to 500.
pub fn error_status(_err: &FilterError) -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

fn respond<T: Serialize>(request_id: Uuid, result: FilterResult<T>) -> Response {
    match result {
        Ok(data) => {
            info!(%request_id, "Request succeeded");
            ApiResponse::ok(data).into_response()
        }
        Err(e) => {
            warn!(%request_id, error = %e, "Request failed");
            ApiResponse::<T>::failure(&e).into_response()
        }
    }
}

/// Run filter work off the async workers
async fn run_blocking<T, F>(job: F) -> FilterResult<T>
where
    F: FnOnce() -> FilterResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| FilterError::Io(std::io::Error::other(e)))?
}

/// Root endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ApiResponse::ok(RootResponse {
        name: "Sheet Filter API Server".to_string(),
        version: state.version.clone(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new(
                "/filter/eligibility/",
                "POST",
                "Filter the eligibility workbook by category and numeric predicates",
            ),
            EndpointInfo::new(
                "/filter/rules/",
                "POST",
                "Score the rules workbook against category and numeric rubrics",
            ),
            EndpointInfo::new("/download/", "GET", "Download a stored file (?filename=)"),
        ],
    })
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// POST /filter/eligibility/ - Filter the eligibility source
///
/// Body is the list envelope `[{eligibilityName, eligibilityJson}]`; only the
/// first element is used.
pub async fn filter_eligibility(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let request_id = Uuid::new_v4();
    info!(%request_id, source = %state.eligibility_source.display(), "Eligibility request");

    let result = run_blocking(move || {
        let payload: EligibilityPayload = serde_json::from_value(body)?;
        run_eligibility(&state.store, &state.eligibility_source, payload)
    })
    .await;

    respond(request_id, result)
}

/// POST /filter/rules/ - Score the rules source
pub async fn filter_rules(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let request_id = Uuid::new_v4();
    info!(%request_id, source = %state.rules_source.display(), "Rules request");

    let result = run_blocking(move || {
        let request: RuleRequest = serde_json::from_value(body)?;
        run_rules(&state.store, &state.rules_source, request)
    })
    .await;

    respond(request_id, result)
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub filename: Option<String>,
}

/// GET /download/?filename= - Stream a stored file as an attachment
///
/// The filename is joined onto the storage directory unchecked, so `..`
/// segments can reach outside it.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let request_id = Uuid::new_v4();
    let Some(filename) = query.filename else {
        let err = FilterError::InvalidPayload("missing 'filename' query parameter".to_string());
        return respond::<()>(request_id, Err(err));
    };

    let path = state.store.file_path(&filename);
    info!(%request_id, path = %path.display(), "Download request");

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let attachment = Path::new(&filename)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| filename.clone());
            let content_type = if attachment.ends_with(".xlsx") {
                XLSX_CONTENT_TYPE
            } else {
                "application/octet-stream"
            };
            (
                [
                    (header::CONTENT_TYPE, content_type.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", attachment),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => respond::<()>(
            request_id,
            Err(FilterError::FileNotFound(path.display().to_string())),
        ),
        Err(e) => respond::<()>(request_id, Err(e.into())),
    }
}
