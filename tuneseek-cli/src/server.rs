//! HTTP interface
//!
//! Thin axum layer over the dispatcher. Errors are mapped to JSON payloads
//! in one place.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use tuneseek_core::Platform;
use tuneseek_engine::{SearchDispatcher, SearchError, SearchOutcome};
use tuneseek_net::{relay, FetchError};

const PASSTHROUGH_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<SearchDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: SearchDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/metadata/search", get(search_metadata))
        .route("/api/platforms", get(list_platforms))
        .route("/api/cors", get(relay_resource))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, dispatcher: SearchDispatcher) -> anyhow::Result<()> {
    let app = create_router(AppState::new(dispatcher));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    platform: i64,
    #[serde(default)]
    query: String,
}

async fn search_metadata(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let outcome = state.dispatcher.search(params.platform, &params.query).await?;

    Ok(match outcome {
        SearchOutcome::Records(records) => Json(records).into_response(),
        SearchOutcome::Passthrough { content_type, body } => {
            let content_type = content_type.unwrap_or_else(|| PASSTHROUGH_CONTENT_TYPE.to_string());
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
    })
}

async fn list_platforms(State(state): State<AppState>) -> Json<Vec<Platform>> {
    Json(state.dispatcher.registry().iter().cloned().collect())
}

#[derive(Debug, Deserialize)]
struct RelayParams {
    url: String,
}

async fn relay_resource(
    State(state): State<AppState>,
    Query(params): Query<RelayParams>,
) -> Result<Response, ApiError> {
    let resource = relay(state.dispatcher.fetcher().as_ref(), &params.url).await?;

    let disposition = resource
        .file_name
        .map(|name| format!("inline; filename=\"{}\"", name.replace('"', "")))
        .unwrap_or_else(|| "inline".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, resource.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        resource.bytes,
    )
        .into_response())
}

/// Errors surfaced by the HTTP interface
#[derive(Debug)]
pub enum ApiError {
    Search(SearchError),
    Relay(FetchError),
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError::Search(err)
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError::Relay(err)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upstream_status: Option<u16>,
}

fn upstream_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|code| code.is_client_error() || code.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

fn fetch_failure_status(err: &FetchError) -> StatusCode {
    match err {
        FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        FetchError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        FetchError::Status(status) => upstream_code(*status),
        FetchError::ClientBuild(_) | FetchError::Request(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Search(SearchError::Validation) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Query is required".to_string(),
                    details: None,
                    upstream_status: None,
                },
            ),
            ApiError::Search(SearchError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "Platform not found or URL is empty".to_string(),
                    details: None,
                    upstream_status: None,
                },
            ),
            ApiError::Search(SearchError::Upstream { status }) => {
                warn!("Remote API error: {}", status);
                (
                    upstream_code(*status),
                    ErrorResponse {
                        error: "Remote API error".to_string(),
                        details: None,
                        upstream_status: Some(*status),
                    },
                )
            }
            ApiError::Search(SearchError::Network(e)) => {
                error!("Network error: {}", e);
                (
                    fetch_failure_status(e),
                    ErrorResponse {
                        error: "Network error".to_string(),
                        details: Some(e.to_string()),
                        upstream_status: None,
                    },
                )
            }
            ApiError::Relay(e) => {
                warn!("Relay error: {}", e);
                let upstream_status = match e {
                    FetchError::Status(status) => Some(*status),
                    _ => None,
                };
                (
                    fetch_failure_status(e),
                    ErrorResponse {
                        error: "Relay error".to_string(),
                        details: Some(e.to_string()),
                        upstream_status,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
