//! Search error taxonomy

use thiserror::Error;
use tuneseek_net::FetchError;

/// Errors surfaced by a search. Per-item extraction gaps are never errors.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Query is required")]
    Validation,

    #[error("Platform {0} not found or has no search URL")]
    NotFound(i64),

    #[error("Remote site returned status {status}")]
    Upstream { status: u16 },

    #[error("Network error: {0}")]
    Network(#[source] FetchError),
}

impl SearchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SearchError::Network(FetchError::Timeout(_)))
    }
}

impl From<FetchError> for SearchError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Status(status) => SearchError::Upstream { status },
            other => SearchError::Network(other),
        }
    }
}
