//! Remote page fetcher
//!
//! One GET per call, no retries. The only bound on latency is the
//! configured request timeout.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{ClientSet, FetchConfig, FetchError};

/// A fetched response, whatever its status
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Anything that can perform an outbound GET
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Shared fetcher handle
pub type SharedFetcher = Arc<dyn Fetch>;

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    clients: ClientSet,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            clients: ClientSet::new(config)?,
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }
        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;

        debug!("Fetching: {}", url);

        let response = self
            .clients
            .for_host(host)
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetch of {} returned status: {}", url, status);
        }

        let final_url = response.url().to_string();
        let content_type = header_string(&response, CONTENT_TYPE);
        let content_disposition = header_string(&response, reqwest::header::CONTENT_DISPOSITION);
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        debug!("Fetched {} bytes from {}", body.len(), final_url);

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            content_type,
            content_disposition,
            body: body.to_vec(),
        })
    }
}

impl HttpFetcher {
    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout_secs)
        } else {
            FetchError::Request(err)
        }
    }
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
