//! Image relay
//!
//! Re-fetches hotlinked artwork so clients blocked by cross-origin rules can
//! display it. Stateless passthrough of bytes and content type.

use tracing::debug;

use crate::{Fetch, FetchError};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A relayed remote resource
#[derive(Debug, Clone)]
pub struct RelayedResource {
    pub content_type: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fetch `url` once and hand back its bytes with the original content type
pub async fn relay(fetcher: &dyn Fetch, url: &str) -> Result<RelayedResource, FetchError> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }

    let page = fetcher.fetch(url).await?;
    if !page.is_success() {
        return Err(FetchError::Status(page.status));
    }

    debug!("Relayed {} bytes from {}", page.body.len(), url);

    Ok(RelayedResource {
        content_type: page
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        file_name: page.content_disposition.as_deref().and_then(disposition_file_name),
        bytes: page.body,
    })
}

/// File name from a `Content-Disposition` value, preferring `filename*`
fn disposition_file_name(value: &str) -> Option<String> {
    let params: Vec<(String, &str)> = value
        .split(';')
        .skip(1)
        .filter_map(|part| {
            let (key, val) = part.split_once('=')?;
            Some((key.trim().to_ascii_lowercase(), val.trim()))
        })
        .collect();

    let extended = params
        .iter()
        .find(|(k, _)| k == "filename*")
        .and_then(|(_, v)| v.trim_matches('"').split_once("''"))
        .map(|(_, name)| {
            urlencoding::decode(name)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| name.to_string())
        });

    extended
        .or_else(|| {
            params
                .iter()
                .find(|(k, _)| k == "filename")
                .map(|(_, v)| v.trim_matches('"').to_string())
        })
        .filter(|name| !name.is_empty())
}
