//! TuneSeek Engine
//!
//! Resolves a (platform, query) pair into candidate track records:
//! - **Catalog**: platform table loading and the TLS host allowlist
//! - **Dispatcher**: validation, URL building, fetching and extractor routing
//! - **Errors**: the search error taxonomy surfaced to callers

pub mod catalog;
pub mod dispatcher;
pub mod error;

pub use catalog::*;
pub use dispatcher::*;
pub use error::*;

use std::sync::Arc;

use tuneseek_core::PlatformRegistry;
use tuneseek_net::{FetchConfig, FetchError, HttpFetcher, TlsPolicy};

/// Build a dispatcher backed by a real HTTP fetcher.
///
/// With `TlsPolicy::AcceptInvalidFor` and an empty host list, the hosts of
/// the catalog's templates are used as the allowlist.
pub fn create_dispatcher(registry: PlatformRegistry, mut config: FetchConfig) -> Result<SearchDispatcher, FetchError> {
    if config.tls == TlsPolicy::AcceptInvalidFor(Vec::new()) {
        config.tls = TlsPolicy::AcceptInvalidFor(template_hosts(&registry));
    }

    let fetcher = HttpFetcher::new(&config)?;
    Ok(SearchDispatcher::new(registry, Arc::new(fetcher)))
}
