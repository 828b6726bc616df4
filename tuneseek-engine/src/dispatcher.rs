//! Search dispatcher
//!
//! validate → look up template → fetch → route to extractor. The dispatcher
//! owns only immutable tables, so one instance can serve any number of
//! concurrent searches.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use tuneseek_core::{Metadata, PlatformRegistry};
use tuneseek_extractors::ExtractorKind;
use tuneseek_net::{Fetch, SharedFetcher};

use crate::SearchError;

/// Result of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Records from a dedicated extractor, in page order
    Records(Vec<Metadata>),
    /// Raw page bytes for platforms without an extractor
    Passthrough {
        content_type: Option<String>,
        body: Vec<u8>,
    },
}

impl SearchOutcome {
    pub fn records(&self) -> Option<&[Metadata]> {
        match self {
            SearchOutcome::Records(records) => Some(records),
            SearchOutcome::Passthrough { .. } => None,
        }
    }
}

/// The catalog ids served by dedicated extractors
pub fn default_extractor_table() -> HashMap<i64, ExtractorKind> {
    HashMap::from([
        (1, ExtractorKind::YouTube),
        (2, ExtractorKind::NicoVideo),
        (3, ExtractorKind::Bilibili),
        (4, ExtractorKind::Amazon),
    ])
}

/// Entry point of the resolution engine
#[derive(Clone)]
pub struct SearchDispatcher {
    registry: Arc<PlatformRegistry>,
    fetcher: SharedFetcher,
    extractors: HashMap<i64, ExtractorKind>,
}

impl SearchDispatcher {
    pub fn new(registry: PlatformRegistry, fetcher: SharedFetcher) -> Self {
        Self {
            registry: Arc::new(registry),
            fetcher,
            extractors: default_extractor_table(),
        }
    }

    /// Route another catalog id to an existing extractor
    pub fn with_extractor(mut self, platform_id: i64, kind: ExtractorKind) -> Self {
        self.extractors.insert(platform_id, kind);
        self
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    pub fn fetcher(&self) -> &SharedFetcher {
        &self.fetcher
    }

    pub fn extractor_for(&self, platform_id: i64) -> Option<ExtractorKind> {
        self.extractors.get(&platform_id).copied()
    }

    /// Search one platform
    pub async fn search(&self, platform_id: i64, query: &str) -> Result<SearchOutcome, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::Validation);
        }

        let url = self
            .registry
            .build_search_url(platform_id, query)
            .ok_or(SearchError::NotFound(platform_id))?;

        info!("Searching platform {} for: {}", platform_id, query);
        debug!("Search URL: {}", url);

        let page = self.fetcher.fetch(&url).await?;
        if !page.is_success() {
            warn!("Platform {} returned status: {}", platform_id, page.status);
            return Err(SearchError::Upstream { status: page.status });
        }

        match self.extractor_for(platform_id) {
            Some(kind) => {
                let records = kind.extract(&page.text());
                debug!("{} extractor returned {} records", kind, records.len());
                Ok(SearchOutcome::Records(records))
            }
            None => {
                debug!("No extractor for platform {}, passing content through", platform_id);
                Ok(SearchOutcome::Passthrough {
                    content_type: page.content_type,
                    body: page.body,
                })
            }
        }
    }

    /// Search several platforms concurrently. Results keep the order of `platform_ids`.
    pub async fn search_many(
        &self,
        platform_ids: &[i64],
        query: &str,
        max_concurrent: usize,
    ) -> Vec<(i64, Result<SearchOutcome, SearchError>)> {
        use futures::stream::{self, StreamExt};

        stream::iter(platform_ids.iter().copied())
            .map(|id| async move { (id, self.search(id, query).await) })
            .buffered(max_concurrent.max(1))
            .collect()
            .await
    }
}
