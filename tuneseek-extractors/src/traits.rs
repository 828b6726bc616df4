//! Common extractor interface

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tuneseek_core::Metadata;

use crate::{AmazonExtractor, BilibiliExtractor, NicoVideoExtractor, YouTubeExtractor};

/// Turns a raw search results page into candidate records.
///
/// Implementations never fail: a page without the expected structure
/// yields an empty list, and broken items are skipped or degraded.
pub trait Extractor: Send + Sync {
    /// Short platform name
    fn name(&self) -> &'static str;

    /// Parse `content`, returning records in document order
    fn extract(&self, content: &str) -> Vec<Metadata>;
}

/// The supported extractor variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    YouTube,
    NicoVideo,
    Bilibili,
    Amazon,
}

impl ExtractorKind {
    pub const ALL: [ExtractorKind; 4] = [
        ExtractorKind::YouTube,
        ExtractorKind::NicoVideo,
        ExtractorKind::Bilibili,
        ExtractorKind::Amazon,
    ];

    pub fn extractor(&self) -> &'static dyn Extractor {
        match self {
            ExtractorKind::YouTube => &YouTubeExtractor,
            ExtractorKind::NicoVideo => &NicoVideoExtractor,
            ExtractorKind::Bilibili => &BilibiliExtractor,
            ExtractorKind::Amazon => &AmazonExtractor,
        }
    }

    pub fn extract(&self, content: &str) -> Vec<Metadata> {
        self.extractor().extract(content)
    }

    pub fn name(&self) -> &'static str {
        self.extractor().name()
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown extractor: {0}")]
pub struct UnknownExtractor(pub String);

impl FromStr for ExtractorKind {
    type Err = UnknownExtractor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ExtractorKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownExtractor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in ExtractorKind::ALL {
            assert_eq!(kind.to_string().parse::<ExtractorKind>().unwrap(), kind);
        }
        assert_eq!("YouTube".parse::<ExtractorKind>().unwrap(), ExtractorKind::YouTube);
        assert!("soundcloud".parse::<ExtractorKind>().is_err());
    }

    #[test]
    fn test_garbage_yields_nothing() {
        for kind in ExtractorKind::ALL {
            assert!(kind.extract("").is_empty(), "{} on empty input", kind);
            assert!(
                kind.extract("<html><body><p>nothing to see</p></body></html>").is_empty(),
                "{} on unrelated html",
                kind
            );
            assert!(kind.extract("{\"not\": \"html\"").is_empty(), "{} on junk", kind);
        }
    }
}
