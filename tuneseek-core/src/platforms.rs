//! Platform registry
//!
//! Maps catalog platform ids to their search URL templates. Built once at
//! startup and shared read-only afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::percent_encode;

/// Kind of source a platform represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlatformType {
    #[default]
    Other,
    Video,
    Music,
    OnlineStore,
}

#[derive(Debug, Error)]
#[error("unknown platform type code: {0}")]
pub struct UnknownPlatformType(pub u8);

impl TryFrom<u8> for PlatformType {
    type Error = UnknownPlatformType;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Other),
            1 => Ok(Self::Video),
            2 => Ok(Self::Music),
            3 => Ok(Self::OnlineStore),
            other => Err(UnknownPlatformType(other)),
        }
    }
}

impl From<PlatformType> for u8 {
    fn from(kind: PlatformType) -> Self {
        match kind {
            PlatformType::Other => 0,
            PlatformType::Video => 1,
            PlatformType::Music => 2,
            PlatformType::OnlineStore => 3,
        }
    }
}

/// A row of the catalog's platform table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: PlatformType,
    /// Search URL template; the encoded query is appended to it
    #[serde(default)]
    pub url: Option<String>,
}

impl Platform {
    /// The search template, if the platform can be searched at all
    pub fn search_template(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Build the search URL for a query
    pub fn build_url(&self, query: &str) -> Option<String> {
        self.search_template()
            .map(|template| format!("{}{}", template.trim(), percent_encode(query)))
    }
}

/// Immutable id → platform lookup
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    platforms: BTreeMap<i64, Platform>,
}

impl PlatformRegistry {
    /// Build a registry; later entries replace earlier ones with the same id
    pub fn from_platforms(platforms: impl IntoIterator<Item = Platform>) -> Self {
        Self {
            platforms: platforms.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&Platform> {
        self.platforms.get(&id)
    }

    /// Non-empty search template for a platform id
    pub fn template(&self, id: i64) -> Option<&str> {
        self.get(id).and_then(Platform::search_template)
    }

    pub fn build_search_url(&self, id: i64, query: &str) -> Option<String> {
        self.get(id).and_then(|p| p.build_url(query))
    }

    /// Platforms ordered by id
    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.values()
    }

    /// Platforms that have a usable search template
    pub fn searchable(&self) -> impl Iterator<Item = &Platform> {
        self.iter().filter(|p| p.search_template().is_some())
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}
