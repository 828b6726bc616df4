//! Platform catalog loading
//!
//! Reads the platform table from TOML, either the embedded default or a
//! file supplied at startup, and turns it into a [`PlatformRegistry`].

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use tuneseek_core::{Platform, PlatformRegistry};
use tuneseek_net::Url;

const EMBEDDED_CATALOG: &str = include_str!("../catalog/platforms.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate platform id: {0}")]
    DuplicateId(i64),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    platform: Vec<Platform>,
}

/// Parse a catalog document
pub fn parse_catalog(toml_str: &str) -> Result<PlatformRegistry, CatalogError> {
    let file: CatalogFile = toml::from_str(toml_str)?;

    let mut seen = HashSet::new();
    for platform in &file.platform {
        if !seen.insert(platform.id) {
            return Err(CatalogError::DuplicateId(platform.id));
        }
    }

    debug!("Loaded {} platforms", file.platform.len());
    Ok(PlatformRegistry::from_platforms(file.platform))
}

/// The built-in catalog of supported platforms
pub fn load_embedded() -> Result<PlatformRegistry, CatalogError> {
    parse_catalog(EMBEDDED_CATALOG)
}

/// Load a catalog from a TOML file
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<PlatformRegistry, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog(&content)
}

/// Hosts of every searchable template, for the TLS allowlist
pub fn template_hosts(registry: &PlatformRegistry) -> Vec<String> {
    let mut hosts: Vec<String> = registry
        .searchable()
        .filter_map(|p| p.search_template())
        .filter_map(|template| Url::parse(template).ok())
        .filter_map(|url| url.host_str().map(str::to_string))
        .collect();
    hosts.sort();
    hosts.dedup();
    hosts
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuneseek_core::PlatformType;

    #[test]
    fn test_embedded_catalog() {
        let registry = load_embedded().unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get(1).unwrap().name, "YouTube");
        assert_eq!(registry.get(4).unwrap().kind, PlatformType::OnlineStore);
        assert!(registry.template(3).unwrap().starts_with("https://search.bilibili.com/"));
    }

    #[test]
    fn test_optional_url() {
        let registry = parse_catalog(
            r#"
            [[platform]]
            id = 9
            name = "Spotify"
            type = 2
            "#,
        )
        .unwrap();
        assert!(registry.get(9).is_some());
        assert!(registry.template(9).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = parse_catalog(
            r#"
            [[platform]]
            id = 1
            name = "A"
            [[platform]]
            id = 1
            name = "B"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(1)));
    }

    #[test]
    fn test_bad_type_code() {
        let err = parse_catalog("[[platform]]\nid = 1\nname = \"A\"\ntype = 7\n").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_template_hosts() {
        let hosts = template_hosts(&load_embedded().unwrap());
        assert_eq!(
            hosts,
            vec![
                "search.bilibili.com",
                "www.amazon.co.jp",
                "www.nicovideo.jp",
                "www.youtube.com",
            ]
        );
    }
}
