//! Candidate track records produced by the extractors

use serde::{Deserialize, Serialize};

/// One candidate track found on a remote search page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Track or video title (some sources omit it)
    pub title: Option<String>,
    /// Best-effort artist, empty when nothing could be recovered
    pub artist: String,
    /// Link back to the source item
    pub from_url: Option<String>,
    /// Artwork or thumbnail
    pub image_url: Option<String>,
}

impl Metadata {
    pub fn new(title: Option<String>, from_url: Option<String>) -> Self {
        Self {
            title,
            from_url,
            ..Self::default()
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    /// A record with neither title nor link is useless to an operator.
    pub fn is_usable(&self) -> bool {
        self.title.is_some() || self.from_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let record = Metadata::new(Some("Song".into()), Some("https://a/b".into()))
            .with_artist("Band")
            .with_image(None);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Song");
        assert_eq!(json["artist"], "Band");
        assert_eq!(json["fromUrl"], "https://a/b");
        assert!(json["imageUrl"].is_null());
    }

    #[test]
    fn test_usable() {
        assert!(Metadata::new(Some("t".into()), None).is_usable());
        assert!(Metadata::new(None, Some("u".into())).is_usable());
        assert!(!Metadata::new(None, None).with_artist("x").is_usable());
    }
}
