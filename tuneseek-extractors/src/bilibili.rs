//! Bilibili extractor
//!
//! Scrapes `bili-video-card` nodes from the search page. Links and covers
//! are usually protocol-relative.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use tuneseek_core::normalize::{complete_optional_url, tidy_text};
use tuneseek_core::{Metadata, BILIBILI_ORIGIN};

use crate::dom::{first_attr, first_text};
use crate::Extractor;

static CARD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.bili-video-card__wrap").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static COVER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("picture.bili-video-card__cover > img").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3.bili-video-card__info--tit").unwrap());
static AUTHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.bili-video-card__info--author").unwrap());

pub struct BilibiliExtractor;

impl Extractor for BilibiliExtractor {
    fn name(&self) -> &'static str {
        "bilibili"
    }

    fn extract(&self, content: &str) -> Vec<Metadata> {
        let document = Html::parse_document(content);
        let mut records = Vec::new();

        for card in document.select(&CARD) {
            let Some(from_url) = complete_optional_url(first_attr(card, &LINK, "href"), BILIBILI_ORIGIN) else {
                continue;
            };

            let title = first_text(card, &TITLE).as_deref().and_then(tidy_text);
            let artist = first_text(card, &AUTHOR)
                .as_deref()
                .and_then(tidy_text)
                .unwrap_or_default();
            let cover = complete_optional_url(first_attr(card, &COVER, "src"), BILIBILI_ORIGIN);

            records.push(
                Metadata::new(title, Some(from_url))
                    .with_artist(artist)
                    .with_image(cover),
            );
        }

        debug!("Bilibili page yielded {} records", records.len());
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../fixtures/bilibili.html");

    #[test]
    fn test_fixture_golden() {
        let records = BilibiliExtractor.extract(FIXTURE);
        assert_eq!(
            records,
            vec![
                Metadata {
                    title: Some("【洛天依】一半一半 &amp; 其他".into()),
                    artist: "ilem".into(),
                    from_url: Some("https://www.bilibili.com/video/BV1xx411c7mD/".into()),
                    image_url: Some("https://i0.hdslb.com/bfs/archive/cover1.jpg@672w_378h_1c".into()),
                },
                Metadata {
                    title: None,
                    artist: "".into(),
                    from_url: Some("https://www.bilibili.com/video/BV1GJ411x7h7/".into()),
                    image_url: None,
                },
                Metadata {
                    title: Some("Rock & Roll 翻唱".into()),
                    artist: "某UP主".into(),
                    from_url: Some("https://www.bilibili.com/video/BV1ab4y1c7de".into()),
                    image_url: Some("https://i1.hdslb.com/bfs/archive/cover3.png".into()),
                },
            ]
        );
    }

    #[test]
    fn test_card_without_link_dropped() {
        let html = r#"<div class="bili-video-card__wrap"><h3 class="bili-video-card__info--tit">No link</h3></div>"#;
        assert!(BilibiliExtractor.extract(html).is_empty());
    }

    #[test]
    fn test_text_decoded_once() {
        let html = r#"<div class="bili-video-card__wrap"><a href="//www.bilibili.com/video/BV1"></a>
            <h3 class="bili-video-card__info--tit">AT&amp;amp;T</h3>
            <span class="bili-video-card__info--author">A &lt;B&gt;</span></div>"#;
        let records = BilibiliExtractor.extract(html);
        assert_eq!(records[0].title.as_deref(), Some("AT&amp;T"));
        assert_eq!(records[0].artist, "A <B>");
    }
}
