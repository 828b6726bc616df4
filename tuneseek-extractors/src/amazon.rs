//! Amazon extractor
//!
//! Result rows are `s-result-item` divs carrying a non-empty `data-asin`.
//! Rows without a title or a link are placeholders and get skipped.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use tuneseek_core::normalize::{complete_optional_url, tidy_text};
use tuneseek_core::{Metadata, AMAZON_ORIGIN};

use crate::dom::{first_attr, first_text};
use crate::Extractor;

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.s-result-item[data-asin]").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2 span").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img.s-image").unwrap());
static BYLINE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.a-row > span.a-size-base").unwrap());

pub struct AmazonExtractor;

impl Extractor for AmazonExtractor {
    fn name(&self) -> &'static str {
        "amazon"
    }

    fn extract(&self, content: &str) -> Vec<Metadata> {
        let document = Html::parse_document(content);
        let mut records = Vec::new();

        let rows = document.select(&ROW).filter(|row| {
            row.value()
                .attr("data-asin")
                .is_some_and(|asin| !asin.trim().is_empty())
        });

        for row in rows {
            let Some(title) = first_text(row, &TITLE).as_deref().and_then(tidy_text) else {
                continue;
            };
            let Some(from_url) = complete_optional_url(first_attr(row, &LINK, "href"), AMAZON_ORIGIN) else {
                continue;
            };

            let artist = first_text(row, &BYLINE)
                .as_deref()
                .and_then(tidy_text)
                .unwrap_or_default();
            let image_url = complete_optional_url(first_attr(row, &IMAGE, "src"), AMAZON_ORIGIN);

            records.push(
                Metadata::new(Some(title), Some(from_url))
                    .with_artist(artist)
                    .with_image(image_url),
            );
        }

        debug!("Amazon page yielded {} records", records.len());
        records
    }
}
