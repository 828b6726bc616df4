//! NicoVideo extractor
//!
//! Server-rendered list of `li.item[data-video-item]` nodes. The site has no
//! artist field, so the artist is inferred from title and description
//! conventions.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use tuneseek_core::normalize::{complete_optional_url, tidy_text};
use tuneseek_core::{Metadata, NICOVIDEO_ORIGIN};

use crate::dom::first_attr;
use crate::inference::{infer, ItemText, Rule, Source};
use crate::Extractor;

static ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li.item[data-video-item]").unwrap());
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p.itemTitle > a").unwrap());
static THUMB: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img.thumb").unwrap());
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p.itemDescription").unwrap());

// [name] or 【name】 anywhere in the title
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\[【]([^\]】]+)[\]】]").unwrap());

// "Song - name" at the end of the title
static DASH_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"- ([^-\[\]【】]+)$").unwrap());

// "歌唱：name", "歌:name", "Vocal: name" in the description
static SINGER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:歌唱|歌|唄|[Vv]ocal)\s*[:：]\s*([^\s\[【]+)").unwrap()
});

/// Artist conventions, most specific first
const ARTIST_RULES: &[Rule] = &[
    (Source::Title, bracketed_segment),
    (Source::Title, dash_suffix),
    (Source::Description, singer_label),
];

pub struct NicoVideoExtractor;

impl Extractor for NicoVideoExtractor {
    fn name(&self) -> &'static str {
        "nicovideo"
    }

    fn extract(&self, content: &str) -> Vec<Metadata> {
        let document = Html::parse_document(content);
        let mut records = Vec::new();

        for item in document.select(&ITEM) {
            let title = first_attr(item, &TITLE_LINK, "title").and_then(tidy_text);
            let from_url = complete_optional_url(first_attr(item, &TITLE_LINK, "href"), NICOVIDEO_ORIGIN);
            let image_url = complete_optional_url(first_attr(item, &THUMB, "src"), NICOVIDEO_ORIGIN);

            let text = ItemText {
                title: title.as_deref().unwrap_or_default(),
                description: first_attr(item, &DESCRIPTION, "title").unwrap_or_default(),
            };
            let artist = infer(ARTIST_RULES, &text).unwrap_or_default();

            let record = Metadata::new(title, from_url)
                .with_artist(artist)
                .with_image(image_url);

            if record.is_usable() {
                records.push(record);
            }
        }

        debug!("NicoVideo page yielded {} records", records.len());
        records
    }
}

fn bracketed_segment(title: &str) -> Option<String> {
    capture(&BRACKETED, title)
}

fn dash_suffix(title: &str) -> Option<String> {
    capture(&DASH_SUFFIX, title)
}

fn singer_label(description: &str) -> Option<String> {
    capture(&SINGER_LABEL, description)
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
