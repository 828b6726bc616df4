//! YouTube extractor
//!
//! The results page carries its data as a JSON object assigned to
//! `ytInitialData` in an inline script. Video entries sit under
//! `videoRenderer` keys at varying depths.

use serde_json::Value;
use tracing::debug;

use tuneseek_core::normalize::{complete_optional_url, tidy_text};
use tuneseek_core::tree::{find_by_key, str_at};
use tuneseek_core::{Metadata, YOUTUBE_ORIGIN};

use crate::Extractor;

const DATA_MARKER: &str = "ytInitialData";
const RENDERER_KEY: &str = "videoRenderer";

pub struct YouTubeExtractor;

impl Extractor for YouTubeExtractor {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn extract(&self, content: &str) -> Vec<Metadata> {
        let Some(span) = locate_initial_data(content) else {
            debug!("No ytInitialData assignment found");
            return Vec::new();
        };

        let data: Value = match serde_json::from_str(span) {
            Ok(data) => data,
            Err(e) => {
                debug!("ytInitialData is not valid JSON: {}", e);
                return Vec::new();
            }
        };

        let records: Vec<Metadata> = find_by_key(&data, RENDERER_KEY)
            .into_iter()
            .filter_map(renderer_to_metadata)
            .collect();

        debug!("YouTube page yielded {} records", records.len());
        records
    }
}

fn renderer_to_metadata(video: &Value) -> Option<Metadata> {
    let title = str_at(video, "/title/runs/0/text")
        .or_else(|| str_at(video, "/title/simpleText"))
        .and_then(tidy_text);

    let artist = str_at(video, "/longBylineText/runs/0/text")
        .and_then(tidy_text)
        .unwrap_or_default();

    let from_url = complete_optional_url(
        str_at(video, "/navigationEndpoint/commandMetadata/webCommandMetadata/url"),
        YOUTUBE_ORIGIN,
    );

    // Thumbnails are listed smallest first
    let image_url = video
        .pointer("/thumbnail/thumbnails")
        .and_then(Value::as_array)
        .and_then(|thumbs| thumbs.last())
        .and_then(|thumb| str_at(thumb, "/url"))
        .and_then(|url| complete_optional_url(Some(url), YOUTUBE_ORIGIN));

    let record = Metadata::new(title, from_url)
        .with_artist(artist)
        .with_image(image_url);

    record.is_usable().then_some(record)
}

/// Find the object literal assigned to `ytInitialData`.
///
/// Accepts `var ytInitialData = {...};` as well as
/// `window["ytInitialData"] = {...};`. Returns the `{...}` span.
pub(crate) fn locate_initial_data(content: &str) -> Option<&str> {
    content.match_indices(DATA_MARKER).find_map(|(idx, _)| {
        let rest = &content[idx + DATA_MARKER.len()..];
        let rest = rest.trim_start_matches(['"', '\'', ']']).trim_start();
        let rest = rest.strip_prefix('=')?.trim_start();
        if rest.starts_with('{') {
            balanced_object(rest)
        } else {
            None
        }
    })
}

/// Prefix of `s` up to the brace closing its opening `{`, skipping braces
/// inside string literals.
fn balanced_object(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../fixtures/youtube.html");

    fn video(id: &str, title: &str, channel: &str) -> String {
        format!(
            r#"{{"videoId":"{id}","title":{{"runs":[{{"text":"{title}"}}]}},"longBylineText":{{"runs":[{{"text":"{channel}"}}]}},"navigationEndpoint":{{"commandMetadata":{{"webCommandMetadata":{{"url":"/watch?v={id}"}}}}}},"thumbnail":{{"thumbnails":[{{"url":"https://i.ytimg.com/vi/{id}/default.jpg"}},{{"url":"https://i.ytimg.com/vi/{id}/hq720.jpg"}}]}}}}"#
        )
    }

    #[test]
    fn test_fixture_golden() {
        let records = YouTubeExtractor.extract(FIXTURE);
        assert_eq!(
            records,
            vec![
                Metadata {
                    title: Some("YOASOBI「アイドル」 Official Music Video".into()),
                    artist: "Ayase / YOASOBI".into(),
                    from_url: Some("https://www.youtube.com/watch?v=ZRtdQ81jPUQ".into()),
                    image_url: Some("https://i.ytimg.com/vi/ZRtdQ81jPUQ/hq720.jpg".into()),
                },
                Metadata {
                    title: Some("アイドル / YOASOBI (Cover) {live}; take 2".into()),
                    artist: "Cover Channel".into(),
                    from_url: Some("https://www.youtube.com/watch?v=c0v3r00001".into()),
                    image_url: Some("https://i.ytimg.com/vi/c0v3r00001/hqdefault.jpg".into()),
                },
                Metadata {
                    title: Some("Shorts idol clip".into()),
                    artist: "".into(),
                    from_url: Some("https://www.youtube.com/watch?v=sh0rt00001".into()),
                    image_url: None,
                },
            ]
        );
    }

    #[test]
    fn test_nesting_depth_does_not_matter() {
        let page = format!(
            r#"<script>var ytInitialData = {{"contents":[{{"videoRenderer":{}}},{{"a":{{"b":{{"c":{{"items":[{{"videoRenderer":{}}}]}}}}}}}}]}};</script>"#,
            video("shallow0001", "Shallow", "One"),
            video("deep0000001", "Deep", "Two"),
        );

        let records = YouTubeExtractor.extract(&page);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("Shallow"));
        assert_eq!(records[1].title.as_deref(), Some("Deep"));
        assert_eq!(
            records[1].from_url.as_deref(),
            Some("https://www.youtube.com/watch?v=deep0000001")
        );
        assert_eq!(
            records[1].image_url.as_deref(),
            Some("https://i.ytimg.com/vi/deep0000001/hq720.jpg")
        );
    }

    #[test]
    fn test_missing_title_and_link_dropped() {
        let page = r#"var ytInitialData = {"videoRenderer":{"longBylineText":{"runs":[{"text":"Orphan"}]}}};"#;
        assert!(YouTubeExtractor.extract(page).is_empty());
    }

    #[test]
    fn test_partial_entry_kept() {
        let page = r#"var ytInitialData = {"videoRenderer":{"title":{"simpleText":"Only a title"}}};"#;
        let records = YouTubeExtractor.extract(page);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("Only a title"));
        assert_eq!(records[0].artist, "");
        assert_eq!(records[0].from_url, None);
        assert_eq!(records[0].image_url, None);
    }

    #[test]
    fn test_locate_window_assignment() {
        let page = r#"<script>window["ytInitialData"] = {"a":"};"};</script>"#;
        assert_eq!(locate_initial_data(page), Some(r#"{"a":"};"}"#));
    }

    #[test]
    fn test_locate_skips_plain_references() {
        let page = r#"if (window.ytInitialData) {} var ytInitialData = {"k":1};"#;
        assert_eq!(locate_initial_data(page), Some(r#"{"k":1}"#));
    }

    #[test]
    fn test_unterminated_or_invalid_json() {
        assert!(YouTubeExtractor.extract(r#"var ytInitialData = {"a": {"#).is_empty());
        assert!(YouTubeExtractor.extract(r#"var ytInitialData = {not json};"#).is_empty());
    }

    #[test]
    fn test_balanced_object_handles_escapes() {
        assert_eq!(balanced_object(r#"{"a":"\"}"} tail"#), Some(r#"{"a":"\"}"}"#));
        assert_eq!(balanced_object("{{}"), None);
    }
}
