//! Text and URL normalization shared by every extractor

use std::borrow::Cow;

/// Decode HTML entities (named, decimal and hex)
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

/// Decode entities, collapse whitespace and trim. Empty results become `None`.
///
/// Only for text cut from raw markup. DOM text from `scraper` is already decoded.
pub fn clean_text(text: &str) -> Option<String> {
    let decoded = decode_entities(text);
    let collapsed = normalize_whitespace(&decoded);
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Collapse whitespace and trim without touching entities. Empty results become `None`.
///
/// Use this on parsed DOM text and on JSON strings.
pub fn tidy_text(text: &str) -> Option<String> {
    let collapsed = normalize_whitespace(text);
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Collapse runs of whitespace into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Complete a possibly relative URL against `origin` (e.g. `https://www.youtube.com`).
///
/// - `//host/x` becomes `https://host/x`
/// - `/x` becomes `origin/x`
/// - anything with a scheme is returned unchanged
/// - a bare relative path `x` becomes `origin/x`
///
/// Applying it twice gives the same result as applying it once.
pub fn complete_url(url: &str, origin: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    if let Some(rest) = url.strip_prefix("//") {
        return format!("https://{}", rest);
    }

    if has_scheme(url) {
        return url.to_string();
    }

    let origin = origin.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{}{}", origin, url)
    } else {
        format!("{}/{}", origin, url)
    }
}

/// Like [`complete_url`], mapping missing or blank input to `None`
pub fn complete_optional_url(url: Option<&str>, origin: &str) -> Option<String> {
    url.map(|u| complete_url(u, origin)).filter(|u| !u.is_empty())
}

/// Percent-encode a search query for appending to a template
pub fn percent_encode(query: &str) -> String {
    urlencoding::encode(query).into_owned()
}

/// `scheme:` per RFC 3986: a letter followed by letters, digits, `+`, `-` or `.`
fn has_scheme(url: &str) -> bool {
    let Some(colon) = url.find(':') else {
        return false;
    };
    let scheme = &url[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
