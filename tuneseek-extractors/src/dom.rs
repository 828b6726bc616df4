//! Small helpers over `scraper` element lookups

use scraper::{ElementRef, Selector};

/// Attribute of the first descendant matching `selector`, if non-blank
pub(crate) fn first_attr<'a>(scope: ElementRef<'a>, selector: &Selector, attr: &str) -> Option<&'a str> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Concatenated text of the first descendant matching `selector`
pub(crate) fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}
