//! Ordered field-inference rules
//!
//! Some sources have no artist field, only conventions in free text. Each
//! convention is a pure function tried in order; the first hit wins.

/// Which item field a rule reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Title,
    Description,
}

/// Raw text fields of one scraped item
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemText<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

impl<'a> ItemText<'a> {
    fn get(&self, source: Source) -> &'a str {
        match source {
            Source::Title => self.title,
            Source::Description => self.description,
        }
    }
}

/// A single inference rule
pub type Rule = (Source, fn(&str) -> Option<String>);

/// Run `rules` in order against `item`, returning the first non-empty result
pub fn infer(rules: &[Rule], item: &ItemText<'_>) -> Option<String> {
    rules.iter().find_map(|(source, rule)| {
        let input = item.get(*source);
        if input.is_empty() {
            return None;
        }
        rule(input).filter(|found| !found.is_empty())
    })
}
