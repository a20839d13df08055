//! Heading classification for single lines of text.
//!
//! A line is run through an ordered list of rules; the first rule that
//! recognises it decides the heading level and display text. Each rule is a
//! plain function so it can be tested on its own, and a [`ClassifierConfig`]
//! switches the plain-text heuristics on or off.

/// Deepest heading level that can be produced.
pub const MAX_LEVEL: u8 = 6;

/// Character that introduces an explicit heading (`# Title`).
pub const MARKER: char = '#';

/// Result of classifying one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    NotHeading,
    Heading { level: u8, text: &'a str },
}

impl<'a> Classification<'a> {
    pub fn is_heading(&self) -> bool {
        matches!(self, Classification::Heading { .. })
    }

    /// Heading level, `0` when the line is not a heading.
    pub fn level(&self) -> u8 {
        match self {
            Classification::Heading { level, .. } => *level,
            Classification::NotHeading => 0,
        }
    }

    pub fn text(&self) -> Option<&'a str> {
        match self {
            Classification::Heading { text, .. } => Some(text),
            Classification::NotHeading => None,
        }
    }
}

/// Which heuristics the classifier applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Lines with fewer characters than this are headings. `None` disables the rule.
    pub short_line_threshold: Option<usize>,
    /// Short lines with fewer characters than this become level 3 instead of 2.
    pub minor_threshold: Option<usize>,
    /// Lines starting with `digit+.` are level 1 headings.
    pub numbered_prefix: bool,
    /// Lines starting with a bare `*` or `#` (no following space) are level 2 headings.
    pub bare_markers: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::markers()
    }
}

impl ClassifierConfig {
    /// Only explicit `#` markers are headings.
    pub const fn markers() -> Self {
        Self {
            short_line_threshold: None,
            minor_threshold: None,
            numbered_prefix: false,
            bare_markers: false,
        }
    }

    /// Heuristics for unstructured text: short lines, numbered lines and bare markers.
    pub const fn plain_text() -> Self {
        Self {
            short_line_threshold: Some(20),
            minor_threshold: None,
            numbered_prefix: true,
            bare_markers: true,
        }
    }

    /// Two-tier short-line promotion used when converting text to Markdown.
    pub const fn markdown_promotion() -> Self {
        Self {
            short_line_threshold: Some(20),
            minor_threshold: Some(10),
            numbered_prefix: false,
            bare_markers: false,
        }
    }

    pub fn with_short_line_threshold(mut self, threshold: Option<usize>) -> Self {
        self.short_line_threshold = threshold;
        self
    }

    pub fn with_minor_threshold(mut self, threshold: Option<usize>) -> Self {
        self.minor_threshold = threshold;
        self
    }
}

/// A classification rule: returns `Some` when it recognises the line.
pub type Rule = for<'a> fn(&'a str, &ClassifierConfig) -> Option<Classification<'a>>;

/// Rules in evaluation order.
pub const RULES: &[Rule] = &[marker_heading, short_line, numbered_line, bare_marker];

/// Classify a single trimmed line.
pub fn classify<'a>(line: &'a str, config: &ClassifierConfig) -> Classification<'a> {
    let line = line.trim();
    if line.is_empty() {
        return Classification::NotHeading;
    }
    RULES
        .iter()
        .find_map(|rule| rule(line, config))
        .unwrap_or(Classification::NotHeading)
}

/// `#`..`######` followed by whitespace and text.
pub fn marker_heading<'a>(line: &'a str, _config: &ClassifierConfig) -> Option<Classification<'a>> {
    let level = line.chars().take_while(|&c| c == MARKER).count();
    if level == 0 || level > MAX_LEVEL as usize {
        return None;
    }
    // MARKER is one byte wide
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some(Classification::Heading {
        level: level as u8,
        text,
    })
}

/// Lines shorter than the configured threshold.
///
/// Lines carrying a bare marker are left to [`bare_marker`] so the marker
/// gets stripped.
pub fn short_line<'a>(line: &'a str, config: &ClassifierConfig) -> Option<Classification<'a>> {
    let threshold = config.short_line_threshold?;
    if bare_marker(line, config).is_some() {
        return None;
    }
    let len = line.chars().count();
    if len >= threshold {
        return None;
    }
    let level = if config.numbered_prefix && has_numbered_prefix(line) {
        1
    } else if config.minor_threshold.is_some_and(|minor| len < minor) {
        3
    } else {
        2
    };
    Some(Classification::Heading { level, text: line })
}

/// Lines of any length that open with `digit+.`.
pub fn numbered_line<'a>(line: &'a str, config: &ClassifierConfig) -> Option<Classification<'a>> {
    if config.numbered_prefix && has_numbered_prefix(line) {
        Some(Classification::Heading {
            level: 1,
            text: line,
        })
    } else {
        None
    }
}

/// `*Title` or `#Title`: one leading character stripped.
pub fn bare_marker<'a>(line: &'a str, config: &ClassifierConfig) -> Option<Classification<'a>> {
    if !config.bare_markers {
        return None;
    }
    let mut chars = line.chars();
    let first = chars.next()?;
    if first != '*' && first != MARKER {
        return None;
    }
    if chars.next().is_none_or(char::is_whitespace) {
        return None;
    }
    let text = line[first.len_utf8()..].trim();
    Some(Classification::Heading { level: 2, text })
}

/// True for lines such as `"1."` or `"12. Title"`.
pub fn has_numbered_prefix(line: &str) -> bool {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && line.as_bytes().get(digits) == Some(&b'.')
}
