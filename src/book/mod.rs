//! Format-agnostic book structures shared by every pipeline stage.

use serde::Deserialize;

mod colophon;

pub use colophon::{Address, Colophon, Contact, Publisher, Registration};

/// Book title used when the input has no lines at all.
pub const FALLBACK_TITLE: &str = "변환된 책";
/// Creator recorded when none is supplied.
pub const DEFAULT_CREATOR: &str = "변환 스크립트";
/// Default content language.
pub const DEFAULT_LANGUAGE: &str = "ko";

/// Book metadata (Dublin Core subset).
///
/// Deserializes from a resource bundle's `metadata.json`. Keys that are not
/// listed here are ignored; missing required keys fall back to defaults and
/// missing optional keys stay `None` so they are omitted from output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub title: String,
    pub creator: String,
    pub language: String,
    pub publisher: Option<String>,
    pub identifier: Option<String>,
    pub date: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            creator: DEFAULT_CREATOR.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            publisher: None,
            identifier: None,
            date: None,
        }
    }
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Language to emit, never empty.
    pub fn language(&self) -> &str {
        if self.language.trim().is_empty() {
            DEFAULT_LANGUAGE
        } else {
            &self.language
        }
    }
}

/// A single input line with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub index: usize,
    pub raw: &'a str,
    pub trimmed: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(index: usize, raw: &'a str) -> Self {
        Self {
            index,
            raw,
            trimmed: raw.trim(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed.is_empty()
    }

    /// Split text into lines, tolerating `\r\n` endings.
    pub fn split(text: &'a str) -> impl Iterator<Item = Line<'a>> {
        text.lines().enumerate().map(|(i, raw)| Line::new(i, raw))
    }
}

/// An entry of a chapter body as produced by segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyLine {
    /// A trimmed, non-blank line.
    Text(String),
    /// An explicit blank-line marker.
    Blank,
}

impl BodyLine {
    pub fn text(&self) -> Option<&str> {
        match self {
            BodyLine::Text(s) => Some(s),
            BodyLine::Blank => None,
        }
    }
}

/// A chapter produced by segmentation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// `None` only for a leading, untitled preamble chapter.
    pub title: Option<String>,
    pub body: Vec<BodyLine>,
    /// 1-based position in reading order.
    pub order_index: usize,
}

impl Chapter {
    /// Title to display; untitled chapters are named after their position.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("Chapter {}", self.order_index),
        }
    }

    /// Body text lines, blank markers skipped.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.body.iter().filter_map(BodyLine::text)
    }

    pub fn file_name(&self) -> String {
        format!("chapter_{}.html", self.order_index)
    }
}

/// A table of contents entry (hierarchical).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TocEntry {
    pub title: String,
    /// Document file name, optionally followed by `#<heading id>`.
    pub href: String,
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: TocEntry) -> Self {
        self.children.push(child);
        self
    }

    /// Deepest nesting level of this entry (1 for a leaf).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TocEntry::depth).max().unwrap_or(0)
    }
}

/// An item in the reading order (spine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineItem {
    pub id: String,
    pub href: String,
}

impl SpineItem {
    pub fn new(id: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
        }
    }
}

/// A non-document resource (stylesheet, image).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub href: String,
    pub data: Vec<u8>,
    pub media_type: String,
}

impl Resource {
    pub fn new(href: impl Into<String>, data: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            data,
            media_type: media_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_defaults() {
        let meta = Metadata::default();
        assert_eq!(meta.language, "ko");
        assert_eq!(meta.creator, DEFAULT_CREATOR);
        assert!(meta.publisher.is_none());
    }

    #[test]
    fn test_metadata_json_ignores_unknown_keys() {
        let meta: Metadata =
            serde_json::from_str(r#"{"title": "책", "colour": "blue", "date": "2024"}"#).unwrap();
        assert_eq!(meta.title, "책");
        assert_eq!(meta.language, "ko");
        assert_eq!(meta.date.as_deref(), Some("2024"));
        assert!(meta.identifier.is_none());
    }

    #[test]
    fn test_empty_language_falls_back() {
        let meta = Metadata::new("t").with_language("  ");
        assert_eq!(meta.language(), "ko");
    }

    #[test]
    fn test_line_split_handles_crlf() {
        let lines: Vec<_> = Line::split("a\r\n  b \r\n\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].trimmed, "b");
        assert!(lines[2].is_blank());
    }

    #[test]
    fn test_toc_depth() {
        let toc = TocEntry::new("1", "chapter_1.html")
            .with_child(TocEntry::new("1.1", "chapter_1.html#a").with_child(TocEntry::new(
                "1.1.1",
                "chapter_1.html#b",
            )));
        assert_eq!(toc.depth(), 3);
    }
}
