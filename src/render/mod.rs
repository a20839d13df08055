//! HTML document rendering.
//!
//! [`render`] turns a segmented book into a linked [`DocumentSet`]: a title
//! page, a table of contents, one document per chapter, an optional
//! colophon, and the shared stylesheet. Every document is XHTML, so a set
//! can be packaged as EPUB as-is.
//!
//! Heading ids come from one [`HeadingIds`] counter per call, which keeps
//! them unique across the whole set.

mod chapter;
mod css;
mod front;
mod page;
mod single;
mod toc;

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate};
use log::debug;

use crate::book::{Chapter, Colophon, Metadata, TocEntry};
use crate::error::Result;
use crate::markdown::HeadingIds;
use crate::reflow::ReflowConfig;

pub use css::{DEFAULT_STYLESHEET, SINGLE_PAGE_STYLE};
pub use front::{COLOPHON_TITLE, cover_page};
pub use single::{SingleOptions, render_single};
pub(crate) use toc::{HeadingRef, nest_headings, write_list};

pub const STYLESHEET_HREF: &str = "style.css";
pub const TITLE_PAGE: &str = "title.html";
pub const TOC_PAGE: &str = "toc.html";
pub const COLOPHON_PAGE: &str = "colophon.html";
pub const COVER_PAGE: &str = "cover.xhtml";
pub const COVER_IMAGE: &str = "cover.jpg";

/// Fixed strings shown on generated pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub toc_title: String,
    pub author: String,
    pub published: String,
    pub generated: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            toc_title: "목차".to_string(),
            author: "저자".to_string(),
            published: "발행일".to_string(),
            generated: "생성일".to_string(),
        }
    }
}

/// Date printed on the title page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationDate {
    /// Today's local date.
    #[default]
    Today,
    /// A fixed date, for reproducible output.
    On(NaiveDate),
    /// No generation line at all.
    Omitted,
}

impl GenerationDate {
    pub fn resolve(self) -> Option<NaiveDate> {
        match self {
            GenerationDate::Today => Some(Local::now().date_naive()),
            GenerationDate::On(date) => Some(date),
            GenerationDate::Omitted => None,
        }
    }
}

/// Rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Produce `toc.html`.
    pub toc: bool,
    /// Custom stylesheet content; `None` uses [`DEFAULT_STYLESHEET`].
    pub stylesheet: Option<String>,
    pub labels: Labels,
    pub generated_on: GenerationDate,
    pub reflow: ReflowConfig,
    /// Apply `**strong**` / `*emphasis*` inside paragraphs.
    pub inline_markdown: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            toc: true,
            stylesheet: None,
            labels: Labels::default(),
            generated_on: GenerationDate::default(),
            reflow: ReflowConfig::default(),
            inline_markdown: false,
        }
    }
}

impl RenderOptions {
    pub fn with_toc(mut self, toc: bool) -> Self {
        self.toc = toc;
        self
    }

    pub fn with_stylesheet(mut self, css: impl Into<String>) -> Self {
        self.stylesheet = Some(css.into());
        self
    }

    pub fn with_generated_on(mut self, date: GenerationDate) -> Self {
        self.generated_on = date;
        self
    }

    pub fn with_reflow(mut self, reflow: ReflowConfig) -> Self {
        self.reflow = reflow;
        self
    }

    pub fn with_inline_markdown(mut self, enabled: bool) -> Self {
        self.inline_markdown = enabled;
        self
    }
}

/// What a document is for; decides its place in the reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentRole {
    Cover,
    TitlePage,
    Toc,
    Chapter,
    Colophon,
}

/// One rendered XHTML file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub title: String,
    pub role: DocumentRole,
    pub html: String,
}

/// Rendered documents in reading order, plus navigation and style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSet {
    pub documents: Vec<Document>,
    /// One top-level entry per chapter, sub-headings nested below.
    pub toc: Vec<TocEntry>,
    /// Content of `style.css`.
    pub stylesheet: String,
    pub language: String,
}

impl DocumentSet {
    pub fn get(&self, file_name: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.file_name == file_name)
    }

    pub fn by_role(&self, role: DocumentRole) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(move |d| d.role == role)
    }

    pub fn chapter_count(&self) -> usize {
        self.by_role(DocumentRole::Chapter).count()
    }

    /// Write every document and `style.css` into `dir`, which must exist.
    pub fn write_to_dir(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join(STYLESHEET_HREF), &self.stylesheet)?;
        for document in &self.documents {
            fs::write(dir.join(&document.file_name), &document.html)?;
        }
        debug!(
            "wrote {} documents to {}",
            self.documents.len(),
            dir.display()
        );
        Ok(())
    }
}

/// Render a book into a [`DocumentSet`].
///
/// Documents are ordered title page, table of contents (when enabled),
/// chapters, then the colophon when one with content is given.
pub fn render(
    book_title: &str,
    metadata: &Metadata,
    chapters: &[Chapter],
    colophon: Option<&Colophon>,
    options: &RenderOptions,
) -> DocumentSet {
    let language = metadata.language().to_string();
    let mut ids = HeadingIds::new();

    let mut documents = vec![front::title_page(
        book_title,
        metadata,
        options.generated_on.resolve(),
        options,
    )];

    let rendered: Vec<_> = chapters
        .iter()
        .map(|c| chapter::render_chapter(c, &language, &mut ids, options))
        .collect();
    let toc: Vec<TocEntry> = rendered.iter().map(|r| r.toc_entry.clone()).collect();

    if options.toc {
        documents.push(front::toc_page(&toc, &language, &options.labels));
    }
    documents.extend(rendered.into_iter().map(|r| r.document));

    if let Some(colophon) = colophon.filter(|c| !c.is_empty()) {
        documents.push(front::colophon_page(colophon, &language));
    }

    DocumentSet {
        documents,
        toc,
        stylesheet: options
            .stylesheet
            .clone()
            .unwrap_or_else(|| DEFAULT_STYLESHEET.to_string()),
        language,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{BodyLine, Contact, Publisher};
    use crate::segment::{SegmentConfig, segment_text};

    fn fixed() -> RenderOptions {
        RenderOptions::default().with_generated_on(GenerationDate::On(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        ))
    }

    fn book(input: &str) -> (String, Vec<Chapter>) {
        let seg = segment_text(input, &SegmentConfig::markup());
        (seg.book_title, seg.chapters)
    }

    #[test]
    fn test_document_order_and_names() {
        let (title, chapters) = book("My Book\n# Intro\nHello world\n# Chapter Two\nSecond line\n");
        let set = render(&title, &Metadata::new(&title), &chapters, None, &fixed());
        let names: Vec<_> = set.documents.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["title.html", "toc.html", "chapter_1.html", "chapter_2.html"]
        );
        assert_eq!(set.chapter_count(), 2);
    }

    #[test]
    fn test_title_page_content() {
        let meta = Metadata::new("책")
            .with_creator("홍길동")
            .with_publisher("출판사")
            .with_date("2023-05-01");
        let set = render("책", &meta, &[], None, &fixed());
        let html = &set.get(TITLE_PAGE).unwrap().html;
        assert!(html.contains("<div class=\"title-page\">"));
        assert!(html.contains("<p class=\"author\">저자: 홍길동</p>"));
        assert!(html.contains("<p class=\"publisher\">출판사</p>"));
        assert!(html.contains("발행일: 2023-05-01"));
        assert!(html.contains("생성일: 2024-03-01"));
    }

    #[test]
    fn test_optional_metadata_not_emitted_empty() {
        let set = render("t", &Metadata::new("t"), &[], None, &fixed());
        let html = &set.get(TITLE_PAGE).unwrap().html;
        assert!(!html.contains("class=\"publisher\""));
        assert!(!html.contains("class=\"published\""));
    }

    #[test]
    fn test_no_toc_option() {
        let (title, chapters) = book("B\n# One\nx\n");
        let set = render(&title, &Metadata::new(&title), &chapters, None, &fixed().with_toc(false));
        assert!(set.get(TOC_PAGE).is_none());
        assert!(set.get(TITLE_PAGE).is_some());
        assert!(set.get("chapter_1.html").is_some());
        // navigation is still available to packagers
        assert_eq!(set.toc.len(), 1);
    }

    #[test]
    fn test_nested_toc_links_to_anchors() {
        let (title, chapters) = book("B\n# One\nintro\n### Part\nbody\n#### Sub\nmore\n");
        let set = render(&title, &Metadata::new(&title), &chapters, None, &fixed());
        assert_eq!(set.toc[0].href, "chapter_1.html");
        assert_eq!(set.toc[0].children[0].href, "chapter_1.html#heading_2_Part");
        assert_eq!(set.toc[0].children[0].children[0].title, "Sub");

        let toc = &set.get(TOC_PAGE).unwrap().html;
        assert!(toc.contains("<a href=\"chapter_1.html#heading_2_Part\">Part</a>"));
        let chapter = &set.get("chapter_1.html").unwrap().html;
        assert!(chapter.contains("<h1 id=\"heading_1_One\">One</h1>"));
        assert!(chapter.contains("<h3 id=\"heading_2_Part\">Part</h3>"));
    }

    #[test]
    fn test_heading_ids_unique_across_documents() {
        let (title, chapters) = book("B\n# Same\n### Same\nx\n# Same\n### Same\ny\n");
        let set = render(&title, &Metadata::new(&title), &chapters, None, &fixed());
        let mut ids = Vec::new();
        for doc in &set.documents {
            for part in doc.html.split(" id=\"").skip(1) {
                ids.push(part.split('"').next().unwrap().to_string());
            }
        }
        assert_eq!(ids.len(), 4);
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_untitled_chapter_has_no_h1() {
        let chapters = vec![Chapter {
            title: None,
            body: vec![BodyLine::Text("just prose".into())],
            order_index: 1,
        }];
        let set = render("B", &Metadata::new("B"), &chapters, None, &fixed());
        let doc = set.get("chapter_1.html").unwrap();
        assert_eq!(doc.title, "Chapter 1");
        assert!(!doc.html.contains("<h1"));
        assert!(doc.html.contains("<p>just prose</p>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let (title, chapters) = book("A <b> & C\n# x < y\n5 > 3 & \"q\"\n");
        let set = render(&title, &Metadata::new(&title), &chapters, None, &fixed());
        let chapter = &set.get("chapter_1.html").unwrap().html;
        assert!(chapter.contains(">x &lt; y</h1>"));
        assert!(chapter.contains("<p>5 &gt; 3 &amp; &quot;q&quot;</p>"));
        assert!(set.get(TITLE_PAGE).unwrap().html.contains("A &lt;b&gt; &amp; C"));
    }

    #[test]
    fn test_inline_markdown_only_when_enabled() {
        let (title, chapters) = book("B\n# One\nsome **bold** text\n");
        let plain = render(&title, &Metadata::new(&title), &chapters, None, &fixed());
        assert!(plain.get("chapter_1.html").unwrap().html.contains("some **bold** text"));

        let rich = render(
            &title,
            &Metadata::new(&title),
            &chapters,
            None,
            &fixed().with_inline_markdown(true),
        );
        assert!(rich
            .get("chapter_1.html")
            .unwrap()
            .html
            .contains("some <strong>bold</strong> text"));
    }

    #[test]
    fn test_colophon_omits_missing_keys() {
        let colophon = Colophon {
            isbn: Some("978-89-0000-000-0".into()),
            publisher: Some(Publisher {
                name: Some("출판사".into()),
                editor: None,
            }),
            contact: Some(Contact::default()),
            ..Default::default()
        };
        let (title, chapters) = book("B\n# One\nx\n");
        let set = render(&title, &Metadata::new(&title), &chapters, Some(&colophon), &fixed());
        let doc = set.documents.last().unwrap();
        assert_eq!(doc.role, DocumentRole::Colophon);
        assert_eq!(doc.title, COLOPHON_TITLE);
        assert!(doc.html.contains("ISBN: 978-89-0000-000-0"));
        assert!(doc.html.contains("펴낸곳: 출판사"));
        assert!(!doc.html.contains("펴낸이"));
        assert!(!doc.html.contains("이메일"));
        assert!(!doc.html.contains("옮긴이"));
    }

    #[test]
    fn test_empty_colophon_is_skipped() {
        let (title, chapters) = book("B\n# One\nx\n");
        let set = render(
            &title,
            &Metadata::new(&title),
            &chapters,
            Some(&Colophon::default()),
            &fixed(),
        );
        assert!(set.get(COLOPHON_PAGE).is_none());
    }

    #[test]
    fn test_render_is_deterministic_with_fixed_clock() {
        let (title, chapters) = book("B\n# One\nx\n### Sub\ny\n# Two\nz\n");
        let meta = Metadata::new(&title);
        assert_eq!(
            render(&title, &meta, &chapters, None, &fixed()),
            render(&title, &meta, &chapters, None, &fixed())
        );
    }

    #[test]
    fn test_custom_stylesheet() {
        let set = render("t", &Metadata::new("t"), &[], None, &fixed().with_stylesheet("p {}"));
        assert_eq!(set.stylesheet, "p {}");
        assert!(set.get(TITLE_PAGE).unwrap().html.contains("href=\"style.css\""));
    }
}
