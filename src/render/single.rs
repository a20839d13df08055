//! Single-file HTML with an inline table of contents.

use super::Labels;
use super::css::SINGLE_PAGE_STYLE;
use super::page::{stylesheet_link, xhtml_page};
use super::toc::{HeadingRef, nest_headings, write_list};
use crate::book::{DEFAULT_LANGUAGE, FALLBACK_TITLE, Line};
use crate::classify::{Classification, ClassifierConfig, marker_heading};
use crate::markdown::HeadingIds;
use crate::util::{escape_xml, truncate_label};

/// Settings for [`render_single`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleOptions {
    /// Insert a `.toc` block listing every heading.
    pub toc: bool,
    /// Link this stylesheet instead of embedding the default style.
    pub css_href: Option<String>,
    pub labels: Labels,
    pub language: String,
    /// Longer TOC labels are cut to this many characters plus `...`.
    pub toc_label_max: usize,
}

impl Default for SingleOptions {
    fn default() -> Self {
        Self {
            toc: true,
            css_href: None,
            labels: Labels::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            toc_label_max: 50,
        }
    }
}

impl SingleOptions {
    pub fn with_toc(mut self, toc: bool) -> Self {
        self.toc = toc;
        self
    }

    pub fn with_css_href(mut self, href: impl Into<String>) -> Self {
        self.css_href = Some(href.into());
        self
    }
}

/// Render text as one HTML page.
///
/// The first line names the page but is still rendered like any other line.
/// `#` marker lines become headings with unique ids, every other line a
/// paragraph, and blank lines `<br />`.
pub fn render_single(text: &str, options: &SingleOptions) -> String {
    let title = Line::split(text)
        .next()
        .map(|line| line.trimmed.to_string())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    let markers = ClassifierConfig::markers();
    let mut ids = HeadingIds::new();
    let mut headings = Vec::new();
    let mut content = String::new();

    for line in Line::split(text) {
        if line.is_blank() {
            content.push_str("<br />\n");
            continue;
        }
        match marker_heading(line.trimmed, &markers) {
            Some(Classification::Heading { level, text }) => {
                let id = ids.next_id(text);
                content.push_str(&format!(
                    "<h{level} id=\"{}\">{}</h{level}>\n",
                    escape_xml(&id),
                    escape_xml(text)
                ));
                headings.push(HeadingRef {
                    level,
                    text: text.to_string(),
                    href: format!("#{id}"),
                });
            }
            _ => content.push_str(&format!("<p>{}</p>\n", escape_xml(line.trimmed))),
        }
    }

    let mut body = String::new();
    if options.toc && !headings.is_empty() {
        body.push_str("<div class=\"toc\">\n");
        body.push_str(&format!("<h2>{}</h2>\n", escape_xml(&options.labels.toc_title)));
        let max = options.toc_label_max;
        write_list(&mut body, &nest_headings(&headings), "ul", 0, &|label: &str| {
            truncate_label(label, max).into_owned()
        });
        body.push_str("</div>\n");
    }
    body.push_str(&content);

    let head = match &options.css_href {
        Some(href) => stylesheet_link(href),
        None => format!("  <style type=\"text/css\">\n{SINGLE_PAGE_STYLE}  </style>\n"),
    };
    xhtml_page(&title, &options.language, &head, &body)
}
