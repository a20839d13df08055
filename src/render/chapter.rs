//! Chapter documents.

use log::debug;

use super::page::{stylesheet_link, xhtml_page};
use super::toc::{HeadingRef, nest_headings};
use super::{Document, DocumentRole, RenderOptions, STYLESHEET_HREF};
use crate::book::{Chapter, TocEntry};
use crate::markdown::{HeadingIds, render_inline};
use crate::reflow::{Block, reflow};
use crate::util::escape_xml;

pub(super) struct RenderedChapter {
    pub document: Document,
    pub toc_entry: TocEntry,
}

/// Render one chapter, drawing heading ids from the shared counter.
pub(super) fn render_chapter(
    chapter: &Chapter,
    language: &str,
    ids: &mut HeadingIds,
    options: &RenderOptions,
) -> RenderedChapter {
    let file_name = chapter.file_name();
    let title = chapter.display_title();

    let mut body = String::from("<div class=\"chapter\">\n");
    if let Some(heading) = &chapter.title {
        let id = ids.next_id(heading);
        body.push_str(&format!(
            "  <h1 id=\"{}\">{}</h1>\n",
            escape_xml(&id),
            escape_xml(heading)
        ));
    }

    let mut headings = Vec::new();
    for block in reflow(&chapter.body, &options.reflow) {
        match block {
            Block::Paragraph(text) => {
                let text = if options.inline_markdown {
                    render_inline(&text)
                } else {
                    escape_xml(&text)
                };
                body.push_str(&format!("  <p>{text}</p>\n"));
            }
            Block::Heading { level, text } => {
                let id = ids.next_id(&text);
                body.push_str(&format!(
                    "  <h{level} id=\"{}\">{}</h{level}>\n",
                    escape_xml(&id),
                    escape_xml(&text)
                ));
                headings.push(HeadingRef {
                    level,
                    href: format!("{file_name}#{id}"),
                    text,
                });
            }
            Block::Break => body.push_str("  <br />\n"),
            Block::Rule => body.push_str("  <hr />\n"),
        }
    }
    body.push_str("</div>\n");

    debug!(
        "rendered {} ({} sub-headings)",
        file_name,
        headings.len()
    );

    let mut toc_entry = TocEntry::new(title.clone(), file_name.clone());
    toc_entry.children = nest_headings(&headings);

    let html = xhtml_page(&title, language, &stylesheet_link(STYLESHEET_HREF), &body);
    RenderedChapter {
        document: Document {
            file_name,
            title,
            role: DocumentRole::Chapter,
            html,
        },
        toc_entry,
    }
}
