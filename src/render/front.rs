//! Front and back matter: title page, contents, colophon, cover.

use chrono::NaiveDate;

use super::page::{stylesheet_link, xhtml_page};
use super::toc::write_list;
use super::{
    COLOPHON_PAGE, COVER_PAGE, Document, DocumentRole, Labels, RenderOptions, STYLESHEET_HREF,
    TITLE_PAGE, TOC_PAGE,
};
use crate::book::{Colophon, Metadata, TocEntry};
use crate::util::escape_xml;

/// Title used for a colophon without its own `title` key.
pub const COLOPHON_TITLE: &str = "판권";

pub(super) fn title_page(
    book_title: &str,
    metadata: &Metadata,
    generated_on: Option<NaiveDate>,
    options: &RenderOptions,
) -> Document {
    let labels = &options.labels;
    let mut body = String::from("<div class=\"title-page\">\n");
    body.push_str(&format!(
        "  <h1 class=\"title\">{}</h1>\n",
        escape_xml(book_title)
    ));
    body.push_str(&format!(
        "  <p class=\"author\">{}: {}</p>\n",
        escape_xml(&labels.author),
        escape_xml(&metadata.creator)
    ));
    if let Some(publisher) = &metadata.publisher {
        body.push_str(&format!(
            "  <p class=\"publisher\">{}</p>\n",
            escape_xml(publisher)
        ));
    }
    if let Some(date) = &metadata.date {
        body.push_str(&format!(
            "  <p class=\"published\">{}: {}</p>\n",
            escape_xml(&labels.published),
            escape_xml(date)
        ));
    }
    if let Some(date) = generated_on {
        body.push_str(&format!(
            "  <p class=\"date\">{}: {}</p>\n",
            escape_xml(&labels.generated),
            date.format("%Y-%m-%d")
        ));
    }
    body.push_str("</div>\n");

    Document {
        file_name: TITLE_PAGE.to_string(),
        title: book_title.to_string(),
        role: DocumentRole::TitlePage,
        html: xhtml_page(
            book_title,
            metadata.language(),
            &stylesheet_link(STYLESHEET_HREF),
            &body,
        ),
    }
}

pub(super) fn toc_page(toc: &[TocEntry], language: &str, labels: &Labels) -> Document {
    let mut body = String::from("<div class=\"toc\">\n");
    body.push_str(&format!("  <h1>{}</h1>\n", escape_xml(&labels.toc_title)));
    write_list(&mut body, toc, "ol", 1, &|label: &str| label.to_string());
    body.push_str("</div>\n");

    Document {
        file_name: TOC_PAGE.to_string(),
        title: labels.toc_title.clone(),
        role: DocumentRole::Toc,
        html: xhtml_page(
            &labels.toc_title,
            language,
            &stylesheet_link(STYLESHEET_HREF),
            &body,
        ),
    }
}

pub(super) fn colophon_page(colophon: &Colophon, language: &str) -> Document {
    let title = colophon.title.as_deref().unwrap_or(COLOPHON_TITLE);

    let publisher = colophon.publisher.as_ref();
    let registration = colophon.publication_registration.as_ref().and_then(|r| {
        let parts: Vec<&str> = [r.date.as_deref(), r.number.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    });
    let contact = colophon.contact.as_ref();

    let rows: [(&str, &str, Option<&str>); 11] = [
        ("first-published", "초판 발행", colophon.first_published.as_deref()),
        ("author", "지은이", colophon.author.as_deref()),
        ("translator", "옮긴이", colophon.translator.as_deref()),
        ("editor", "펴낸이", publisher.and_then(|p| p.editor.as_deref())),
        ("publisher", "펴낸곳", publisher.and_then(|p| p.name.as_deref())),
        ("registration", "출판등록", registration.as_deref()),
        (
            "address",
            "주소",
            colophon.address.as_ref().and_then(|a| a.street.as_deref()),
        ),
        ("email", "이메일", contact.and_then(|c| c.email.as_deref())),
        ("fax", "팩스", contact.and_then(|c| c.fax.as_deref())),
        ("isbn", "ISBN", colophon.isbn.as_deref()),
        ("price", "값", colophon.price.as_deref()),
    ];

    let mut body = String::from("<div class=\"colophon\">\n");
    if let Some(heading) = &colophon.title {
        body.push_str(&format!(
            "  <h2 class=\"colophon-title\">{}</h2>\n",
            escape_xml(heading)
        ));
    }
    for (class, label, value) in rows {
        if let Some(value) = value {
            body.push_str(&format!(
                "  <p class=\"{class}\">{label}: {}</p>\n",
                escape_xml(value)
            ));
        }
    }
    if let Some(notice) = &colophon.copyright_notice {
        body.push_str(&format!(
            "  <p class=\"copyright\">{}</p>\n",
            escape_xml(notice)
        ));
    }
    body.push_str("</div>\n");

    Document {
        file_name: COLOPHON_PAGE.to_string(),
        title: title.to_string(),
        role: DocumentRole::Colophon,
        html: xhtml_page(title, language, &stylesheet_link(STYLESHEET_HREF), &body),
    }
}

/// Page showing nothing but the cover image.
pub fn cover_page(image_href: &str, language: &str) -> Document {
    let body = format!(
        "<div class=\"cover\">\n  <img src=\"{}\" alt=\"Cover\" />\n</div>\n",
        escape_xml(image_href)
    );
    Document {
        file_name: COVER_PAGE.to_string(),
        title: "Cover".to_string(),
        role: DocumentRole::Cover,
        html: xhtml_page("Cover", language, &stylesheet_link(STYLESHEET_HREF), &body),
    }
}
