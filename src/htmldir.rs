//! Re-import of a rendered HTML directory for packaging.
//!
//! Reads `title.html`, `toc.html`, `chapter_<n>.html` and `colophon.html`
//! back into a [`DocumentSet`]. Chapter headings without an `id` get one so
//! the navigation can link to them, and the table of contents is rebuilt
//! from each chapter's `h1`-`h3` headings.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::book::{DEFAULT_CREATOR, FALLBACK_TITLE, Metadata, TocEntry};
use crate::error::{Error, Result};
use crate::render::{
    COLOPHON_PAGE, COVER_IMAGE, DEFAULT_STYLESHEET, Document, DocumentRole, DocumentSet, HeadingRef,
    Labels, STYLESHEET_HREF, TITLE_PAGE, TOC_PAGE, nest_headings,
};
use crate::util::decode_text;

/// Deepest heading level listed in the rebuilt navigation.
const NAV_DEPTH: u8 = 3;

/// A rendered directory loaded back into memory.
#[derive(Debug, Clone)]
pub struct HtmlDirectory {
    pub set: DocumentSet,
    pub metadata: Metadata,
    pub cover: Option<Vec<u8>>,
}

/// Load the HTML set in `dir`.
///
/// `metadata` replaces what would otherwise be read from `title.html`.
pub fn load(dir: &Path, metadata: Option<Metadata>) -> Result<HtmlDirectory> {
    if !dir.is_dir() {
        return Err(Error::InputNotFound(dir.to_path_buf()));
    }

    let title_path = dir.join(TITLE_PAGE);
    let Some(title_page) = read_page(&title_path)? else {
        return Err(Error::malformed(title_path, "required file is missing"));
    };
    let metadata = metadata.unwrap_or_else(|| metadata_from_title_page(&title_page));
    let language = metadata.language().to_string();

    let mut documents = vec![Document {
        file_name: TITLE_PAGE.to_string(),
        title: title_page.title.clone().unwrap_or_else(|| metadata.title.clone()),
        role: DocumentRole::TitlePage,
        html: title_page.html,
    }];

    if let Some(page) = read_page(&dir.join(TOC_PAGE))? {
        documents.push(Document {
            file_name: TOC_PAGE.to_string(),
            title: page.title.unwrap_or_else(|| Labels::default().toc_title),
            role: DocumentRole::Toc,
            html: page.html,
        });
    }

    let mut toc = Vec::new();
    for (n, file_name) in chapter_files(dir)? {
        let Some(page) = read_page(&dir.join(&file_name))? else {
            continue;
        };
        let title = page.title.clone().unwrap_or_else(|| format!("Chapter {n}"));
        toc.push(chapter_toc_entry(&file_name, &title, &page.headings));
        debug!("imported {} ({} headings)", file_name, page.headings.len());
        documents.push(Document {
            file_name,
            title,
            role: DocumentRole::Chapter,
            html: page.html,
        });
    }

    if let Some(page) = read_page(&dir.join(COLOPHON_PAGE))? {
        documents.push(Document {
            file_name: COLOPHON_PAGE.to_string(),
            title: page.title.unwrap_or_else(|| crate::render::COLOPHON_TITLE.to_string()),
            role: DocumentRole::Colophon,
            html: page.html,
        });
    }

    let stylesheet = match fs::read(dir.join(STYLESHEET_HREF)) {
        Ok(bytes) => decode_text(&bytes, None).into_owned(),
        Err(_) => {
            warn!("{} not found in {}, using the default", STYLESHEET_HREF, dir.display());
            DEFAULT_STYLESHEET.to_string()
        }
    };
    let cover = fs::read(dir.join(COVER_IMAGE)).ok();

    Ok(HtmlDirectory {
        set: DocumentSet {
            documents,
            toc,
            stylesheet,
            language,
        },
        metadata,
        cover,
    })
}

/// `chapter_<n>.html` files in `dir`, sorted by `n`.
fn chapter_files(dir: &Path) -> Result<Vec<(usize, String)>> {
    let mut files: Vec<(usize, String)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| {
            let n = name.strip_prefix("chapter_")?.strip_suffix(".html")?.parse().ok()?;
            Some((n, name))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn chapter_toc_entry(file_name: &str, title: &str, headings: &[ScannedHeading]) -> TocEntry {
    let refs: Vec<HeadingRef> = headings
        .iter()
        .filter(|h| h.level <= NAV_DEPTH)
        .map(|h| HeadingRef {
            level: h.level,
            text: h.text.clone(),
            href: format!("{file_name}#{}", h.id),
        })
        .collect();

    match nest_headings(&refs).as_slice() {
        [] => TocEntry::new(title, file_name),
        // a lone top heading stands for the chapter itself
        [single] => {
            let mut entry = TocEntry::new(single.title.clone(), file_name);
            entry.children = single.children.clone();
            entry
        }
        many => {
            let mut entry = TocEntry::new(title, file_name);
            entry.children = many.to_vec();
            entry
        }
    }
}

fn metadata_from_title_page(page: &ScannedPage) -> Metadata {
    let labels = Labels::default();
    let mut metadata = Metadata::new(
        page.class_text("title")
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
    )
    .with_creator(
        page.class_text("author")
            .map(|t| strip_label(t, &labels.author))
            .unwrap_or(DEFAULT_CREATOR),
    );
    if let Some(lang) = &page.lang {
        metadata = metadata.with_language(lang.clone());
    }
    if let Some(publisher) = page.class_text("publisher") {
        metadata = metadata.with_publisher(publisher);
    }
    if let Some(date) = page.class_text("published") {
        metadata = metadata.with_date(strip_label(date, &labels.published));
    }
    metadata
}

/// `"저자: 홍길동"` → `"홍길동"`; text without the label is returned unchanged.
fn strip_label<'a>(text: &'a str, label: &str) -> &'a str {
    text.strip_prefix(label)
        .and_then(|rest| rest.trim_start().strip_prefix(':'))
        .map(str::trim)
        .unwrap_or(text)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScannedHeading {
    level: u8,
    id: String,
    text: String,
}

#[derive(Debug, Clone, Default)]
struct ScannedPage {
    title: Option<String>,
    lang: Option<String>,
    headings: Vec<ScannedHeading>,
    /// Text of elements carrying a class, in document order.
    classes: Vec<(String, String)>,
    /// Source with missing heading ids filled in.
    html: String,
}

impl ScannedPage {
    fn class_text(&self, class: &str) -> Option<&str> {
        self.classes
            .iter()
            .find(|(c, _)| c.split_whitespace().any(|c| c == class))
            .map(|(_, text)| text.as_str())
    }
}

fn read_page(path: &Path) -> Result<Option<ScannedPage>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Io(e)),
    };
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");
    scan(&decode_text(&bytes, None), stem).map(Some)
}

enum Capture {
    Title,
    Heading {
        level: u8,
        id: String,
        class: Option<String>,
    },
    Class(String),
}

fn heading_level(name: &[u8]) -> Option<u8> {
    match name {
        [b'h', d @ b'1'..=b'6'] => Some(d - b'0'),
        _ => None,
    }
}

fn resolve_entity(entity: &str) -> String {
    if let Some(code) = entity.strip_prefix('#') {
        let value = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse().ok(),
        };
        return value.and_then(char::from_u32).map(String::from).unwrap_or_default();
    }
    match entity {
        "apos" => "'",
        "quot" => "\"",
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "nbsp" => "\u{a0}",
        _ => "",
    }
    .to_string()
}

/// Scan a page for its title, language, classed text and headings, adding
/// `id="header_<stem>_<i>"` to headings that lack one.
fn scan(html: &str, stem: &str) -> Result<ScannedPage> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;

    let mut page = ScannedPage::default();
    let mut insertions: Vec<(usize, String)> = Vec::new();
    let mut depth = 0usize;
    // open captures, innermost last; text goes to all of them
    let mut open: Vec<(usize, Capture, String)> = Vec::new();
    let mut heading_index = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = e.name();
                let name = name.as_ref();

                let mut id = None;
                let mut class = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).into_owned();
                    match attr.key.as_ref() {
                        b"id" => id = Some(value),
                        b"class" => class = Some(value),
                        b"lang" | b"xml:lang" if name == b"html" => page.lang = Some(value),
                        _ => {}
                    }
                }

                if name == b"title" {
                    open.push((depth, Capture::Title, String::new()));
                } else if let Some(level) = heading_level(name) {
                    let id = match id {
                        Some(id) => id,
                        None => {
                            let id = format!("header_{stem}_{heading_index}");
                            // buffer_position is just past the closing '>'
                            let end = reader.buffer_position() as usize;
                            insertions.push((end - 1, format!(" id=\"{id}\"")));
                            id
                        }
                    };
                    heading_index += 1;
                    open.push((depth, Capture::Heading { level, id, class }, String::new()));
                } else if let Some(class) = class {
                    open.push((depth, Capture::Class(class), String::new()));
                }
            }
            Ok(Event::Text(e)) => {
                let text = String::from_utf8_lossy(e.as_ref());
                for (_, _, buf) in &mut open {
                    buf.push_str(&text);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                let text = resolve_entity(&String::from_utf8_lossy(e.as_ref()));
                for (_, _, buf) in &mut open {
                    buf.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                if open.last().is_some_and(|(d, _, _)| *d == depth)
                    && let Some((_, target, text)) = open.pop()
                {
                    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                    match target {
                        Capture::Title => page.title = Some(text),
                        Capture::Heading { level, id, class } => {
                            if let Some(class) = class {
                                page.classes.push((class, text.clone()));
                            }
                            page.headings.push(ScannedHeading { level, id, text });
                        }
                        Capture::Class(class) => page.classes.push((class, text)),
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    let mut out = html.to_string();
    for (at, attr) in insertions.into_iter().rev() {
        out.insert_str(at, &attr);
    }
    page.html = out;
    Ok(page)
}
