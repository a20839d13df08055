//! Package assembly and packaging strategies.
//!
//! [`assemble`] fixes the reading order and navigation of a rendered
//! [`DocumentSet`] into a [`PackageRequest`]. [`package`] then hands the
//! request to an ordered list of [`Packager`]s until one of them succeeds.

mod ebook_convert;
mod epub;

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::book::{Metadata, Resource, SpineItem, TocEntry};
use crate::error::{Error, Result};
use crate::render::{COVER_IMAGE, Document, DocumentRole, DocumentSet, STYLESHEET_HREF, cover_page};
use crate::util::{guess_media_type, uuid_v4};

pub use ebook_convert::{EbookConvert, EbookConvertConfig};
pub use epub::{EpubConfig, EpubWriter};

/// Everything a packager needs, in final reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub metadata: Metadata,
    /// `metadata.identifier`, or a generated `urn:uuid:` when absent.
    pub identifier: String,
    /// Documents in spine order.
    pub documents: Vec<Document>,
    pub spine: Vec<SpineItem>,
    pub toc: Vec<TocEntry>,
    pub resources: Vec<Resource>,
    /// Href of the cover image resource, if any.
    pub cover_image: Option<String>,
}

impl PackageRequest {
    pub fn document(&self, href: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.file_name == href)
    }

    pub fn has_cover(&self) -> bool {
        self.cover_image.is_some()
    }
}

fn role_rank(role: DocumentRole) -> u8 {
    match role {
        DocumentRole::Cover => 0,
        DocumentRole::TitlePage => 1,
        DocumentRole::Toc => 2,
        DocumentRole::Chapter => 3,
        DocumentRole::Colophon => 4,
    }
}

/// Spine id for a document file name (`chapter_3.html` → `chapter_3`).
fn spine_id(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

/// Order a rendered set for packaging.
///
/// The spine runs cover page (when `cover` is given), title page, table of
/// contents (if rendered), chapters in order, then the colophon.
pub fn assemble(set: &DocumentSet, metadata: &Metadata, cover: Option<Vec<u8>>) -> Result<PackageRequest> {
    if set.chapter_count() == 0 {
        return Err(Error::EmptyBook);
    }

    let mut documents: Vec<Document> = set.documents.clone();
    if cover.is_some() {
        documents.push(cover_page(COVER_IMAGE, &set.language));
    }
    // stable: chapters keep their relative order
    documents.sort_by_key(|d| role_rank(d.role));

    let spine = documents
        .iter()
        .map(|d| SpineItem::new(spine_id(&d.file_name), d.file_name.clone()))
        .collect();

    let mut resources = vec![Resource::new(
        STYLESHEET_HREF,
        set.stylesheet.clone().into_bytes(),
        guess_media_type(STYLESHEET_HREF),
    )];
    let cover_image = cover.map(|bytes| {
        resources.push(Resource::new(COVER_IMAGE, bytes, guess_media_type(COVER_IMAGE)));
        COVER_IMAGE.to_string()
    });

    let identifier = metadata
        .identifier
        .clone()
        .unwrap_or_else(|| format!("urn:uuid:{}", uuid_v4()));

    Ok(PackageRequest {
        metadata: metadata.clone(),
        identifier,
        documents,
        spine,
        toc: set.toc.clone(),
        resources,
        cover_image,
    })
}

/// A way of turning a [`PackageRequest`] into an EPUB file.
pub trait Packager {
    /// Short name used in logs and error reports.
    fn name(&self) -> &str;

    /// Write the package to `output`.
    fn package(&self, request: &PackageRequest, output: &Path) -> Result<()>;
}

/// Try each strategy in order; the first success wins.
///
/// Failures are logged and collected. When every strategy fails the error
/// lists each attempt's reason.
pub fn package(request: &PackageRequest, output: &Path, strategies: &[Box<dyn Packager>]) -> Result<PathBuf> {
    let mut failures = Vec::new();

    for strategy in strategies {
        match strategy.package(request, output) {
            Ok(()) => {
                info!("packaged {} with {}", output.display(), strategy.name());
                return Ok(output.to_path_buf());
            }
            Err(e) => {
                warn!("{} failed: {e}", strategy.name());
                failures.push(format!("{}: {e}", strategy.name()));
            }
        }
    }

    Err(Error::AllPackagersFailed(failures))
}

/// Which packaging strategies to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriterChoice {
    /// Built-in EPUB writer only.
    Embedded,
    /// External `ebook-convert` only.
    EbookConvert,
    /// Built-in writer, falling back to `ebook-convert`.
    #[default]
    Auto,
}

impl WriterChoice {
    pub fn strategies(self, epub: EpubConfig, ebook_convert: EbookConvertConfig) -> Vec<Box<dyn Packager>> {
        let embedded: Box<dyn Packager> = Box::new(EpubWriter::new().with_config(epub));
        let external: Box<dyn Packager> = Box::new(EbookConvert::new(ebook_convert));
        match self {
            WriterChoice::Embedded => vec![embedded],
            WriterChoice::EbookConvert => vec![external],
            WriterChoice::Auto => vec![embedded, external],
        }
    }
}
