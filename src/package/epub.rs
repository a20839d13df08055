//! Built-in EPUB 3 writer (with an EPUB 2 NCX for older readers).

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{PackageRequest, Packager};
use crate::book::TocEntry;
use crate::error::Result;
use crate::render::write_list;
use crate::util::{escape_xml, guess_media_type};

/// Configuration for the built-in writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpubConfig {
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<u32>,
    /// `dcterms:modified` value; the current UTC time when `None`.
    pub modified: Option<String>,
}

/// Writes a [`PackageRequest`] as an EPUB archive.
///
/// # Example
///
/// ```no_run
/// use booksmith::book::Metadata;
/// use booksmith::package::{EpubWriter, assemble};
/// use booksmith::render::{RenderOptions, render};
/// use booksmith::segment::{SegmentConfig, segment_text};
///
/// let seg = segment_text("Book\n# One\ntext", &SegmentConfig::markup());
/// let meta = Metadata::new(&seg.book_title);
/// let set = render(&seg.book_title, &meta, &seg.chapters, None, &RenderOptions::default());
/// let request = assemble(&set, &meta, None)?;
/// EpubWriter::new().write_to_path(&request, "book.epub")?;
/// # Ok::<(), booksmith::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EpubWriter {
    config: EpubConfig,
}

impl EpubWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: EpubConfig) -> Self {
        self.config = config;
        self
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, request: &PackageRequest, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to_writer(request, file)
    }

    /// Write to any [`Write`] + [`Seek`] destination.
    pub fn write_to_writer<W: Write + Seek>(&self, request: &PackageRequest, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);

        let compression_level = self.config.compression_level.unwrap_or(6);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level as i64));

        // mimetype must be first, uncompressed
        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML.as_bytes())?;

        let modified = self
            .config
            .modified
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(generate_opf(request, &modified).as_bytes())?;

        zip.start_file("OEBPS/toc.ncx", deflated)?;
        zip.write_all(generate_ncx(request).as_bytes())?;

        zip.start_file("OEBPS/nav.xhtml", deflated)?;
        zip.write_all(generate_nav(request).as_bytes())?;

        for document in &request.documents {
            zip.start_file(format!("OEBPS/{}", sanitize_path(&document.file_name)), deflated)?;
            zip.write_all(document.html.as_bytes())?;
        }

        for resource in &request.resources {
            zip.start_file(format!("OEBPS/{}", sanitize_path(&resource.href)), deflated)?;
            zip.write_all(&resource.data)?;
        }

        zip.finish()?;
        Ok(())
    }
}

impl Packager for EpubWriter {
    fn name(&self) -> &str {
        "epub"
    }

    fn package(&self, request: &PackageRequest, output: &Path) -> Result<()> {
        self.write_to_path(request, output)
    }
}

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const COVER_IMAGE_ID: &str = "cover-image";

fn generate_opf(request: &PackageRequest, modified: &str) -> String {
    let meta = &request.metadata;
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
    );
    opf.push_str(&format!(
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
        escape_xml(&request.identifier)
    ));
    opf.push_str(&format!("    <dc:title>{}</dc:title>\n", escape_xml(&meta.title)));
    opf.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        escape_xml(meta.language())
    ));
    opf.push_str(&format!(
        "    <dc:creator>{}</dc:creator>\n",
        escape_xml(&meta.creator)
    ));
    if let Some(publisher) = &meta.publisher {
        opf.push_str(&format!(
            "    <dc:publisher>{}</dc:publisher>\n",
            escape_xml(publisher)
        ));
    }
    if let Some(date) = &meta.date {
        opf.push_str(&format!("    <dc:date>{}</dc:date>\n", escape_xml(date)));
    }
    opf.push_str(&format!(
        "    <meta property=\"dcterms:modified\">{}</meta>\n",
        escape_xml(modified)
    ));
    if request.has_cover() {
        opf.push_str(&format!("    <meta name=\"cover\" content=\"{COVER_IMAGE_ID}\"/>\n"));
    }
    opf.push_str("  </metadata>\n");

    opf.push_str("  <manifest>\n");
    opf.push_str("    <item id=\"ncx\" href=\"toc.ncx\" media-type=\"application/x-dtbncx+xml\"/>\n");
    opf.push_str(
        "    <item id=\"nav\" href=\"nav.xhtml\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n",
    );
    for item in &request.spine {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
            escape_xml(&item.id),
            escape_xml(&item.href),
            guess_media_type(&item.href)
        ));
    }
    for (i, resource) in request.resources.iter().enumerate() {
        let is_cover = request.cover_image.as_deref() == Some(resource.href.as_str());
        let id = if is_cover {
            COVER_IMAGE_ID.to_string()
        } else {
            format!("res_{i}")
        };
        let properties = if is_cover {
            " properties=\"cover-image\""
        } else {
            ""
        };
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"{}/>\n",
            id,
            escape_xml(&resource.href),
            escape_xml(&resource.media_type),
            properties
        ));
    }
    opf.push_str("  </manifest>\n");

    opf.push_str("  <spine toc=\"ncx\">\n");
    for item in &request.spine {
        opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", escape_xml(&item.id)));
    }
    opf.push_str("  </spine>\n</package>\n");
    opf
}

fn generate_ncx(request: &PackageRequest) -> String {
    let depth = request.toc.iter().map(TocEntry::depth).max().unwrap_or(1);
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
"#,
    );
    ncx.push_str(&format!(
        "    <meta name=\"dtb:uid\" content=\"{}\"/>\n",
        escape_xml(&request.identifier)
    ));
    ncx.push_str(&format!("    <meta name=\"dtb:depth\" content=\"{depth}\"/>\n"));
    ncx.push_str(
        r#"    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
"#,
    );
    ncx.push_str(&format!(
        "    <text>{}</text>\n",
        escape_xml(&request.metadata.title)
    ));
    ncx.push_str("  </docTitle>\n  <navMap>\n");

    let mut play_order = 1;
    for entry in &request.toc {
        write_nav_point(&mut ncx, entry, &mut play_order, 2);
    }

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

fn write_nav_point(ncx: &mut String, entry: &TocEntry, play_order: &mut usize, indent: usize) {
    let indent_str = "  ".repeat(indent);

    ncx.push_str(&format!(
        "{indent_str}<navPoint id=\"navpoint-{play_order}\" playOrder=\"{play_order}\">\n"
    ));
    ncx.push_str(&format!(
        "{indent_str}  <navLabel><text>{}</text></navLabel>\n",
        escape_xml(&entry.title)
    ));
    ncx.push_str(&format!(
        "{indent_str}  <content src=\"{}\"/>\n",
        escape_xml(&entry.href)
    ));

    *play_order += 1;

    for child in &entry.children {
        write_nav_point(ncx, child, play_order, indent + 1);
    }

    ncx.push_str(&format!("{indent_str}</navPoint>\n"));
}

fn generate_nav(request: &PackageRequest) -> String {
    let lang = escape_xml(request.metadata.language());
    let mut nav = String::new();
    nav.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n");
    nav.push_str(&format!(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:epub=\"http://www.idpf.org/2007/ops\" xml:lang=\"{lang}\" lang=\"{lang}\">\n"
    ));
    nav.push_str(&format!(
        "<head>\n  <meta charset=\"utf-8\" />\n  <title>{}</title>\n</head>\n<body>\n",
        escape_xml(&request.metadata.title)
    ));
    nav.push_str("<nav epub:type=\"toc\" id=\"toc\">\n");
    write_list(&mut nav, &request.toc, "ol", 1, &|label: &str| label.to_string());
    nav.push_str("</nav>\n</body>\n</html>\n");
    nav
}

/// Sanitize a path for use in ZIP (remove leading slashes, normalize).
fn sanitize_path(path: &str) -> String {
    path.trim_start_matches('/')
        .replace('\\', "/")
        .replace("//", "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Metadata;
    use crate::package::assemble;
    use crate::render::{GenerationDate, RenderOptions, render};
    use crate::segment::{SegmentConfig, segment_text};

    fn request(cover: bool) -> PackageRequest {
        let seg = segment_text("B\n# One\nx\n### Sub\ny\n# Two\nz\n", &SegmentConfig::markup());
        let meta = Metadata::new(&seg.book_title).with_publisher("P & Q");
        let options = RenderOptions::default().with_generated_on(GenerationDate::Omitted);
        let set = render(&seg.book_title, &meta, &seg.chapters, None, &options);
        assemble(&set, &meta, cover.then(|| vec![0xFF, 0xD8])).unwrap()
    }

    #[test]
    fn test_opf_metadata_and_spine() {
        let opf = generate_opf(&request(false), "2024-01-01T00:00:00Z");
        assert!(opf.contains("<dc:language>ko</dc:language>"));
        assert!(opf.contains("<dc:publisher>P &amp; Q</dc:publisher>"));
        assert!(!opf.contains("<dc:date>"));
        assert!(!opf.contains("name=\"cover\""));
        let title = opf.find("idref=\"title\"").unwrap();
        let toc = opf.find("idref=\"toc\"").unwrap();
        let chapter = opf.find("idref=\"chapter_1\"").unwrap();
        assert!(title < toc && toc < chapter);
    }

    #[test]
    fn test_opf_cover_meta() {
        let opf = generate_opf(&request(true), "2024-01-01T00:00:00Z");
        assert!(opf.contains("<meta name=\"cover\" content=\"cover-image\"/>"));
        assert!(opf.contains("id=\"cover-image\" href=\"cover.jpg\" media-type=\"image/jpeg\" properties=\"cover-image\""));
        assert!(opf.contains("<itemref idref=\"cover\"/>"));
    }

    #[test]
    fn test_ncx_is_nested() {
        let ncx = generate_ncx(&request(false));
        assert!(ncx.contains("<meta name=\"dtb:depth\" content=\"2\"/>"));
        assert!(ncx.contains("<content src=\"chapter_1.html#heading_2_Sub\"/>"));
        assert_eq!(ncx.matches("<navPoint ").count(), 3);
    }

    #[test]
    fn test_nav_document() {
        let nav = generate_nav(&request(false));
        assert!(nav.contains("<nav epub:type=\"toc\" id=\"toc\">"));
        assert!(nav.contains("<a href=\"chapter_2.html\">Two</a>"));
    }

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/path/to/file.xhtml"), "path/to/file.xhtml");
        assert_eq!(sanitize_path("path\\to\\file.xhtml"), "path/to/file.xhtml");
    }
}
