//! Packaging through calibre's `ebook-convert`.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use super::{PackageRequest, Packager};
use crate::error::{Error, Result};
use crate::util::{escape_xml, uuid_v4};

/// Entry page written into the staging directory; links every document in
/// reading order so the converter picks them all up.
pub const INDEX_PAGE: &str = "index.html";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Settings for [`EbookConvert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EbookConvertConfig {
    pub binary: PathBuf,
    /// Kill the converter after this long.
    pub timeout: Option<Duration>,
    pub toc_title: String,
    pub max_toc_links: u32,
    /// Where to stage the HTML set. A fresh directory under the system temp
    /// dir when `None`.
    pub staging_dir: Option<PathBuf>,
    /// Leave the staging directory in place afterwards.
    pub keep_staging: bool,
}

impl Default for EbookConvertConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ebook-convert"),
            timeout: None,
            toc_title: "목차".to_string(),
            max_toc_links: 50,
            staging_dir: None,
            keep_staging: false,
        }
    }
}

impl EbookConvertConfig {
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn with_keep_staging(mut self, keep: bool) -> Self {
        self.keep_staging = keep;
        self
    }
}

/// Stages the documents as HTML files and runs the external converter on them.
#[derive(Debug, Clone, Default)]
pub struct EbookConvert {
    config: EbookConvertConfig,
}

impl EbookConvert {
    pub fn new(config: EbookConvertConfig) -> Self {
        Self { config }
    }

    /// Command-line arguments after the binary name.
    pub fn args(&self, request: &PackageRequest, entry: &Path, output: &Path, cover: Option<&Path>) -> Vec<OsString> {
        let meta = &request.metadata;
        let mut args: Vec<OsString> = vec![entry.into(), output.into()];
        let mut push = |flag: &str, value: &str| {
            args.push(flag.into());
            args.push(value.into());
        };

        push("--toc-title", &self.config.toc_title);
        push("--language", meta.language());
        push("--title", &meta.title);
        push("--authors", &meta.creator);
        push("--level1-toc", "//h:h1");
        push("--level2-toc", "//h:h2");
        push("--level3-toc", "//h:h3");
        push("--chapter", "//h:h1");
        push("--chapter-mark", "pagebreak");
        push("--page-breaks-before", "//h:h1");
        push("--max-toc-links", &self.config.max_toc_links.to_string());
        push("--toc-filter", ".*");
        if let Some(publisher) = &meta.publisher {
            push("--publisher", publisher);
        }
        if let Some(identifier) = &meta.identifier {
            push("--isbn", identifier);
        }
        if let Some(date) = &meta.date {
            push("--pubdate", date);
        }
        if let Some(cover) = cover {
            args.push("--cover".into());
            args.push(cover.into());
        }
        args
    }

    fn staging_dir(&self) -> PathBuf {
        self.config
            .staging_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(format!("booksmith-{}", uuid_v4())))
    }

    fn run(&self, request: &PackageRequest, staging: &Path, output: &Path) -> Result<()> {
        stage(request, staging)?;

        let entry = staging.join(INDEX_PAGE);
        let cover = request.cover_image.as_ref().map(|href| staging.join(href));
        let args = self.args(request, &entry, output, cover.as_deref());

        debug!("running {} {:?}", self.config.binary.display(), args);
        let child = Command::new(&self.config.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    Error::PackagingUnavailable(format!("{} not found", self.config.binary.display()))
                }
                _ => Error::Io(e),
            })?;

        let status = wait(child, self.config.timeout)?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::PackagingFailed {
                tool: self.name().to_string(),
                status: status.to_string(),
            })
        }
    }
}

impl Packager for EbookConvert {
    fn name(&self) -> &str {
        "ebook-convert"
    }

    fn package(&self, request: &PackageRequest, output: &Path) -> Result<()> {
        let staging = self.staging_dir();
        let result = self.run(request, &staging, output);
        if !self.config.keep_staging
            && let Err(e) = fs::remove_dir_all(&staging)
        {
            warn!("could not remove {}: {e}", staging.display());
        }
        result
    }
}

/// Recreate `dir` and write every document, resource and the index page.
fn stage(request: &PackageRequest, dir: &Path) -> Result<()> {
    crate::convert::prepare_output_dir(dir)?;
    for document in &request.documents {
        fs::write(dir.join(&document.file_name), &document.html)?;
    }
    for resource in &request.resources {
        fs::write(dir.join(&resource.href), &resource.data)?;
    }
    fs::write(dir.join(INDEX_PAGE), index_page(request))?;
    Ok(())
}

fn index_page(request: &PackageRequest) -> String {
    let lang = escape_xml(request.metadata.language());
    let mut html = String::new();
    html.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n");
    html.push_str(&format!(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"{lang}\" lang=\"{lang}\">\n"
    ));
    html.push_str(&format!(
        "<head>\n  <meta charset=\"utf-8\" />\n  <title>{}</title>\n</head>\n<body>\n<ul>\n",
        escape_xml(&request.metadata.title)
    ));
    for document in &request.documents {
        html.push_str(&format!(
            "  <li><a href=\"{}\">{}</a></li>\n",
            escape_xml(&document.file_name),
            escape_xml(&document.title)
        ));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

/// Wait for `child`, killing it once `timeout` has passed.
fn wait(mut child: Child, timeout: Option<Duration>) -> Result<ExitStatus> {
    let Some(timeout) = timeout else {
        return Ok(child.wait()?);
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            child.kill()?;
            child.wait()?;
            return Err(Error::PackagingTimeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Metadata;
    use crate::package::assemble;
    use crate::render::{GenerationDate, RenderOptions, render};
    use crate::segment::{SegmentConfig, segment_text};
    use tempfile::TempDir;

    fn request(meta: Metadata, cover: bool) -> PackageRequest {
        let seg = segment_text("B\n# One\nx\n", &SegmentConfig::markup());
        let options = RenderOptions::default().with_generated_on(GenerationDate::Omitted);
        let set = render(&seg.book_title, &meta, &seg.chapters, None, &options);
        assemble(&set, &meta, cover.then(|| vec![0xFF, 0xD8])).unwrap()
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_args_required_and_optional() {
        let req = request(Metadata::new("책").with_creator("작가"), false);
        let args = strings(&EbookConvert::default().args(&req, Path::new("in.html"), Path::new("out.epub"), None));
        assert_eq!(&args[..2], &["in.html", "out.epub"]);
        let joined = args.join(" ");
        assert!(joined.contains("--toc-title 목차"));
        assert!(joined.contains("--title 책"));
        assert!(joined.contains("--authors 작가"));
        assert!(joined.contains("--language ko"));
        assert!(joined.contains("--level3-toc //h:h3"));
        assert!(joined.contains("--max-toc-links 50"));
        assert!(!joined.contains("--publisher"));
        assert!(!joined.contains("--isbn"));
        assert!(!joined.contains("--cover"));
    }

    #[test]
    fn test_args_with_metadata_and_cover() {
        let meta = Metadata::new("책")
            .with_publisher("출판")
            .with_identifier("978")
            .with_date("2024-01-01");
        let req = request(meta, true);
        let args = strings(&EbookConvert::default().args(
            &req,
            Path::new("in.html"),
            Path::new("out.epub"),
            Some(Path::new("cover.jpg")),
        ));
        let joined = args.join(" ");
        assert!(joined.contains("--publisher 출판"));
        assert!(joined.contains("--isbn 978"));
        assert!(joined.contains("--pubdate 2024-01-01"));
        assert!(joined.ends_with("--cover cover.jpg"));
    }

    #[test]
    fn test_missing_binary_is_unavailable_and_staging_removed() {
        let tmp = TempDir::new().unwrap();
        let staging = tmp.path().join("staging");
        let packager = EbookConvert::new(
            EbookConvertConfig::default()
                .with_binary("/nonexistent/ebook-convert")
                .with_staging_dir(&staging),
        );
        let req = request(Metadata::new("B"), false);
        let err = packager.package(&req, &tmp.path().join("out.epub")).unwrap_err();
        assert!(matches!(err, Error::PackagingUnavailable(_)));
        assert!(!staging.exists());
    }

    #[test]
    fn test_staging_replaces_stale_files() {
        let tmp = TempDir::new().unwrap();
        let staging = tmp.path().join("staging");
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("chapter_99.html"), "stale").unwrap();

        let req = request(Metadata::new("B"), true);
        stage(&req, &staging).unwrap();
        assert!(!staging.join("chapter_99.html").exists());
        for name in ["index.html", "title.html", "toc.html", "chapter_1.html", "style.css", "cover.jpg", "cover.xhtml"] {
            assert!(staging.join(name).exists(), "{name} missing");
        }
        let index = fs::read_to_string(staging.join(INDEX_PAGE)).unwrap();
        assert!(index.find("title.html").unwrap() < index.find("chapter_1.html").unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_reports_status() {
        let tmp = TempDir::new().unwrap();
        let packager = EbookConvert::new(
            EbookConvertConfig::default()
                .with_binary("false")
                .with_staging_dir(tmp.path().join("s")),
        );
        let req = request(Metadata::new("B"), false);
        let err = packager.package(&req, &tmp.path().join("out.epub")).unwrap_err();
        assert!(matches!(err, Error::PackagingFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let child = Command::new("sleep").arg("5").spawn().unwrap();
        let err = wait(child, Some(Duration::from_millis(200))).unwrap_err();
        assert!(matches!(err, Error::PackagingTimeout(_)));
    }
}
