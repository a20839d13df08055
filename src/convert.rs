//! End-to-end conversion pipelines.
//!
//! Each pipeline checks its input before touching any output, so a missing
//! file or a broken resource bundle never leaves a half-cleared output
//! directory behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::book::{DEFAULT_CREATOR, Metadata};
use crate::classify::ClassifierConfig;
use crate::cover::{CoverRenderer, ExistingCover, PlainCover};
use crate::error::{Error, Result};
use crate::htmldir;
use crate::markdown::{PromoteConfig, promote_to_markdown};
use crate::reflow::{ReflowConfig, ReflowMode};
use crate::render::{
    COVER_IMAGE, DocumentSet, GenerationDate, RenderOptions, SingleOptions, render, render_single,
};
use crate::resource::ResourceBundle;
use crate::package::{EbookConvertConfig, EpubConfig, WriterChoice, assemble, package};
use crate::segment::{SegmentConfig, segment_text};
use crate::util::decode_text;

/// How headings are recognised in plain text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Only `#` markers.
    #[default]
    Markup,
    /// Short lines, numbered lines and bare markers as well.
    Plain,
}

impl Profile {
    pub fn segment_config(self) -> SegmentConfig {
        match self {
            Profile::Markup => SegmentConfig::markup(),
            Profile::Plain => SegmentConfig::plain_text(),
        }
    }
}

/// Where the EPUB cover comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoverSource {
    #[default]
    None,
    File(PathBuf),
    Generate(PlainCover),
}

impl CoverSource {
    fn renderer(&self) -> Option<Box<dyn CoverRenderer>> {
        match self {
            CoverSource::None => None,
            CoverSource::File(path) => Some(Box::new(ExistingCover::new(path))),
            CoverSource::Generate(plain) => Some(Box::new(plain.clone())),
        }
    }
}

/// Conversion settings shared by the pipelines.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub author: Option<String>,
    /// Overrides the title taken from the first input line.
    pub title: Option<String>,
    /// Stylesheet file; linked by single-page output, embedded otherwise.
    pub css: Option<PathBuf>,
    pub no_toc: bool,
    pub profile: Profile,
    pub cover: CoverSource,
    pub writer: WriterChoice,
    pub generated_on: GenerationDate,
    /// Encoding tried after UTF-8 when decoding input text.
    pub encoding: Option<String>,
    pub epub: EpubConfig,
    pub ebook_convert: EbookConvertConfig,
}

impl ConvertOptions {
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_css(mut self, css: impl Into<PathBuf>) -> Self {
        self.css = Some(css.into());
        self
    }

    pub fn with_toc(mut self, toc: bool) -> Self {
        self.no_toc = !toc;
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_cover(mut self, cover: CoverSource) -> Self {
        self.cover = cover;
        self
    }

    pub fn with_writer(mut self, writer: WriterChoice) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_generated_on(mut self, date: GenerationDate) -> Self {
        self.generated_on = date;
        self
    }

    pub fn with_ebook_convert(mut self, config: EbookConvertConfig) -> Self {
        self.ebook_convert = config;
        self
    }

    /// Rendering settings before any input-specific adjustments.
    fn render_options(&self) -> RenderOptions {
        let options = RenderOptions::default()
            .with_toc(!self.no_toc)
            .with_generated_on(self.generated_on)
            .with_reflow(ReflowConfig::new(ReflowMode::Paragraphs, ClassifierConfig::markers()));
        match self.css.as_deref().and_then(read_stylesheet) {
            Some(css) => options.with_stylesheet(css),
            None => options,
        }
    }
}

/// Remove `dir` if it exists and create it empty.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

fn read_input(path: &Path, encoding: Option<&str>) -> Result<String> {
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    Ok(decode_text(&bytes, encoding).into_owned())
}

/// Custom CSS is optional: an unreadable file falls back to the default.
fn read_stylesheet(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(decode_text(&bytes, None).into_owned()),
        Err(e) => {
            warn!("cannot read stylesheet {}: {e}, using the default", path.display());
            None
        }
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Segment and render a text file.
fn render_text(input: &Path, options: &ConvertOptions) -> Result<(DocumentSet, Metadata)> {
    let text = read_input(input, options.encoding.as_deref())?;
    let segmented = segment_text(&text, &options.profile.segment_config());
    if segmented.chapters.is_empty() {
        return Err(Error::EmptyBook);
    }

    let title = options.title.clone().unwrap_or(segmented.book_title);
    let metadata = Metadata::new(&title)
        .with_creator(options.author.as_deref().unwrap_or(DEFAULT_CREATOR));
    let set = render(&title, &metadata, &segmented.chapters, None, &options.render_options());
    Ok((set, metadata))
}

fn render_bundle(bundle: &ResourceBundle, options: &ConvertOptions) -> Result<DocumentSet> {
    let chapters = bundle.chapters();
    if chapters.is_empty() {
        return Err(Error::EmptyBook);
    }
    Ok(render(
        &bundle.metadata.title,
        &bundle.metadata,
        &chapters,
        bundle.colophon.as_ref(),
        &bundle.render_options(options.render_options()),
    ))
}

fn package_set(
    set: &DocumentSet,
    metadata: &Metadata,
    cover: Option<Vec<u8>>,
    output: &Path,
    options: &ConvertOptions,
) -> Result<PathBuf> {
    let request = assemble(set, metadata, cover)?;
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let strategies = options
        .writer
        .strategies(options.epub.clone(), options.ebook_convert.clone());
    package(&request, output, &strategies)
}

/// Text file to a single HTML page with an inline table of contents.
pub fn txt_to_html(input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
    let text = read_input(input, options.encoding.as_deref())?;
    let mut single = SingleOptions::default().with_toc(!options.no_toc);
    match &options.css {
        Some(css) if css.is_file() => single = single.with_css_href(css.to_string_lossy()),
        Some(css) => warn!("stylesheet {} not found, embedding the default", css.display()),
        None => {}
    }
    write_file(output, render_single(&text, &single))?;
    info!("wrote {}", output.display());
    Ok(())
}

/// Text file to a linked HTML document set in `output_dir`.
pub fn txt_to_html_dir(input: &Path, output_dir: &Path, options: &ConvertOptions) -> Result<DocumentSet> {
    let (set, _) = render_text(input, options)?;
    prepare_output_dir(output_dir)?;
    set.write_to_dir(output_dir)?;
    info!(
        "wrote {} chapters to {}",
        set.chapter_count(),
        output_dir.display()
    );
    Ok(set)
}

/// Text file to EPUB.
pub fn txt_to_epub(input: &Path, output: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    let (set, metadata) = render_text(input, options)?;
    let cover = options.cover.renderer().and_then(|renderer| {
        renderer
            .render(&metadata.title)
            .inspect_err(|e| warn!("continuing without a cover: {e}"))
            .ok()
    });
    let path = package_set(&set, &metadata, cover, output, options)?;
    info!("wrote {} ({} chapters)", path.display(), set.chapter_count());
    Ok(path)
}

/// Resource bundle to a linked HTML document set in `output_dir`.
///
/// The bundle cover, when present, is copied next to the documents.
pub fn resource_to_html(bundle_dir: &Path, output_dir: &Path, options: &ConvertOptions) -> Result<DocumentSet> {
    let bundle = ResourceBundle::load(bundle_dir)?;
    let set = render_bundle(&bundle, options)?;

    prepare_output_dir(output_dir)?;
    set.write_to_dir(output_dir)?;
    if let Some(cover) = &bundle.cover {
        fs::write(output_dir.join(COVER_IMAGE), cover)?;
    }
    info!(
        "wrote {} chapters to {}",
        set.chapter_count(),
        output_dir.display()
    );
    Ok(set)
}

/// Resource bundle to EPUB.
pub fn resource_to_epub(bundle_dir: &Path, output: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    let bundle = ResourceBundle::load(bundle_dir)?;
    let set = render_bundle(&bundle, options)?;
    let path = package_set(&set, &bundle.metadata, bundle.cover.clone(), output, options)?;
    info!("wrote {} ({} chapters)", path.display(), set.chapter_count());
    Ok(path)
}

/// Previously rendered HTML directory to EPUB.
pub fn html_to_epub(html_dir: &Path, output: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    let mut loaded = htmldir::load(html_dir, None)?;
    if loaded.set.chapter_count() == 0 {
        return Err(Error::EmptyBook);
    }
    if let Some(author) = &options.author {
        loaded.metadata.creator.clone_from(author);
    }
    if let Some(title) = &options.title {
        loaded.metadata.title.clone_from(title);
    }
    let path = package_set(&loaded.set, &loaded.metadata, loaded.cover, output, options)?;
    info!("wrote {} ({} chapters)", path.display(), loaded.set.chapter_count());
    Ok(path)
}

/// Text file to lightweight Markdown with promoted headings.
pub fn txt_to_markdown(input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
    let text = read_input(input, options.encoding.as_deref())?;
    write_file(output, promote_to_markdown(&text, &PromoteConfig::default()))?;
    info!("wrote {}", output.display());
    Ok(())
}
