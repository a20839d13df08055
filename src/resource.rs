//! Resource bundle loading.
//!
//! A bundle is a directory holding `content.md` (required) plus optional
//! `metadata.json`, `colophon.json`, `style.css` and `cover.jpg`. Loading
//! validates everything up front so a conversion never starts writing output
//! for a bundle that turns out to be broken.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::book::{Chapter, Colophon, Line, Metadata};
use crate::classify::ClassifierConfig;
use crate::error::{Error, Result};
use crate::reflow::{ReflowConfig, ReflowMode};
use crate::render::RenderOptions;
use crate::segment::{BoundaryPolicy, SegmentConfig, segment_body};
use crate::util::decode_text;

pub const METADATA_FILE: &str = "metadata.json";
pub const CONTENT_FILE: &str = "content.md";
pub const COLOPHON_FILE: &str = "colophon.json";
pub const STYLE_FILE: &str = "style.css";
pub const COVER_FILE: &str = "cover.jpg";

/// Title of the single chapter of a bundle without level-1 headings.
pub const UNTITLED_CONTENT: &str = "내용";

/// A fully loaded and validated resource bundle.
#[derive(Debug, Clone)]
pub struct ResourceBundle {
    pub root: PathBuf,
    pub metadata: Metadata,
    /// `content.md` with runs of blank lines collapsed to one.
    pub content: String,
    pub colophon: Option<Colophon>,
    pub stylesheet: Option<String>,
    pub cover: Option<Vec<u8>>,
}

impl ResourceBundle {
    /// Load and validate the bundle at `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::InputNotFound(dir.to_path_buf()));
        }

        let metadata = match read_optional(&dir.join(METADATA_FILE))? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| Error::malformed(dir.join(METADATA_FILE), e))?,
            None => {
                warn!("{} not found, using default metadata", METADATA_FILE);
                Metadata::default()
            }
        };

        let content_path = dir.join(CONTENT_FILE);
        let content = match read_optional(&content_path)? {
            Some(bytes) => collapse_blank_runs(&decode_text(&bytes, None)),
            None => return Err(Error::malformed(content_path, "required file is missing")),
        };

        let colophon = match read_optional(&dir.join(COLOPHON_FILE))? {
            Some(bytes) => Some(
                serde_json::from_slice(&bytes)
                    .map_err(|e| Error::malformed(dir.join(COLOPHON_FILE), e))?,
            ),
            None => None,
        };

        let stylesheet = read_degraded(&dir.join(STYLE_FILE))
            .map(|bytes| decode_text(&bytes, None).into_owned());
        let cover = read_degraded(&dir.join(COVER_FILE));

        debug!(
            "loaded bundle {} (colophon: {}, css: {}, cover: {})",
            dir.display(),
            colophon.is_some(),
            stylesheet.is_some(),
            cover.is_some()
        );

        Ok(Self {
            root: dir.to_path_buf(),
            metadata,
            content,
            colophon,
            stylesheet,
            cover,
        })
    }

    /// Segmentation used for bundle content: level-1 `#` headings start chapters.
    pub fn segment_config() -> SegmentConfig {
        SegmentConfig::markup().with_boundary(BoundaryPolicy::MaxLevel(1))
    }

    /// Split `content.md` into chapters.
    ///
    /// Content without any level-1 heading becomes one chapter titled
    /// [`UNTITLED_CONTENT`].
    pub fn chapters(&self) -> Vec<Chapter> {
        let mut chapters = segment_body(Line::split(&self.content), &Self::segment_config());
        if let [only] = chapters.as_mut_slice()
            && only.title.is_none()
        {
            only.title = Some(UNTITLED_CONTENT.to_string());
        }
        chapters
    }

    /// Rendering settings for bundle content on top of `base`.
    ///
    /// Every line is its own paragraph, blank lines are kept as breaks, and
    /// inline emphasis and thematic breaks are honoured.
    pub fn render_options(&self, base: RenderOptions) -> RenderOptions {
        let reflow = ReflowConfig::new(ReflowMode::Lines, ClassifierConfig::markers())
            .with_thematic_breaks(true);
        let options = base.with_reflow(reflow).with_inline_markdown(true);
        match &self.stylesheet {
            Some(css) => options.with_stylesheet(css.clone()),
            None => options,
        }
    }
}

/// `Ok(None)` when the file does not exist; other I/O errors propagate.
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Read an optional asset; failures are logged and the asset is skipped.
fn read_degraded(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!("skipping {}: {e}", path.display());
            None
        }
    }
}

/// Keep at most one blank line between non-blank lines.
pub fn collapse_blank_runs(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut previous_blank = false;
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if !(blank && previous_blank) {
            out.push(line);
        }
        previous_blank = blank;
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bundle(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_minimal_bundle() {
        let dir = bundle(&[("content.md", "# 하나\n본문")]);
        let b = ResourceBundle::load(dir.path()).unwrap();
        assert_eq!(b.metadata, Metadata::default());
        assert!(b.colophon.is_none());
        assert!(b.stylesheet.is_none());
        assert!(b.cover.is_none());
    }

    #[test]
    fn test_missing_dir_is_input_not_found() {
        let err = ResourceBundle::load(Path::new("/nonexistent/bundle")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    #[test]
    fn test_missing_content_is_malformed() {
        let dir = bundle(&[("metadata.json", "{}")]);
        let err = ResourceBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::MalformedResource { .. }));
    }

    #[test]
    fn test_bad_json_is_malformed() {
        let dir = bundle(&[("content.md", "x"), ("colophon.json", "{not json")]);
        let err = ResourceBundle::load(dir.path()).unwrap_err();
        match err {
            Error::MalformedResource { path, .. } => assert!(path.ends_with("colophon.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_chapters_split_on_level_one() {
        let dir = bundle(&[("content.md", "# 첫째\n가\n## 소제목\n나\n# 둘째\n다")]);
        let chapters = ResourceBundle::load(dir.path()).unwrap().chapters();
        let titles: Vec<_> = chapters.iter().map(|c| c.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("첫째"), Some("둘째")]);
        assert_eq!(chapters[0].text_lines().collect::<Vec<_>>(), vec!["가", "## 소제목", "나"]);
    }

    #[test]
    fn test_no_level_one_heading_gives_single_chapter() {
        let dir = bundle(&[("content.md", "그냥 글\n## 작은 제목\n더 많은 글")]);
        let chapters = ResourceBundle::load(dir.path()).unwrap().chapters();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title.as_deref(), Some(UNTITLED_CONTENT));
    }

    #[test]
    fn test_collapse_blank_runs() {
        assert_eq!(collapse_blank_runs("a\n\n\n\nb\n\nc"), "a\n\nb\n\nc");
        assert_eq!(collapse_blank_runs("a\n \n\t\nb"), "a\n \nb");
    }

    #[test]
    fn test_render_options_use_bundle_css() {
        let dir = bundle(&[("content.md", "x"), ("style.css", "body {}")]);
        let b = ResourceBundle::load(dir.path()).unwrap();
        let options = b.render_options(RenderOptions::default());
        assert_eq!(options.stylesheet.as_deref(), Some("body {}"));
        assert!(options.inline_markdown);
        assert_eq!(options.reflow.mode, ReflowMode::Lines);
    }
}
