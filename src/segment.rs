//! Chapter segmentation.
//!
//! The first line of the input is the book title. The remaining lines are
//! folded into chapters: every boundary-level heading closes the chapter
//! being accumulated and becomes the title of the next one.

use log::debug;

use crate::book::{BodyLine, Chapter, FALLBACK_TITLE, Line};
use crate::classify::{Classification, ClassifierConfig, classify};

/// Which headings start a new chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Every heading is a chapter boundary.
    AnyHeading,
    /// Only headings at or above this level (numerically `<=`) are boundaries.
    MaxLevel(u8),
}

impl BoundaryPolicy {
    pub fn is_boundary(self, classification: &Classification<'_>) -> bool {
        match (self, classification) {
            (_, Classification::NotHeading) => false,
            (BoundaryPolicy::AnyHeading, _) => true,
            (BoundaryPolicy::MaxLevel(max), Classification::Heading { level, .. }) => *level <= max,
        }
    }
}

/// Segmentation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentConfig {
    pub classifier: ClassifierConfig,
    pub boundary: BoundaryPolicy,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self::markup()
    }
}

impl SegmentConfig {
    /// `#` markers, `#` and `##` start chapters.
    pub const fn markup() -> Self {
        Self {
            classifier: ClassifierConfig::markers(),
            boundary: BoundaryPolicy::MaxLevel(2),
        }
    }

    /// Unstructured text: short and numbered lines start chapters.
    pub const fn plain_text() -> Self {
        Self {
            classifier: ClassifierConfig::plain_text(),
            boundary: BoundaryPolicy::MaxLevel(2),
        }
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }
}

/// Output of [`segment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmented {
    pub book_title: String,
    pub chapters: Vec<Chapter>,
}

/// State threaded through the fold.
#[derive(Default)]
struct Accumulator {
    chapters: Vec<Chapter>,
    pending_title: Option<String>,
    body: Vec<BodyLine>,
}

impl Accumulator {
    fn close(mut self) -> Self {
        if !self.body.is_empty() {
            let chapter = Chapter {
                title: self.pending_title.take(),
                body: std::mem::take(&mut self.body),
                order_index: self.chapters.len() + 1,
            };
            debug!(
                "chapter {}: {:?} ({} lines)",
                chapter.order_index,
                chapter.title,
                chapter.body.len()
            );
            self.chapters.push(chapter);
        }
        self
    }

    fn step(mut self, line: Line<'_>, config: &SegmentConfig) -> Self {
        if line.is_blank() {
            if !self.body.is_empty() {
                self.body.push(BodyLine::Blank);
            }
            return self;
        }

        let classification = classify(line.trimmed, &config.classifier);
        match classification {
            Classification::Heading { text, .. } if config.boundary.is_boundary(&classification) => {
                let mut acc = self.close();
                acc.pending_title = Some(text.to_string());
                acc
            }
            _ => {
                self.body.push(BodyLine::Text(line.trimmed.to_string()));
                self
            }
        }
    }
}

/// Split a sequence of lines into a book title and chapters.
pub fn segment<'a, I>(lines: I, config: &SegmentConfig) -> Segmented
where
    I: IntoIterator<Item = Line<'a>>,
{
    let mut lines = lines.into_iter();
    let Some(first) = lines.next() else {
        return Segmented {
            book_title: FALLBACK_TITLE.to_string(),
            chapters: Vec::new(),
        };
    };

    let acc = lines
        .fold(Accumulator::default(), |acc, line| acc.step(line, config))
        .close();

    Segmented {
        book_title: first.trimmed.to_string(),
        chapters: acc.chapters,
    }
}

/// Fold lines that carry no title line into chapters.
///
/// Used for bodies whose title comes from elsewhere, such as a resource
/// bundle's metadata.
pub fn segment_body<'a, I>(lines: I, config: &SegmentConfig) -> Vec<Chapter>
where
    I: IntoIterator<Item = Line<'a>>,
{
    lines
        .into_iter()
        .fold(Accumulator::default(), |acc, line| acc.step(line, config))
        .close()
        .chapters
}

/// Convenience wrapper over [`segment`] for a whole text.
pub fn segment_text(text: &str, config: &SegmentConfig) -> Segmented {
    segment(Line::split(text), config)
}
