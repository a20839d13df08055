//! Paragraph reflow within a chapter body.

use crate::book::BodyLine;
use crate::classify::{Classification, ClassifierConfig, classify};
use crate::markdown::is_thematic_break;

/// A structural element of a rendered chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    Heading { level: u8, text: String },
    /// Explicit line break kept from a blank input line.
    Break,
    /// Thematic break (`---`).
    Rule,
}

/// How body lines are grouped into paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflowMode {
    /// Consecutive lines join into one paragraph; blank lines separate paragraphs.
    #[default]
    Paragraphs,
    /// Every line is its own paragraph and every blank line becomes a [`Block::Break`].
    Lines,
}

/// Reflow settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReflowConfig {
    pub mode: ReflowMode,
    /// Classifier used to spot sub-headings left in the body.
    pub classifier: ClassifierConfig,
    /// Turn `---`, `***` and `___` lines into [`Block::Rule`].
    pub thematic_breaks: bool,
}

impl ReflowConfig {
    pub fn new(mode: ReflowMode, classifier: ClassifierConfig) -> Self {
        Self {
            mode,
            classifier,
            thematic_breaks: false,
        }
    }

    pub fn with_thematic_breaks(mut self, enabled: bool) -> Self {
        self.thematic_breaks = enabled;
        self
    }
}

/// Turn a chapter body into paragraphs, sub-headings and breaks.
pub fn reflow(body: &[BodyLine], config: &ReflowConfig) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    fn flush(current: &mut Vec<&str>, blocks: &mut Vec<Block>) {
        if !current.is_empty() {
            blocks.push(Block::Paragraph(current.join(" ")));
            current.clear();
        }
    }

    for line in body {
        let BodyLine::Text(text) = line else {
            flush(&mut current, &mut blocks);
            if config.mode == ReflowMode::Lines {
                blocks.push(Block::Break);
            }
            continue;
        };

        if config.thematic_breaks && is_thematic_break(text) {
            flush(&mut current, &mut blocks);
            blocks.push(Block::Rule);
            continue;
        }

        match classify(text, &config.classifier) {
            Classification::Heading { level, text } => {
                flush(&mut current, &mut blocks);
                blocks.push(Block::Heading {
                    level,
                    text: text.to_string(),
                });
            }
            Classification::NotHeading => {
                current.push(text);
                if config.mode == ReflowMode::Lines {
                    flush(&mut current, &mut blocks);
                }
            }
        }
    }
    flush(&mut current, &mut blocks);

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body(lines: &[&str]) -> Vec<BodyLine> {
        lines
            .iter()
            .map(|l| {
                if l.is_empty() {
                    BodyLine::Blank
                } else {
                    BodyLine::Text(l.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_joins_consecutive_lines() {
        let blocks = reflow(&body(&["one", "two", "", "three"]), &ReflowConfig::default());
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("one two".into()),
                Block::Paragraph("three".into())
            ]
        );
    }

    #[test]
    fn test_repeated_blanks_emit_no_empty_paragraph() {
        let blocks = reflow(&body(&["one", "", "", "", "two"]), &ReflowConfig::default());
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_subheading_splits_paragraph() {
        let blocks = reflow(
            &body(&["before", "### Section", "after"]),
            &ReflowConfig::default(),
        );
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("before".into()),
                Block::Heading {
                    level: 3,
                    text: "Section".into()
                },
                Block::Paragraph("after".into()),
            ]
        );
    }

    #[test]
    fn test_lines_mode_keeps_breaks() {
        let cfg = ReflowConfig::new(ReflowMode::Lines, ClassifierConfig::markers());
        let blocks = reflow(&body(&["one", "two", "", "three"]), &cfg);
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("one".into()),
                Block::Paragraph("two".into()),
                Block::Break,
                Block::Paragraph("three".into()),
            ]
        );
    }

    #[test]
    fn test_thematic_break_only_when_enabled() {
        let lines = body(&["above", "---", "below"]);
        let off = reflow(&lines, &ReflowConfig::default());
        assert_eq!(off, vec![Block::Paragraph("above --- below".into())]);

        let cfg = ReflowConfig::default().with_thematic_breaks(true);
        assert_eq!(
            reflow(&lines, &cfg),
            vec![
                Block::Paragraph("above".into()),
                Block::Rule,
                Block::Paragraph("below".into()),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_plain_lines_join_into_one_paragraph(
            lines in prop::collection::vec("[a-z][a-z ]{0,30}[a-z]", 1..20)
        ) {
            let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
            let blocks = reflow(&body(&refs), &ReflowConfig::default());
            prop_assert_eq!(blocks, vec![Block::Paragraph(lines.join(" "))]);
        }
    }
}
