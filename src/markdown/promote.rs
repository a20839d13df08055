//! Plain text to lightweight Markdown.
//!
//! The first line becomes the `#` document title. Remaining short lines are
//! promoted to `##` or `###` headings by the classifier's two-tier length
//! rule; every other line passes through unchanged.

use crate::classify::{Classification, ClassifierConfig, MARKER, classify};

/// Settings for [`promote_to_markdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoteConfig {
    pub classifier: ClassifierConfig,
}

impl Default for PromoteConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::markdown_promotion(),
        }
    }
}

/// Convert plain text into Markdown, one output line per input line.
///
/// Each heading is followed by an empty line so the result renders the same
/// in any Markdown reader.
///
/// ```
/// use booksmith::markdown::{PromoteConfig, promote_to_markdown};
///
/// let md = promote_to_markdown("제목\n1장\n본문은 스무 글자보다 긴 문장입니다. 그대로 남습니다.", &PromoteConfig::default());
/// assert_eq!(md, "# 제목\n\n### 1장\n\n본문은 스무 글자보다 긴 문장입니다. 그대로 남습니다.");
/// ```
pub fn promote_to_markdown(text: &str, config: &PromoteConfig) -> String {
    let mut lines = text.lines();
    let mut out: Vec<String> = Vec::new();

    if let Some(title) = lines.next() {
        out.push(format!("{MARKER} {}", title.trim()));
        out.push(String::new());
    }

    for line in lines {
        let line = line.trim();
        match classify(line, &config.classifier) {
            Classification::Heading { level, text } => {
                out.push(heading(level, text));
                out.push(String::new());
            }
            Classification::NotHeading => out.push(line.to_string()),
        }
    }

    out.join("\n")
}

fn heading(level: u8, text: &str) -> String {
    let markers: String = std::iter::repeat_n(MARKER, level as usize).collect();
    format!("{markers} {text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tier_promotion() {
        let input = "Book\nShort\nA bit longer one\nThis line is comfortably over twenty characters.";
        let md = promote_to_markdown(input, &PromoteConfig::default());
        assert_eq!(
            md,
            "# Book\n\n### Short\n\n## A bit longer one\n\nThis line is comfortably over twenty characters."
        );
    }

    #[test]
    fn test_blank_lines_kept() {
        let md = promote_to_markdown(
            "T\n\nfirst paragraph that is long enough\n\nsecond paragraph that is long enough",
            &PromoteConfig::default(),
        );
        assert_eq!(
            md,
            "# T\n\n\nfirst paragraph that is long enough\n\nsecond paragraph that is long enough"
        );
    }

    #[test]
    fn test_existing_markers_are_normalised_not_nested() {
        let md = promote_to_markdown("T\n#  Already", &PromoteConfig::default());
        assert_eq!(md, "# T\n\n# Already\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(promote_to_markdown("", &PromoteConfig::default()), "");
    }
}
