//! Slug generation for heading anchors.

/// Generate an anchor-safe slug from heading text.
///
/// Alphanumeric characters of any script are kept as-is; everything else
/// becomes an underscore.
///
/// # Examples
///
/// ```
/// use booksmith::markdown::slugify;
///
/// assert_eq!(slugify("Chapter One"), "Chapter_One");
/// assert_eq!(slugify("1장: 시작"), "1장__시작");
/// ```
pub fn slugify(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Sequential heading id allocator.
///
/// Ids have the form `heading_<n>_<slug>`. One allocator is shared by every
/// document of a conversion, so two headings with identical text still get
/// distinct ids.
#[derive(Debug, Clone)]
pub struct HeadingIds {
    next: usize,
}

impl Default for HeadingIds {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next id for `text`.
    pub fn next_id(&mut self, text: &str) -> String {
        let n = self.next;
        self.next += 1;
        let slug = slugify(text);
        if slug.is_empty() {
            format!("heading_{n}")
        } else {
            format!("heading_{n}_{slug}")
        }
    }

    /// Number of ids handed out so far.
    pub fn count(&self) -> usize {
        self.next - 1
    }
}
