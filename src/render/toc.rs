//! Nested table-of-contents construction and list markup.

use crate::book::TocEntry;
use crate::util::escape_xml;

/// A rendered heading that can appear in a table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeadingRef {
    pub level: u8,
    pub text: String,
    pub href: String,
}

/// Nest headings by level: each heading owns the deeper headings that follow
/// it, up to the next heading at its own level or above.
pub(crate) fn nest_headings(headings: &[HeadingRef]) -> Vec<TocEntry> {
    nest_siblings(headings, 0, 0).0
}

/// Collect sibling entries. Stops at a heading shallower than `min_level`.
fn nest_siblings(headings: &[HeadingRef], mut i: usize, min_level: u8) -> (Vec<TocEntry>, usize) {
    let mut entries = Vec::new();

    while let Some(heading) = headings.get(i) {
        if heading.level < min_level {
            break;
        }
        let (children, next_i) = nest_siblings(headings, i + 1, heading.level + 1);
        i = next_i;

        let mut entry = TocEntry::new(heading.text.clone(), heading.href.clone());
        entry.children = children;
        entries.push(entry);
    }

    (entries, i)
}

/// Write `entries` as nested `<ol>`/`<ul>` lists, labels passed through `label`.
pub(crate) fn write_list<F>(out: &mut String, entries: &[TocEntry], tag: &str, indent: usize, label: &F)
where
    F: Fn(&str) -> String,
{
    let pad = "  ".repeat(indent);
    out.push_str(&format!("{pad}<{tag}>\n"));
    for entry in entries {
        out.push_str(&format!(
            "{pad}  <li><a href=\"{}\">{}</a>",
            escape_xml(&entry.href),
            escape_xml(&label(&entry.title))
        ));
        if entry.children.is_empty() {
            out.push_str("</li>\n");
        } else {
            out.push('\n');
            write_list(out, &entry.children, tag, indent + 2, label);
            out.push_str(&format!("{pad}  </li>\n"));
        }
    }
    out.push_str(&format!("{pad}</{tag}>\n"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(level: u8, text: &str) -> HeadingRef {
        HeadingRef {
            level,
            text: text.to_string(),
            href: format!("#{text}"),
        }
    }

    #[test]
    fn test_deeper_levels_nest() {
        let toc = nest_headings(&[h(3, "a"), h(4, "a.1"), h(4, "a.2"), h(3, "b")]);
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].children.len(), 2);
        assert_eq!(toc[0].children[1].title, "a.2");
        assert!(toc[1].children.is_empty());
    }

    #[test]
    fn test_shallower_after_deeper_is_sibling() {
        let toc = nest_headings(&[h(4, "deep"), h(3, "up")]);
        assert_eq!(toc.len(), 2);
        assert!(toc[0].children.is_empty());
    }

    #[test]
    fn test_write_list_markup() {
        let toc = nest_headings(&[h(1, "x"), h(2, "y")]);
        let mut out = String::new();
        write_list(&mut out, &toc, "ol", 0, &|s: &str| s.to_string());
        assert_eq!(
            out,
            "<ol>\n  <li><a href=\"#x\">x</a>\n    <ol>\n      <li><a href=\"#y\">y</a></li>\n    </ol>\n  </li>\n</ol>\n"
        );
    }
}
