//! Inline Markdown subset: strong and emphasis.

use crate::util::escape_xml;

/// Escape `text` for HTML and convert `**strong**` and `*emphasis*` spans.
///
/// Delimiters pair up left to right with the shortest possible match; an
/// unpaired delimiter is left as literal text.
pub fn render_inline(text: &str) -> String {
    let escaped = escape_xml(text);
    let strong = replace_pairs(&escaped, "**", "<strong>", "</strong>");
    replace_pairs(&strong, "*", "<em>", "</em>")
}

fn replace_pairs(text: &str, delim: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(delim) {
        let after = &rest[start + delim.len()..];
        let Some(end) = after.find(delim) else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(open);
        out.push_str(&after[..end]);
        out.push_str(close);
        rest = &after[end + delim.len()..];
    }
    out.push_str(rest);
    out
}

/// `---`, `***` or `___` (three or more of the same character) on a line of its own.
pub fn is_thematic_break(line: &str) -> bool {
    let line = line.trim();
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_') && line.chars().count() >= 3 && chars.all(|c| c == first)
}
