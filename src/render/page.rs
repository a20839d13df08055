//! XHTML page skeleton shared by every rendered document.

use crate::util::escape_xml;

/// Wrap `body` in a complete XHTML document.
///
/// `head` is inserted verbatim after the `<title>` element (stylesheet
/// links or an embedded `<style>` block).
pub(crate) fn xhtml_page(title: &str, language: &str, head: &str, body: &str) -> String {
    let lang = escape_xml(language);
    let mut doc = String::with_capacity(body.len() + 512);
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE html>\n");
    doc.push_str(&format!(
        "<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"{lang}\" lang=\"{lang}\">\n"
    ));
    doc.push_str("<head>\n  <meta charset=\"utf-8\" />\n");
    doc.push_str(&format!("  <title>{}</title>\n", escape_xml(title)));
    doc.push_str(head);
    doc.push_str("</head>\n<body>\n");
    doc.push_str(body);
    doc.push_str("</body>\n</html>\n");
    doc
}

/// `<link>` element for an external stylesheet.
pub(crate) fn stylesheet_link(href: &str) -> String {
    format!(
        "  <link rel=\"stylesheet\" type=\"text/css\" href=\"{}\" />\n",
        escape_xml(href)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_is_xhtml() {
        let page = xhtml_page("A & B", "ko", &stylesheet_link("style.css"), "<p>x</p>\n");
        assert!(page.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(page.contains("xmlns=\"http://www.w3.org/1999/xhtml\""));
        assert!(page.contains("<title>A &amp; B</title>"));
        assert!(page.contains("<meta charset=\"utf-8\" />"));
        assert!(page.contains("href=\"style.css\" />"));
        assert!(page.ends_with("</html>\n"));
    }
}
