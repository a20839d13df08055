//! Built-in stylesheets.

/// Shared stylesheet written as `style.css` next to every document set.
pub const DEFAULT_STYLESHEET: &str = r#"body {
    margin: 5%;
    font-family: 'Noto Sans KR', sans-serif;
    line-height: 1.6;
    text-align: justify;
}

h1 {
    text-align: center;
    font-size: 1.5em;
    font-weight: bold;
    margin-bottom: 1em;
    color: #333;
}

h2 {
    font-size: 1.2em;
    margin-top: 1em;
    margin-bottom: 0.5em;
    color: #444;
}

h3 {
    font-size: 1.1em;
    margin-top: 0.8em;
    color: #555;
}

h4, h5, h6 {
    font-size: 1em;
    margin-top: 0.6em;
    color: #666;
}

p {
    margin-top: 0.5em;
    margin-bottom: 0.5em;
}

h1 + p, h2 + p, h3 + p, h4 + p, h5 + p, h6 + p {
    text-indent: 0;
}

strong, b {
    font-weight: bold;
}

em, i {
    font-style: italic;
}

.title-page {
    text-align: center;
    margin: 3em auto;
}

.title-page .title {
    margin-top: 30%;
    font-size: 2em;
}

.title-page .author {
    margin-top: 3em;
    font-style: italic;
}

.title-page .publisher {
    font-size: 1.2em;
    color: #666;
}

.title-page .published,
.title-page .date {
    margin-top: 1em;
    font-size: 0.9em;
    color: #666;
}

.toc ol {
    padding-left: 2em;
}

.toc li {
    margin-bottom: 0.5em;
}

.toc a {
    text-decoration: none;
    color: #0066cc;
}

.chapter {
    margin: 1em;
}

.colophon {
    margin-top: 40%;
    font-size: 0.9em;
}

.colophon p {
    margin: 0.2em 0;
}

.colophon .copyright {
    margin-top: 1.5em;
    color: #666;
}

.cover {
    text-align: center;
    padding: 0;
    margin: 0;
}

.cover img {
    height: 100%;
    max-width: 100%;
}
"#;

/// Embedded style for single-file HTML output.
pub const SINGLE_PAGE_STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; }
h1 { color: #333; text-align: center; margin-bottom: 30px; }
h2 { color: #444; margin-top: 20px; }
h3 { color: #555; margin-top: 15px; }
h4 { color: #666; margin-top: 10px; }
h5 { color: #777; margin-top: 10px; }
h6 { color: #888; margin-top: 10px; }
p { margin-bottom: 10px; }
.toc { background-color: #f8f8f8; padding: 15px; border-radius: 5px; margin-bottom: 30px; }
.toc h2 { margin-top: 0; }
.toc ul { padding-left: 20px; }
.toc a { text-decoration: none; color: #0066cc; }
.toc a:hover { text-decoration: underline; }
";
