//! Lightweight Markdown handling.
//!
//! - [`slugify`]: heading anchor ids that stay unique across a document set
//! - [`render_inline`]: the small subset of inline Markdown understood in bundles
//!   (`**bold**`, `*italic*`) plus thematic breaks
//! - [`promote_to_markdown`]: plain text → Markdown with short lines promoted to headings

mod inline;
mod promote;
mod slugify;

pub use inline::{is_thematic_break, render_inline};
pub use promote::{PromoteConfig, promote_to_markdown};
pub use slugify::{HeadingIds, slugify};
