//! # booksmith
//!
//! Turns plain text and Markdown resource bundles into HTML document sets
//! and EPUB packages.
//!
//! ## Pipeline
//!
//! Text flows through a heading [`classify`]er, the chapter [`segment`]er,
//! paragraph [`reflow`], the document [`render`]er and finally the
//! [`package`] assembler, which hands the result to an ordered list of
//! packaging strategies.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use booksmith::convert::{ConvertOptions, txt_to_epub};
//!
//! let options = ConvertOptions::default().with_author("홍길동");
//! txt_to_epub(Path::new("input.txt"), Path::new("output.epub"), &options).unwrap();
//! ```
//!
//! ## Working with the stages
//!
//! ```
//! use booksmith::book::Metadata;
//! use booksmith::render::{GenerationDate, RenderOptions, render};
//! use booksmith::segment::{SegmentConfig, segment_text};
//!
//! let seg = segment_text("My Book\n# Intro\nHello world\n", &SegmentConfig::markup());
//! let meta = Metadata::new(&seg.book_title);
//! let options = RenderOptions::default().with_generated_on(GenerationDate::Omitted);
//! let set = render(&seg.book_title, &meta, &seg.chapters, None, &options);
//!
//! assert_eq!(set.chapter_count(), 1);
//! assert!(set.get("chapter_1.html").is_some());
//! ```

pub mod book;
pub mod classify;
pub mod convert;
pub mod cover;
pub mod error;
pub mod htmldir;
pub mod markdown;
pub mod package;
pub mod reflow;
pub mod render;
pub mod resource;
pub mod segment;
pub(crate) mod util;

pub use book::{Chapter, Colophon, Metadata, TocEntry};
pub use error::{Error, Result};
pub use util::decode_text;
