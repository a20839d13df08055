//! Cover image sources.
//!
//! Drawing a title onto a cover needs fonts and text layout, which this
//! crate leaves to whoever implements [`CoverRenderer`]. Two sources are
//! built in: an existing image file, and a plain generated cover.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::error::{Error, Result};

/// Something that can produce JPEG cover bytes for a book title.
pub trait CoverRenderer {
    fn render(&self, title: &str) -> Result<Vec<u8>>;
}

/// Use an image that already exists on disk.
#[derive(Debug, Clone)]
pub struct ExistingCover {
    pub path: PathBuf,
}

impl ExistingCover {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CoverRenderer for ExistingCover {
    fn render(&self, _title: &str) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| Error::Cover(format!("{}: {e}", self.path.display())))
    }
}

/// Solid background with a single accent band. No text is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainCover {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub accent: [u8; 3],
}

impl Default for PlainCover {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 2560,
            background: [240, 240, 245],
            accent: [50, 50, 100],
        }
    }
}

impl PlainCover {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl CoverRenderer for PlainCover {
    fn render(&self, _title: &str) -> Result<Vec<u8>> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Cover(format!(
                "invalid cover size {}x{}",
                self.width, self.height
            )));
        }

        // band across the upper third, where a title would sit
        let band_top = self.height / 3;
        let band_bottom = band_top + (self.height / 40).max(1);
        let img = RgbImage::from_fn(self.width, self.height, |_, y| {
            if (band_top..band_bottom).contains(&y) {
                Rgb(self.accent)
            } else {
                Rgb(self.background)
            }
        });

        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .map_err(|e| Error::Cover(e.to_string()))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_cover_is_jpeg() {
        let bytes = PlainCover::default().with_size(60, 90).render("책").unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let err = PlainCover::default().with_size(0, 10).render("x").unwrap_err();
        assert!(matches!(err, Error::Cover(_)));
    }

    #[test]
    fn test_existing_cover_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cover.jpg");
        fs::write(&path, b"\xFF\xD8data").unwrap();
        assert_eq!(ExistingCover::new(&path).render("t").unwrap(), b"\xFF\xD8data");
    }

    #[test]
    fn test_missing_existing_cover_is_cover_error() {
        let err = ExistingCover::new("/nonexistent/cover.jpg").render("t").unwrap_err();
        assert!(matches!(err, Error::Cover(_)));
    }
}
