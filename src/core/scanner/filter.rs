//! File filtering logic for the scanner.

use super::{extension_of, MediaKind, SortMode};
use crate::core::categorize;
use crate::core::organize::is_junk;
use std::path::Path;

pub(crate) const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif", "heic", "heif",
];

pub(crate) const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "wmv", "flv", "webm", "mpg", "mpeg", "m4v",
];

/// Plain-text files that travel with a media library (notes, exports, sidecars)
pub(crate) const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "csv", "json", "xml", "log", "py", "js", "html", "css", "mm",
];

/// Decides which files a sort mode picks up
pub struct ExtensionFilter {
    mode: SortMode,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl ExtensionFilter {
    /// Create a filter for the given mode, skipping hidden files
    pub fn new(mode: SortMode) -> Self {
        Self {
            mode,
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Whether a hidden name should be skipped
    pub fn skips_hidden(&self, path: &Path) -> bool {
        !self.include_hidden
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.starts_with('.'))
    }

    /// Kind of the file if this mode handles it
    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        if self.skips_hidden(path) || is_junk(path) {
            return None;
        }

        let ext = extension_of(path);
        if ext.is_empty() {
            return None;
        }

        match self.mode {
            SortMode::Media if IMAGE_EXTENSIONS.contains(&ext.as_str()) => Some(MediaKind::Image),
            SortMode::Media if VIDEO_EXTENSIONS.contains(&ext.as_str()) => Some(MediaKind::Video),
            SortMode::Media if TEXT_EXTENSIONS.contains(&ext.as_str()) => Some(MediaKind::Text),
            SortMode::Documents if categorize::is_document_extension(&ext) => {
                Some(MediaKind::Document)
            }
            _ => None,
        }
    }
}
