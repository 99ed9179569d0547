//! # Scanner Module
//!
//! Discovers the files a run will sort.
//!
//! ## Supported Formats
//! - **Media mode**: images (jpg, png, gif, bmp, webp, tiff, heic),
//!   videos (mp4, mov, avi, mkv, wmv, flv, webm, mpg, m4v) and plain
//!   text (txt, md, csv, json, xml, log, py, js, html, css, mm)
//! - **Documents mode**: every extension in the category table
//!
//! Files come out in lexicographic path order so duplicate decisions and
//! batch assignments are reproducible.
//!
//! ## Example
//! ```rust,ignore
//! use batch_sorter::core::scanner::{ScanConfig, SortMode, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(SortMode::Media, ScanConfig::default());
//! let result = scanner.scan(Path::new("./source_images"))?;
//! ```

mod filter;
mod walker;

pub use filter::ExtensionFilter;
pub(crate) use filter::{IMAGE_EXTENSIONS, TEXT_EXTENSIONS, VIDEO_EXTENSIONS};
pub use walker::{ScanConfig, WalkDirScanner};

use crate::core::hasher::Fingerprint;
use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which family of files a run sorts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Images, videos and plain text into one sequence of batch folders
    Media,
    /// Documents into per-category batch folders
    Documents,
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Media => write!(f, "media"),
            SortMode::Documents => write!(f, "documents"),
        }
    }
}

/// Broad type of a discovered file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    /// Plain text picked up in media mode
    Text,
    Document,
}

/// A file found in the source tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path in the source tree
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Detected type
    pub kind: MediaKind,
    /// Set once the file has been hashed
    pub fingerprint: Option<Fingerprint>,
}

impl FileRecord {
    pub fn new(path: PathBuf, size: u64, kind: MediaKind) -> Self {
        Self {
            path,
            size,
            kind,
            fingerprint: None,
        }
    }

    /// Lower-cased extension, empty when there is none
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }

    /// Final path component
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered files in traversal order
    pub files: Vec<FileRecord>,
    /// Entries below the root that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for source scanners
///
/// Implement this trait to feed the pipeline from something other than
/// a directory walk (e.g. in tests).
pub trait SourceScanner {
    /// Scan a source root. Fails only when the root itself cannot be read.
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(&self, root: &Path, events: &EventSender)
        -> Result<ScanResult, ScanError>;
}
