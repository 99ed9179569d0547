//! Types for the organize module.

use crate::core::categorize::Category;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of files per batch folder
pub const DEFAULT_BATCH_CAPACITY: usize = 500;

/// Which sequence of batch folders a file goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKey {
    /// Directly under the destination (media mode)
    Root,
    /// Under `<dest>/<category>` (documents mode)
    Category(Category),
}

impl BatchKey {
    /// Directory the numbered batch folders live in
    pub fn parent_dir(&self, dest_root: &Path) -> PathBuf {
        match self {
            BatchKey::Root => dest_root.to_path_buf(),
            BatchKey::Category(category) => dest_root.join(category.label()),
        }
    }
}

/// A numbered output folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFolder {
    /// 1-based folder number
    pub index: u32,
    /// Full path of the folder
    pub path: PathBuf,
    /// Files already in the folder
    pub count: usize,
    /// Maximum number of files
    pub capacity: usize,
}

impl BatchFolder {
    pub fn new(parent: &Path, index: u32, count: usize, capacity: usize) -> Self {
        Self {
            index,
            path: parent.join(batch_folder_name(index)),
            count,
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }
}

/// `batch_0001`, `batch_0002`, ...
pub fn batch_folder_name(index: u32) -> String {
    format!("batch_{:04}", index)
}

/// Folder number from a batch folder name, accepting any zero padding
pub fn parse_batch_index(name: &str) -> Option<u32> {
    let digits = name.strip_prefix("batch_")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
