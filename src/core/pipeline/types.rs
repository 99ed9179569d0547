//! Configuration and result types for a sorting run.

use crate::core::organize::DEFAULT_BATCH_CAPACITY;
use crate::core::scanner::SortMode;
use crate::error::SorterError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest meaningful Hamming distance for a 64-bit image hash
pub const MAX_SIMILARITY_THRESHOLD: u32 = 64;

/// Everything a run needs to know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SorterConfig {
    /// Directory to sort
    pub source_dir: PathBuf,
    /// Root the batch folders are created under
    pub dest_dir: PathBuf,
    /// Media or documents
    pub mode: SortMode,
    /// Capacity of each batch folder
    pub max_files_per_batch: usize,
    /// Maximum Hamming distance for two images to count as duplicates
    pub similarity_threshold: u32,
    /// Pick up dot-files and descend into dot-directories
    pub include_hidden: bool,
    /// Descend into symlinked directories and sort symlinked files
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Remove the source directory itself once it is empty
    pub remove_empty_source: bool,
}

impl SorterConfig {
    /// Defaults for a mode, with its conventional source and destination
    pub fn for_mode(mode: SortMode) -> Self {
        let (source_dir, dest_dir) = match mode {
            SortMode::Media => ("./source_images", "./sorted_images"),
            SortMode::Documents => ("./source_documents", "./sorted_documents"),
        };

        Self {
            source_dir: PathBuf::from(source_dir),
            dest_dir: PathBuf::from(dest_dir),
            mode,
            max_files_per_batch: DEFAULT_BATCH_CAPACITY,
            similarity_threshold: 0,
            include_hidden: false,
            follow_symlinks: false,
            remove_empty_source: false,
        }
    }

    /// Reject settings that cannot produce a valid run.
    ///
    /// Touches the filesystem only to compare existing paths.
    pub fn validate(&self) -> Result<(), SorterError> {
        if self.max_files_per_batch == 0 {
            return Err(SorterError::Config(
                "max files per batch must be at least 1".to_string(),
            ));
        }

        if self.similarity_threshold > MAX_SIMILARITY_THRESHOLD {
            return Err(SorterError::Config(format!(
                "similarity threshold {} is above the maximum of {}",
                self.similarity_threshold, MAX_SIMILARITY_THRESHOLD
            )));
        }

        if let (Ok(source), Ok(dest)) = (
            fs::canonicalize(&self.source_dir),
            fs::canonicalize(&self.dest_dir),
        ) {
            if source == dest {
                return Err(SorterError::Config(format!(
                    "source and destination are the same directory: {}",
                    source.display()
                )));
            }
        }

        Ok(())
    }
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self::for_mode(SortMode::Media)
    }
}

/// Where in the run a file failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Scan,
    Hash,
    Delete,
    Move,
    Cleanup,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureStage::Scan => write!(f, "scan"),
            FailureStage::Hash => write!(f, "hash"),
            FailureStage::Delete => write!(f, "delete"),
            FailureStage::Move => write!(f, "move"),
            FailureStage::Cleanup => write!(f, "cleanup"),
        }
    }
}

/// A file the run could not handle; it was left where it was
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub stage: FailureStage,
    pub reason: String,
}

impl FileFailure {
    pub fn new(path: &Path, stage: FailureStage, reason: impl ToString) -> Self {
        Self {
            path: path.to_path_buf(),
            stage,
            reason: reason.to_string(),
        }
    }
}

/// Counters for a completed run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Files the scanner picked up
    pub scanned: usize,
    pub duplicates_removed: usize,
    pub unique_kept: usize,
    /// Batch folders that received their first file in this run
    pub batches_created: usize,
    /// Number of entries in `failures`
    pub errors: usize,
    pub junk_removed: usize,
    pub empty_dirs_removed: usize,
    pub failures: Vec<FileFailure>,
}

impl RunStatistics {
    pub fn record_failure(&mut self, failure: FileFailure) {
        self.errors += 1;
        self.failures.push(failure);
    }
}

/// A unique file and where it ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A deleted file and the earlier file it duplicated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedDuplicate {
    pub path: PathBuf,
    pub original: PathBuf,
}

/// Result of pipeline execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub stats: RunStatistics,
    /// Moves in processing order
    pub placements: Vec<Placement>,
    /// Deletions in processing order
    pub duplicates: Vec<RemovedDuplicate>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
