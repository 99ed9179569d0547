//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the sorting pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Scanning phase events
    Scan(ScanEvent),
    /// Per-file processing events
    Process(ProcessEvent),
    /// Cleanup phase events
    Cleanup(CleanupEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { root: PathBuf },
    /// An entry below the root could not be read; scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_files: usize },
}

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOutcome {
    /// Moved into a batch folder
    Moved,
    /// Deleted as a duplicate of an earlier file
    Duplicate,
    /// Left in place after an error
    Failed,
}

/// Events while files are hashed, deduplicated and moved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProcessEvent {
    /// Processing has started
    Started { total_files: usize },
    /// A file reached a terminal state
    Progress(ProcessProgress),
    /// A new batch folder was opened
    BatchOpened { path: PathBuf },
    /// Processing completed
    Completed { unique: usize, duplicates: usize, failed: usize },
}

/// Progress information during processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessProgress {
    /// Number of files processed so far
    pub completed: usize,
    /// Total number of files to process
    pub total: usize,
    /// File that was just processed
    pub current_path: PathBuf,
    /// Its outcome
    pub outcome: FileOutcome,
}

/// Events during source cleanup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CleanupEvent {
    /// Cleanup completed
    Completed {
        junk_removed: usize,
        empty_dirs_removed: usize,
    },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed
    Completed { duration_ms: u64 },
    /// Pipeline hit a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Processing,
    Cleanup,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Processing => write!(f, "Processing"),
            PipelinePhase::Cleanup => write!(f, "Cleaning up"),
        }
    }
}
