//! # Core Module
//!
//! The UI-agnostic sorting engine.
//!
//! ## Modules
//! - `scanner` - Discovers media or document files in the source tree
//! - `hasher` - Computes perceptual and exact fingerprints
//! - `comparator` - Decides whether a file duplicates an earlier one
//! - `categorize` - Maps document extensions to category folders
//! - `organize` - Batch allocation, moves, deletions and source cleanup
//! - `pipeline` - Orchestrates the full workflow

pub mod categorize;
pub mod comparator;
pub mod hasher;
pub mod organize;
pub mod pipeline;
pub mod scanner;

// Re-export commonly used types
pub use categorize::Category;
pub use comparator::DuplicateDetector;
pub use hasher::{Fingerprint, HashAlgorithmKind};
pub use organize::BatchFolder;
pub use pipeline::{Pipeline, PipelineResult, RunStatistics, SorterConfig};
pub use scanner::{FileRecord, MediaKind, SortMode};
