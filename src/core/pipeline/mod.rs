//! # Pipeline Module
//!
//! Orchestrates a full sorting run.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Discover files in the source tree, in path order
//! 2. **Process** - Per file: fingerprint, dedupe, categorize, allocate, move
//! 3. **Cleanup** - Remove junk files and empty source directories
//!
//! Files are processed one at a time, so the first file in path order is
//! always the one that survives a duplicate set.

mod executor;
mod types;

pub use executor::{Pipeline, PipelineBuilder};
pub use types::*;
