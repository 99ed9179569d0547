//! File organization module.
//!
//! Places unique files into numbered batch folders, deletes duplicates and
//! tidies the source tree afterwards.

mod allocator;
mod cleanup;
mod executor;
mod types;

pub use allocator::BatchAllocator;
pub use cleanup::{is_junk, CleanupReport, SourceCleaner};
pub use executor::Relocator;
pub use types::*;
