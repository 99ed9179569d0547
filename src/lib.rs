//! # Batch Sorter
//!
//! Deduplicates a folder of media or documents and moves the survivors into
//! numbered batch folders of bounded size.
//!
//! ## Behaviour
//! - **First seen wins** - files are visited in path order and the earliest
//!   copy of a duplicate set is the one kept
//! - **Per-file failures stay per-file** - a file that cannot be hashed or
//!   moved is left where it was and reported
//! - **Never overfill** - no batch folder exceeds its capacity, across runs
//!
//! ## Architecture
//! - `core` - The sorting engine
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, SorterError};

/// Initialize tracing for the library
///
/// Called by the application entry point. `RUST_LOG` takes precedence;
/// otherwise `verbose` selects `debug` over `warn`. Logs go to stderr so
/// JSON output on stdout stays clean.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // A subscriber may already be installed (tests, embedding apps)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
