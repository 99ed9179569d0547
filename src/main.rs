//! # batch-sort CLI
//!
//! Command-line interface for the batch sorter.
//!
//! ## Usage
//! ```bash
//! batch-sort media --source ~/Pictures/inbox --dest ~/Pictures/sorted
//! batch-sort documents --max-files 200 --output json
//! ```

mod cli;

use batch_sorter::Result;

fn main() -> Result<()> {
    cli::run()
}
