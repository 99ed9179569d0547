//! Hash algorithm implementations.

mod average;
mod content;
mod sampled;

pub use average::AverageHasher;
pub use content::ContentHasher;
pub use sampled::SampledHasher;
