//! Trait definitions for similarity strategies.

/// Strategy trait for deciding whether two perceptual hashes match
pub trait ComparisonStrategy {
    /// Whether two files this far apart are duplicates
    fn is_duplicate(&self, distance: u32) -> bool;

    /// Get the threshold used
    fn threshold(&self) -> u32;
}

/// Simple threshold-based comparison strategy
#[derive(Debug, Clone)]
pub struct ThresholdStrategy {
    /// Maximum distance (inclusive) to consider as duplicate
    threshold: u32,
}

impl ThresholdStrategy {
    /// Create a new threshold strategy
    ///
    /// - 0: only identical hashes match (default)
    /// - 5: catches recompressed and resized copies
    /// - 10: permissive, risks false positives on 64-bit hashes
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Only identical perceptual hashes match
    pub fn exact() -> Self {
        Self::new(0)
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self::exact()
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn is_duplicate(&self, distance: u32) -> bool {
        distance <= self.threshold
    }

    fn threshold(&self) -> u32 {
        self.threshold
    }
}
