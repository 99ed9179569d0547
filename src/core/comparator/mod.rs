//! # Comparator Module
//!
//! Decides, one file at a time, whether a file duplicates one seen
//! earlier in the run.
//!
//! ## Rules
//! - **Exact fingerprints**: duplicate iff the same bytes were indexed
//!   before. First seen wins.
//! - **Perceptual fingerprints**: duplicate iff an indexed hash is within
//!   the threshold. The closest match wins; equal distances go to the
//!   entry indexed first, which under lexicographic traversal is also
//!   the smallest path.

mod traits;

pub use traits::{ComparisonStrategy, ThresholdStrategy};

use crate::core::hasher::Fingerprint;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Fingerprints seen so far in the run. Never shrinks; never persisted.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    exact: HashMap<Vec<u8>, PathBuf>,
    /// Insertion order is significant for tie-breaks
    perceptual: Vec<(Fingerprint, PathBuf)>,
}

impl DuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.perceptual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, fingerprint: &Fingerprint, strategy: &dyn ComparisonStrategy) -> Option<&Path> {
        match fingerprint {
            Fingerprint::Exact(bytes) => self.exact.get(bytes).map(PathBuf::as_path),
            Fingerprint::Perceptual(_) => {
                let mut best: Option<(u32, &Path)> = None;
                for (existing, path) in &self.perceptual {
                    let Some(distance) = fingerprint.distance(existing) else {
                        continue;
                    };
                    if !strategy.is_duplicate(distance) {
                        continue;
                    }
                    // Strictly closer only, so earlier entries keep ties
                    if best.map_or(true, |(d, _)| distance < d) {
                        best = Some((distance, path.as_path()));
                    }
                }
                best.map(|(_, path)| path)
            }
        }
    }

    fn insert(&mut self, fingerprint: Fingerprint, path: PathBuf) {
        match fingerprint {
            Fingerprint::Exact(bytes) => {
                self.exact.entry(bytes).or_insert(path);
            }
            perceptual @ Fingerprint::Perceptual(_) => {
                self.perceptual.push((perceptual, path));
            }
        }
    }
}

/// Stateful duplicate detector for a single run
pub struct DuplicateDetector {
    index: DuplicateIndex,
    strategy: Box<dyn ComparisonStrategy>,
}

impl DuplicateDetector {
    /// Create a detector with a perceptual similarity threshold
    pub fn new(threshold: u32) -> Self {
        Self::with_strategy(Box::new(ThresholdStrategy::new(threshold)))
    }

    pub fn with_strategy(strategy: Box<dyn ComparisonStrategy>) -> Self {
        Self {
            index: DuplicateIndex::new(),
            strategy,
        }
    }

    /// Check a file against everything seen so far.
    ///
    /// Returns the path of the earlier file it duplicates, or `None` after
    /// recording it as the first of its kind.
    pub fn check(&mut self, path: &Path, fingerprint: &Fingerprint) -> Option<PathBuf> {
        if let Some(original) = self.index.lookup(fingerprint, self.strategy.as_ref()) {
            return Some(original.to_path_buf());
        }
        self.index.insert(fingerprint.clone(), path.to_path_buf());
        None
    }

    /// Whether the file duplicates an earlier one (records it if not)
    pub fn is_duplicate(&mut self, path: &Path, fingerprint: &Fingerprint) -> bool {
        self.check(path, fingerprint).is_some()
    }

    /// Number of distinct fingerprints kept
    pub fn unique_count(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(bytes: &[u8]) -> Fingerprint {
        Fingerprint::Exact(bytes.to_vec())
    }

    fn perceptual(byte: u8) -> Fingerprint {
        Fingerprint::Perceptual(vec![byte])
    }

    #[test]
    fn first_seen_exact_wins() {
        let mut detector = DuplicateDetector::new(0);

        assert_eq!(detector.check(Path::new("/a.txt"), &exact(b"x")), None);
        assert_eq!(
            detector.check(Path::new("/b.txt"), &exact(b"x")),
            Some(PathBuf::from("/a.txt"))
        );
        assert_eq!(
            detector.check(Path::new("/c.txt"), &exact(b"x")),
            Some(PathBuf::from("/a.txt"))
        );
        assert_eq!(detector.unique_count(), 1);
    }

    #[test]
    fn distinct_exact_hashes_are_unique() {
        let mut detector = DuplicateDetector::new(64);

        assert!(!detector.is_duplicate(Path::new("/a.txt"), &exact(b"x")));
        assert!(!detector.is_duplicate(Path::new("/b.txt"), &exact(b"y")));
        assert_eq!(detector.unique_count(), 2);
    }

    #[test]
    fn perceptual_within_threshold_is_duplicate() {
        let mut detector = DuplicateDetector::new(2);

        assert!(!detector.is_duplicate(Path::new("/a.jpg"), &perceptual(0b0000_0000)));
        assert!(detector.is_duplicate(Path::new("/b.jpg"), &perceptual(0b0000_0011)));
        assert!(!detector.is_duplicate(Path::new("/c.jpg"), &perceptual(0b0000_0111)));
    }

    #[test]
    fn closest_perceptual_match_wins() {
        let mut detector = DuplicateDetector::new(2);
        detector.check(Path::new("/a.jpg"), &perceptual(0b0000_0000));
        // Three bits from a, so kept
        assert_eq!(detector.check(Path::new("/b.jpg"), &perceptual(0b0000_0111)), None);

        // One bit from b, two bits from a
        assert_eq!(
            detector.check(Path::new("/c.jpg"), &perceptual(0b0000_0110)),
            Some(PathBuf::from("/b.jpg"))
        );
    }

    #[test]
    fn equal_distance_goes_to_earliest_entry() {
        let mut detector = DuplicateDetector::new(1);
        detector.check(Path::new("/a.jpg"), &perceptual(0b0000_0001));
        detector.check(Path::new("/b.jpg"), &perceptual(0b0000_0100));

        // One bit from each
        assert_eq!(
            detector.check(Path::new("/c.jpg"), &perceptual(0b0000_0101)),
            Some(PathBuf::from("/a.jpg"))
        );
    }

    #[test]
    fn perceptual_and_exact_never_match() {
        let mut detector = DuplicateDetector::new(64);
        detector.check(Path::new("/a.jpg"), &perceptual(0xAB));

        assert!(!detector.is_duplicate(Path::new("/b.mp4"), &exact(&[0xAB])));
    }
}
