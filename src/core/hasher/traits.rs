//! Trait definitions and the fingerprint type.

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identity of a file's content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fingerprint {
    /// Any difference in (normalized) content changes the hash
    Exact(Vec<u8>),
    /// Similar images produce hashes a small Hamming distance apart
    Perceptual(Vec<u8>),
}

impl Fingerprint {
    /// Raw hash bytes
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Fingerprint::Exact(bytes) | Fingerprint::Perceptual(bytes) => bytes,
        }
    }

    pub fn is_perceptual(&self) -> bool {
        matches!(self, Fingerprint::Perceptual(_))
    }

    /// Hamming distance between two perceptual hashes.
    ///
    /// `None` unless both sides are perceptual hashes of the same width.
    pub fn distance(&self, other: &Fingerprint) -> Option<u32> {
        match (self, other) {
            (Fingerprint::Perceptual(a), Fingerprint::Perceptual(b)) if a.len() == b.len() => Some(
                a.iter()
                    .zip(b.iter())
                    .map(|(x, y)| (x ^ y).count_ones())
                    .sum(),
            ),
            _ => None,
        }
    }

    /// Hash as a lowercase hexadecimal string
    pub fn to_hex(&self) -> String {
        self.as_bytes().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fingerprint::Exact(_) => write!(f, "exact:{}", self.to_hex()),
            Fingerprint::Perceptual(_) => write!(f, "perceptual:{}", self.to_hex()),
        }
    }
}

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithmKind {
    /// Mean hash over an 8x8 grayscale thumbnail (images)
    Average,
    /// xxh3 over size plus head and tail samples (videos)
    Sampled,
    /// BLAKE3 over normalized text or raw bytes (documents)
    Content,
}

impl std::fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithmKind::Average => write!(f, "aHash"),
            HashAlgorithmKind::Sampled => write!(f, "xxh3-sampled"),
            HashAlgorithmKind::Content => write!(f, "blake3"),
        }
    }
}

/// Trait for hash algorithm implementations
pub trait HashAlgorithm {
    /// Compute a fingerprint from a file path
    fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError>;

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}
