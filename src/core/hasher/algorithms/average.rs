//! Average Hash (aHash) implementation.
//!
//! aHash works by:
//! 1. Resizing the image to hash_size x hash_size
//! 2. Converting to grayscale
//! 3. Computing the mean brightness
//! 4. For each pixel: if brighter than the mean, set bit to 1, else 0
//!
//! Recompressed or slightly resized copies land within a few bits of
//! each other.

use super::super::fast_decode::FastDecoder;
use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::error::HashError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig};
use std::path::Path;

/// Average Hash (aHash) implementation
pub struct AverageHasher {
    hasher: image_hasher::Hasher,
}

impl AverageHasher {
    /// Create a new aHash hasher producing `hash_size * hash_size` bits
    pub fn new(hash_size: u32) -> Self {
        let hasher = HasherConfig::new()
            .hash_size(hash_size, hash_size)
            .hash_alg(HashAlg::Mean)
            .to_hasher();

        Self { hasher }
    }

    /// Hash an already-decoded image
    pub fn hash_image(&self, image: &DynamicImage) -> Fingerprint {
        let hash = self.hasher.hash_image(image);
        Fingerprint::Perceptual(hash.as_bytes().to_vec())
    }
}

impl Default for AverageHasher {
    fn default() -> Self {
        Self::new(8)
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let image = FastDecoder::decode(path)?;
        Ok(self.hash_image(&image))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}
