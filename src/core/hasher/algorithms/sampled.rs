//! Sampled content hash for large media.
//!
//! Videos are not decoded. The hash covers the file size and either the
//! whole file (up to two chunks long) or its first and last chunk.

use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::error::HashError;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

/// Bytes read from each end of a large file (1MB)
const CHUNK_SIZE: u64 = 1024 * 1024;

/// xxh3-128 over size, head and tail
pub struct SampledHasher {
    chunk_size: u64,
}

impl SampledHasher {
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Override the sample size (tests use tiny chunks)
    pub fn with_chunk_size(chunk_size: u64) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    fn digest(&self, path: &Path) -> std::io::Result<u128> {
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();

        let mut hasher = Xxh3::new();
        hasher.update(&size.to_le_bytes());

        if size > self.chunk_size * 2 {
            let mut buffer = vec![0u8; self.chunk_size as usize];
            file.read_exact(&mut buffer)?;
            hasher.update(&buffer);

            file.seek(SeekFrom::End(-(self.chunk_size as i64)))?;
            file.read_exact(&mut buffer)?;
            hasher.update(&buffer);
        } else {
            let mut buffer = Vec::with_capacity(size as usize);
            file.read_to_end(&mut buffer)?;
            hasher.update(&buffer);
        }

        Ok(hasher.digest128())
    }
}

impl Default for SampledHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl HashAlgorithm for SampledHasher {
    fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let digest = self.digest(path).map_err(|e| HashError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Fingerprint::Exact(digest.to_be_bytes().to_vec()))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Sampled
    }
}
