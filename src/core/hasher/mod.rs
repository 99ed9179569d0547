//! # Hasher Module
//!
//! Computes the fingerprint a file is deduplicated by.
//!
//! ## Algorithms
//! - **Images**: aHash (8x8 mean hash), compared by Hamming distance
//! - **Videos**: xxh3-128 over size plus head and tail samples
//! - **Documents**: BLAKE3 over normalized text, or raw bytes for
//!   office and archive formats
//! - **Text in media mode**: same as documents
//!
//! HEIC/HEIF images that cannot be decoded on this platform fall back to
//! the sampled exact hash, so identical copies are still caught.
//!
//! ## Example
//! ```rust,ignore
//! use batch_sorter::core::hasher::{FileHasher, FingerprintProvider};
//!
//! let hasher = FileHasher::new();
//! let fingerprint = hasher.fingerprint(&record)?;
//! ```

mod algorithms;
pub mod fast_decode;
pub mod text;
mod traits;

pub use algorithms::{AverageHasher, ContentHasher, SampledHasher};
pub use text::{CharsetDecoder, PdfTextExtractor, TextDecoder, TextExtractor};
pub use traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};

use crate::core::categorize;
use crate::core::scanner::{
    FileRecord, MediaKind, IMAGE_EXTENSIONS, TEXT_EXTENSIONS, VIDEO_EXTENSIONS,
};
use fast_decode::FastDecoder;
use crate::error::HashError;

/// Computes fingerprints for discovered files
pub trait FingerprintProvider {
    fn fingerprint(&self, record: &FileRecord) -> Result<Fingerprint, HashError>;
}

/// Dispatches each file to the algorithm for its kind
pub struct FileHasher {
    image: AverageHasher,
    video: SampledHasher,
    document: ContentHasher,
}

impl FileHasher {
    pub fn new() -> Self {
        Self {
            image: AverageHasher::default(),
            video: SampledHasher::new(),
            document: ContentHasher::new(),
        }
    }

    /// Replace the document hasher (e.g. with stubbed text capabilities)
    pub fn with_document_hasher(mut self, document: ContentHasher) -> Self {
        self.document = document;
        self
    }

    fn algorithm_for(&self, record: &FileRecord) -> Result<&dyn HashAlgorithm, HashError> {
        let ext = record.extension();
        let supported = match record.kind {
            MediaKind::Image => IMAGE_EXTENSIONS.contains(&ext.as_str()),
            MediaKind::Video => VIDEO_EXTENSIONS.contains(&ext.as_str()),
            MediaKind::Text => TEXT_EXTENSIONS.contains(&ext.as_str()),
            MediaKind::Document => categorize::is_document_extension(&ext),
        };

        if !supported {
            return Err(HashError::UnsupportedFormat {
                format: if ext.is_empty() { "(none)".to_string() } else { ext },
            });
        }

        let algorithm: &dyn HashAlgorithm = match record.kind {
            MediaKind::Image => &self.image,
            MediaKind::Video => &self.video,
            MediaKind::Text | MediaKind::Document => &self.document,
        };
        Ok(algorithm)
    }
}

impl Default for FileHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintProvider for FileHasher {
    fn fingerprint(&self, record: &FileRecord) -> Result<Fingerprint, HashError> {
        let algorithm = self.algorithm_for(record)?;
        let fingerprint = match algorithm.hash_file(&record.path) {
            Err(HashError::DecodeError { reason, .. })
                if record.kind == MediaKind::Image && FastDecoder::is_heic(&record.path) =>
            {
                tracing::debug!(
                    path = %record.path.display(),
                    %reason,
                    "HEIC not decodable, using exact hash"
                );
                self.video.hash_file(&record.path)?
            }
            result => result?,
        };
        tracing::trace!(
            path = %record.path.display(),
            algorithm = %algorithm.kind(),
            %fingerprint,
            "hashed"
        );
        Ok(fingerprint)
    }
}
