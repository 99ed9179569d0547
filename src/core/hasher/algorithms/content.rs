//! Normalized content hash for documents.
//!
//! - PDF: extracted text, normalized (raw bytes when it has no text layer)
//! - Office/archive formats: raw bytes
//! - Text formats: decoded text, normalized

use super::super::text::{normalize, CharsetDecoder, PdfTextExtractor, TextDecoder, TextExtractor};
use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::core::scanner::extension_of;
use crate::error::HashError;
use std::fs;
use std::path::Path;

/// Formats hashed byte-for-byte
const BINARY_EXTENSIONS: &[&str] = &[
    "doc", "docx", "odt", "pages", "rtf", "xls", "xlsx", "xlsm", "ods", "numbers", "ppt", "pptx",
    "key", "keynote", "odp", "zip", "rar", "7z", "tar", "gz", "bz2",
];

/// BLAKE3 over normalized document content
pub struct ContentHasher {
    extractor: Box<dyn TextExtractor>,
    decoder: Box<dyn TextDecoder>,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self {
            extractor: Box::new(PdfTextExtractor),
            decoder: Box::new(CharsetDecoder),
        }
    }

    /// Replace the PDF text extractor
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replace the character set decoder
    pub fn with_decoder(mut self, decoder: Box<dyn TextDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    fn hash_text(path: &Path, text: &str) -> Result<Fingerprint, HashError> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Err(HashError::EmptyContent {
                path: path.to_path_buf(),
            });
        }
        Ok(Self::hash_bytes(normalized.as_bytes()))
    }

    fn hash_bytes(bytes: &[u8]) -> Fingerprint {
        Fingerprint::Exact(blake3::hash(bytes).as_bytes().to_vec())
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl HashAlgorithm for ContentHasher {
    fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let bytes = fs::read(path).map_err(|e| HashError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        if bytes.is_empty() {
            return Err(HashError::EmptyContent {
                path: path.to_path_buf(),
            });
        }

        let ext = extension_of(path);

        if ext == "pdf" {
            let text = self.extractor.extract(path, &bytes)?;
            // Scanned PDFs without a text layer fall back to their bytes
            return if normalize(&text).is_empty() {
                Ok(Self::hash_bytes(&bytes))
            } else {
                Self::hash_text(path, &text)
            };
        }

        if BINARY_EXTENSIONS.contains(&ext.as_str()) {
            return Ok(Self::hash_bytes(&bytes));
        }

        let text = self.decoder.decode(path, &bytes)?;
        Self::hash_text(path, &text)
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Content
    }
}
