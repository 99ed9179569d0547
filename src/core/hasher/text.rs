//! Text extraction and character set decoding for documents.
//!
//! Both capabilities are traits so the document hasher can be fed
//! stubs in tests.

use crate::error::HashError;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::panic;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Pulls plain text out of a binary document format
pub trait TextExtractor {
    fn extract(&self, path: &Path, bytes: &[u8]) -> Result<String, HashError>;
}

/// Turns raw bytes into text, picking a character set
pub trait TextDecoder {
    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<String, HashError>;
}

/// PDF text extraction using pdf-extract
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path, bytes: &[u8]) -> Result<String, HashError> {
        // pdf-extract panics on some malformed documents instead of erroring
        let outcome = catch_quietly(|| pdf_extract::extract_text_from_mem(bytes));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(HashError::DecodeError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
            Err(_) => Err(HashError::DecodeError {
                path: path.to_path_buf(),
                reason: "PDF parser aborted on malformed input".to_string(),
            }),
        }
    }
}

/// Serializes hook swaps so concurrent callers restore the right one
static PANIC_HOOK: Mutex<()> = Mutex::new(());

/// Run `f`, turning a panic into `Err` without the default hook printing
/// it to stderr.
///
/// The hook is process-wide: a panic on another thread while `f` runs is
/// silenced as well.
fn catch_quietly<F, R>(f: F) -> std::thread::Result<R>
where
    F: FnOnce() -> R + panic::UnwindSafe,
{
    let _lock = PANIC_HOOK.lock().unwrap_or_else(PoisonError::into_inner);
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let outcome = panic::catch_unwind(f);
    panic::set_hook(previous);
    outcome
}

/// Character set detection with fallbacks.
///
/// Candidates in order: byte order mark, chardetng's guess, UTF-8,
/// windows-1252. A candidate is accepted only if it decodes without
/// malformed sequences and produces no NUL characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharsetDecoder;

impl CharsetDecoder {
    fn candidates(bytes: &[u8]) -> (Vec<&'static Encoding>, usize) {
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            return (vec![encoding], bom_len);
        }

        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        let guessed = detector.guess(None, true);

        let mut candidates = vec![guessed];
        for fallback in [UTF_8, WINDOWS_1252] {
            if !candidates.contains(&fallback) {
                candidates.push(fallback);
            }
        }
        (candidates, 0)
    }
}

impl TextDecoder for CharsetDecoder {
    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<String, HashError> {
        let (candidates, skip) = Self::candidates(bytes);
        let body = &bytes[skip..];

        for encoding in candidates {
            let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(body)
            else {
                tracing::trace!(path = %path.display(), encoding = encoding.name(), "rejected");
                continue;
            };

            if !text.contains('\0') {
                return Ok(Cow::into_owned(text));
            }
        }

        Err(HashError::EncodingError {
            path: path.to_path_buf(),
        })
    }
}

/// Drop all whitespace and lower-case, so reflowed copies hash the same
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .flat_map(|word| word.chars())
        .flat_map(char::to_lowercase)
        .collect()
}
