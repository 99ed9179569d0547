//! Directory walking implementation using walkdir.

use super::{filter::ExtensionFilter, FileRecord, ScanResult, SortMode, SourceScanner};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Subtrees never to descend into (the destination, typically)
    pub exclude: Vec<PathBuf>,
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ExtensionFilter,
}

impl WalkDirScanner {
    /// Create a new scanner for a sort mode
    pub fn new(mode: SortMode, config: ScanConfig) -> Self {
        let filter = ExtensionFilter::new(mode).with_hidden(config.include_hidden);
        Self { config, filter }
    }

    /// Resolve the root to an absolute path, failing if it cannot be listed
    fn open_root(root: &Path) -> Result<PathBuf, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let canonical = fs::canonicalize(root).map_err(|e| root_error(root, e))?;
        fs::read_dir(&canonical).map_err(|e| root_error(root, e))?;
        Ok(canonical)
    }

    fn excluded(&self) -> Vec<PathBuf> {
        // A destination that does not exist yet holds nothing to skip
        self.config
            .exclude
            .iter()
            .filter_map(|p| fs::canonicalize(p).ok())
            .collect()
    }
}

fn root_error(root: &Path, error: std::io::Error) -> ScanError {
    match error.kind() {
        ErrorKind::NotFound => ScanError::DirectoryNotFound {
            path: root.to_path_buf(),
        },
        ErrorKind::PermissionDenied => ScanError::PermissionDenied {
            path: root.to_path_buf(),
        },
        _ => ScanError::ReadDirectory {
            path: root.to_path_buf(),
            source: error,
        },
    }
}

impl SourceScanner for WalkDirScanner {
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &crate::events::null_sender())
    }

    fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        let root = Self::open_root(root)?;
        let excluded = self.excluded();

        events.send(Event::Scan(ScanEvent::Started { root: root.clone() }));

        let mut files = Vec::new();
        let mut errors = Vec::new();

        let walker = WalkDir::new(&root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                if excluded.iter().any(|ex| entry.path().starts_with(ex)) {
                    return false;
                }
                !(entry.file_type().is_dir() && self.filter.skips_hidden(entry.path()))
            });

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let Some(kind) = self.filter.classify(entry.path()) else {
                        continue;
                    };

                    match entry.metadata() {
                        Ok(metadata) => {
                            files.push(FileRecord::new(
                                entry.path().to_path_buf(),
                                metadata.len(),
                                kind,
                            ));
                        }
                        Err(e) => {
                            let error = ScanError::ReadDirectory {
                                path: entry.path().to_path_buf(),
                                source: std::io::Error::new(ErrorKind::Other, e.to_string()),
                            };
                            events.send(Event::Scan(ScanEvent::Error {
                                path: entry.path().to_path_buf(),
                                message: error.to_string(),
                            }));
                            errors.push(error);
                        }
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind()) == Some(ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::new(ErrorKind::Other, e.to_string()),
                        }
                    };

                    tracing::warn!(path = %path.display(), "skipping unreadable entry: {}", error);
                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_files: files.len(),
        }));

        Ok(ScanResult { files, errors })
    }
}
