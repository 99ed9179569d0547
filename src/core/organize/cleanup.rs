//! Post-run cleanup of the source tree.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// OS metadata files that should not keep a directory alive
const JUNK_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// What cleanup removed
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub junk_removed: usize,
    pub empty_dirs_removed: usize,
    /// Paths that could not be removed, with the reason
    pub errors: Vec<(PathBuf, String)>,
}

/// Removes junk files, then empty directories bottom-up.
pub struct SourceCleaner<'a> {
    root: &'a Path,
    exclude: Vec<PathBuf>,
    remove_root: bool,
}

impl<'a> SourceCleaner<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self {
            root,
            exclude: Vec::new(),
            remove_root: false,
        }
    }

    /// Subtrees to leave untouched (the destination, when nested)
    pub fn exclude(mut self, paths: Vec<PathBuf>) -> Self {
        self.exclude = paths.iter().filter_map(|p| fs::canonicalize(p).ok()).collect();
        self
    }

    /// Also remove the root once it is empty
    pub fn remove_root(mut self, remove: bool) -> Self {
        self.remove_root = remove;
        self
    }

    pub fn run(&self) -> CleanupReport {
        let mut report = CleanupReport::default();

        let Ok(root) = fs::canonicalize(self.root) else {
            return report;
        };

        let walker = WalkDir::new(&root)
            .contents_first(true)
            .into_iter()
            .filter_entry(|e| !self.exclude.iter().any(|ex| e.path().starts_with(ex)));

        for entry in walker.filter_map(Result::ok) {
            let path = entry.path();

            if entry.file_type().is_file() {
                if is_junk(path) {
                    match fs::remove_file(path) {
                        Ok(()) => report.junk_removed += 1,
                        Err(e) => report.errors.push((path.to_path_buf(), e.to_string())),
                    }
                }
                continue;
            }

            if !entry.file_type().is_dir() {
                continue;
            }
            if entry.depth() == 0 && !self.remove_root {
                continue;
            }
            if !is_empty_dir(path) {
                continue;
            }

            match fs::remove_dir(path) {
                Ok(()) => {
                    tracing::debug!(dir = %path.display(), "removed empty directory");
                    report.empty_dirs_removed += 1;
                }
                Err(e) => report.errors.push((path.to_path_buf(), e.to_string())),
            }
        }

        report
    }
}

/// OS metadata file such as `.DS_Store`
pub fn is_junk(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| JUNK_FILES.contains(&name))
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
