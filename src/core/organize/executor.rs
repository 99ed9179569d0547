//! Physical file moves and deletions.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Removes a partially written copy unless disarmed.
struct PartialCopy<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> PartialCopy<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialCopy<'_> {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(self.path);
        }
    }
}

/// Moves and deletes source files
pub struct Relocator;

impl Relocator {
    /// Move `source` into `dest_dir`, keeping its file name unless taken.
    ///
    /// Returns the final destination path. On any error the source is left
    /// where it was and no partial copy remains.
    pub fn move_into(source: &Path, dest_dir: &Path) -> io::Result<PathBuf> {
        let file_name = source.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", source.display()),
            )
        })?;

        fs::create_dir_all(dest_dir)?;
        let target = Self::unique_destination(&dest_dir.join(file_name));

        if fs::rename(source, &target).is_ok() {
            return Ok(target);
        }

        // rename fails across filesystems, fall back to copy+delete
        // with size verification before deleting source
        let source_size = fs::metadata(source)?.len();
        let guard = PartialCopy::new(&target);
        fs::copy(source, &target)?;

        let dest_size = fs::metadata(&target)?.len();
        if dest_size != source_size {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "Copy verification failed: source {} bytes, dest {} bytes",
                    source_size, dest_size
                ),
            ));
        }

        fs::remove_file(source)?;
        guard.disarm();
        Ok(target)
    }

    /// Delete a duplicate
    pub fn delete(path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    /// First of `name.ext`, `name_1.ext`, `name_2.ext`, ... that does not exist
    pub fn unique_destination(path: &Path) -> PathBuf {
        if !path.exists() {
            return path.to_path_buf();
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parent = path.parent().unwrap_or(Path::new(""));

        let mut counter = 1;
        loop {
            let new_name = if ext.is_empty() {
                format!("{}_{}", stem, counter)
            } else {
                format!("{}_{}.{}", stem, counter, ext)
            };
            let new_path = parent.join(new_name);
            if !new_path.exists() {
                return new_path;
            }
            counter += 1;
        }
    }
}
