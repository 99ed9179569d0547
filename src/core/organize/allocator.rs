//! Assigns unique files to capacity-bounded batch folders.

use super::types::{parse_batch_index, BatchFolder, BatchKey};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

struct Slot {
    folder: BatchFolder,
    /// Folder did not exist before this run
    opened_this_run: bool,
}

/// Keeps one current batch folder per key.
///
/// Folders only ever gain files. When the current one is full the next
/// index is opened. On first use of a key the highest existing
/// `batch_NNNN` folder on disk is resumed with its current file count.
pub struct BatchAllocator {
    dest_root: PathBuf,
    capacity: usize,
    slots: HashMap<BatchKey, Slot>,
    batches_created: usize,
}

impl BatchAllocator {
    pub fn new(dest_root: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            dest_root: dest_root.into(),
            capacity,
            slots: HashMap::new(),
            batches_created: 0,
        }
    }

    /// Folder the next file for `key` should go into
    pub fn allocate(&mut self, key: BatchKey) -> io::Result<BatchFolder> {
        let slot = match self.slots.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let parent = key.parent_dir(&self.dest_root);
                entry.insert(resume(&parent, self.capacity)?)
            }
        };

        if slot.folder.is_full() {
            let parent = key.parent_dir(&self.dest_root);
            slot.folder = BatchFolder::new(&parent, slot.folder.index + 1, 0, self.capacity);
            slot.opened_this_run = true;
        }

        Ok(slot.folder.clone())
    }

    /// Record a file as placed in the current folder for `key`.
    ///
    /// Returns true when this was the first file of a folder opened in
    /// this run.
    pub fn commit(&mut self, key: BatchKey) -> bool {
        let Some(slot) = self.slots.get_mut(&key) else {
            return false;
        };

        slot.folder.count += 1;
        let opened = slot.opened_this_run && slot.folder.count == 1;
        if opened {
            self.batches_created += 1;
        }
        opened
    }

    /// Folders that received their first file during this run
    pub fn batches_created(&self) -> usize {
        self.batches_created
    }
}

/// Pick up where an earlier run left off, or start at `batch_0001`
fn resume(parent: &Path, capacity: usize) -> io::Result<Slot> {
    let highest = match fs::read_dir(parent) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|e| {
                let index = parse_batch_index(&e.file_name().to_string_lossy())?;
                Some((index, e.path()))
            })
            .max_by_key(|(index, _)| *index),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    let Some((index, path)) = highest else {
        return Ok(Slot {
            folder: BatchFolder::new(parent, 1, 0, capacity),
            opened_this_run: true,
        });
    };

    // Keep the on-disk name, older folders may use narrower padding
    let count = fs::read_dir(&path)?
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .count();

    tracing::debug!(folder = %path.display(), count, "resuming batch folder");

    Ok(Slot {
        folder: BatchFolder {
            index,
            path,
            count,
            capacity,
        },
        opened_this_run: false,
    })
}
