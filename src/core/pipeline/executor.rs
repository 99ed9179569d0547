//! Pipeline execution implementation.

use super::types::{
    FailureStage, FileFailure, Placement, PipelineResult, RemovedDuplicate, RunStatistics,
    SorterConfig,
};
use crate::core::categorize;
use crate::core::comparator::DuplicateDetector;
use crate::core::hasher::{FileHasher, FingerprintProvider};
use crate::core::organize::{BatchAllocator, BatchKey, Relocator, SourceCleaner};
use crate::core::scanner::{FileRecord, ScanConfig, SortMode, SourceScanner, WalkDirScanner};
use crate::error::SorterError;
use crate::events::{
    null_sender, CleanupEvent, Event, EventSender, FileOutcome, PipelineEvent, PipelinePhase,
    ProcessEvent, ProcessProgress,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: SorterConfig,
    hasher: Option<Box<dyn FingerprintProvider>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: SorterConfig::default(),
            hasher: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: SorterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the directory to sort
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.source_dir = path.into();
        self
    }

    /// Set the destination root
    pub fn destination(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dest_dir = path.into();
        self
    }

    /// Set the sort mode
    pub fn mode(mut self, mode: SortMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the batch folder capacity
    pub fn max_files_per_batch(mut self, max: usize) -> Self {
        self.config.max_files_per_batch = max;
        self
    }

    /// Set the image similarity threshold
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.include_hidden = include;
        self
    }

    /// Follow symbolic links while scanning
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.follow_symlinks = follow;
        self
    }

    /// Remove the source root too once it is empty
    pub fn remove_empty_source(mut self, remove: bool) -> Self {
        self.config.remove_empty_source = remove;
        self
    }

    /// Set the fingerprint provider
    pub fn hasher(mut self, hasher: Box<dyn FingerprintProvider>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
            hasher: self.hasher.unwrap_or_else(|| Box::new(FileHasher::new())),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to a file that was handled without error
enum Disposition {
    Moved(PathBuf),
    Duplicate(PathBuf),
}

/// Mutable state threaded through the per-file loop
struct RunState {
    detector: DuplicateDetector,
    allocator: BatchAllocator,
}

/// The scan, dedupe and batch pipeline
pub struct Pipeline {
    config: SorterConfig,
    hasher: Box<dyn FingerprintProvider>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &SorterConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, SorterError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Only an invalid configuration or an unusable source root is an
    /// error. Every per-file problem is recorded in the statistics and the
    /// file is left where it was.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, SorterError> {
        let start_time = Instant::now();

        self.config.validate()?;

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = WalkDirScanner::new(
            self.config.mode,
            ScanConfig {
                follow_symlinks: self.config.follow_symlinks,
                include_hidden: self.config.include_hidden,
                exclude: vec![self.config.dest_dir.clone()],
            },
        );

        let scan_result = match scanner.scan_with_events(&self.config.source_dir, events) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(source = %self.config.source_dir.display(), "{}", e);
                events.send(Event::Pipeline(PipelineEvent::Error {
                    message: e.to_string(),
                }));
                return Err(e.into());
            }
        };

        let mut stats = RunStatistics {
            scanned: scan_result.files.len(),
            ..RunStatistics::default()
        };
        for error in &scan_result.errors {
            stats.record_failure(FileFailure::new(error.path(), FailureStage::Scan, error));
        }

        tracing::info!(
            mode = %self.config.mode,
            files = stats.scanned,
            "scan complete"
        );

        // Phase 2: Hash, dedupe, move
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Processing,
        }));

        let total = scan_result.files.len();
        events.send(Event::Process(ProcessEvent::Started { total_files: total }));

        let mut state = RunState {
            detector: DuplicateDetector::new(self.config.similarity_threshold),
            allocator: BatchAllocator::new(
                self.config.dest_dir.clone(),
                self.config.max_files_per_batch,
            ),
        };
        let mut placements = Vec::new();
        let mut duplicates = Vec::new();

        for (i, mut record) in scan_result.files.into_iter().enumerate() {
            let outcome = match self.process_file(&mut record, &mut state, events) {
                Ok(Disposition::Moved(destination)) => {
                    stats.unique_kept += 1;
                    placements.push(Placement {
                        source: record.path.clone(),
                        destination,
                    });
                    FileOutcome::Moved
                }
                Ok(Disposition::Duplicate(original)) => {
                    stats.duplicates_removed += 1;
                    duplicates.push(RemovedDuplicate {
                        path: record.path.clone(),
                        original,
                    });
                    FileOutcome::Duplicate
                }
                Err(failure) => {
                    tracing::warn!(
                        path = %failure.path.display(),
                        stage = %failure.stage,
                        "{}",
                        failure.reason
                    );
                    stats.record_failure(failure);
                    FileOutcome::Failed
                }
            };

            events.send(Event::Process(ProcessEvent::Progress(ProcessProgress {
                completed: i + 1,
                total,
                current_path: record.path,
                outcome,
            })));
        }

        stats.batches_created = state.allocator.batches_created();

        events.send(Event::Process(ProcessEvent::Completed {
            unique: stats.unique_kept,
            duplicates: stats.duplicates_removed,
            failed: stats.errors,
        }));

        tracing::info!(
            unique = stats.unique_kept,
            duplicates = stats.duplicates_removed,
            batches = stats.batches_created,
            errors = stats.errors,
            "processing complete"
        );

        // Phase 3: Cleanup
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Cleanup,
        }));

        let report = SourceCleaner::new(&self.config.source_dir)
            .exclude(vec![self.config.dest_dir.clone()])
            .remove_root(self.config.remove_empty_source)
            .run();

        stats.junk_removed = report.junk_removed;
        stats.empty_dirs_removed = report.empty_dirs_removed;
        for (path, reason) in report.errors {
            tracing::warn!(path = %path.display(), "cleanup failed: {}", reason);
            stats.record_failure(FileFailure::new(&path, FailureStage::Cleanup, reason));
        }

        events.send(Event::Cleanup(CleanupEvent::Completed {
            junk_removed: stats.junk_removed,
            empty_dirs_removed: stats.empty_dirs_removed,
        }));

        let duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Pipeline(PipelineEvent::Completed { duration_ms }));

        Ok(PipelineResult {
            stats,
            placements,
            duplicates,
            duration_ms,
        })
    }

    /// Take one file from discovered to moved, deleted or failed
    fn process_file(
        &self,
        record: &mut FileRecord,
        state: &mut RunState,
        events: &EventSender,
    ) -> Result<Disposition, FileFailure> {
        let fingerprint = self
            .hasher
            .fingerprint(record)
            .map_err(|e| FileFailure::new(&record.path, FailureStage::Hash, e))?;
        let fingerprint = record.fingerprint.insert(fingerprint);

        if let Some(original) = state.detector.check(&record.path, fingerprint) {
            Relocator::delete(&record.path)
                .map_err(|e| FileFailure::new(&record.path, FailureStage::Delete, e))?;
            tracing::debug!(
                path = %record.path.display(),
                original = %original.display(),
                "removed duplicate"
            );
            return Ok(Disposition::Duplicate(original));
        }

        let key = self.batch_key(&record.path);
        let folder = state
            .allocator
            .allocate(key)
            .map_err(|e| FileFailure::new(&record.path, FailureStage::Move, e))?;
        let destination = Relocator::move_into(&record.path, &folder.path)
            .map_err(|e| FileFailure::new(&record.path, FailureStage::Move, e))?;

        if state.allocator.commit(key) {
            tracing::info!(folder = %folder.path.display(), "opened batch folder");
            events.send(Event::Process(ProcessEvent::BatchOpened {
                path: folder.path.clone(),
            }));
        }

        tracing::debug!(
            path = %record.path.display(),
            destination = %destination.display(),
            "moved"
        );
        Ok(Disposition::Moved(destination))
    }

    fn batch_key(&self, path: &Path) -> BatchKey {
        match self.config.mode {
            SortMode::Media => BatchKey::Root,
            SortMode::Documents => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                BatchKey::Category(categorize::category(ext))
            }
        }
    }
}
