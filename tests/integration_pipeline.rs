//! Integration tests for the pipeline module.
//!
//! These tests drive full runs against temporary directories:
//! - Duplicate removal for images, videos and documents
//! - Batch capacity and resuming partially filled folders
//! - Per-file failures (hash, move, delete) versus fatal scan errors
//! - Similarity thresholds on resized copies
//! - Determinism, idempotence and destination exclusion

use batch_sorter::core::pipeline::{FailureStage, Pipeline, PipelineBuilder};
use batch_sorter::core::scanner::SortMode;
use batch_sorter::error::{ScanError, SorterError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a small gradient JPEG; `seed` shifts the pattern
fn write_jpeg(path: &Path, seed: u8) {
    let img = image::RgbImage::from_fn(64, 64, |x, y| {
        image::Rgb([(x * 4) as u8 ^ seed, (y * 4) as u8, seed.wrapping_mul(3)])
    });
    img.save(path).unwrap();
}

fn write_text(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .count()
}

fn sorter(source: &Path, dest: &Path, mode: SortMode) -> PipelineBuilder {
    Pipeline::builder().source(source).destination(dest).mode(mode)
}

#[test]
fn identical_images_leave_one_copy_and_empty_source_is_removed() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source_images");
    let dest = temp.path().join("sorted_images");
    fs::create_dir_all(&source).unwrap();
    write_jpeg(&source.join("a.jpg"), 7);
    fs::copy(source.join("a.jpg"), source.join("b.jpg")).unwrap();

    let result = sorter(&source, &dest, SortMode::Media)
        .remove_empty_source(true)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.stats.scanned, 2);
    assert_eq!(result.stats.unique_kept, 1);
    assert_eq!(result.stats.duplicates_removed, 1);
    assert_eq!(result.stats.errors, 0);

    let batch = dest.join("batch_0001");
    assert_eq!(count_files(&batch), 1);
    assert!(batch.join("a.jpg").exists());
    assert!(!source.exists());
}

#[test]
fn identical_videos_are_deduplicated() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let clip = vec![0x42u8; 4096];
    fs::write(source.path().join("clip.mp4"), &clip).unwrap();
    fs::write(source.path().join("clip_copy.mov"), &clip).unwrap();
    fs::write(source.path().join("other.mkv"), vec![0x17u8; 4096]).unwrap();

    let result = sorter(source.path(), dest.path(), SortMode::Media)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.stats.unique_kept, 2);
    assert_eq!(result.stats.duplicates_removed, 1);
    assert!(dest.path().join("batch_0001/clip.mp4").exists());
    assert!(!source.path().join("clip_copy.mov").exists());
}

#[test]
fn capacity_splits_into_full_and_remainder_batches() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    for i in 0..501 {
        write_text(source.path(), &format!("doc_{:04}.txt", i), &format!("document {}", i));
    }

    let result = sorter(source.path(), dest.path(), SortMode::Documents)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.stats.unique_kept, 501);
    assert_eq!(result.stats.batches_created, 2);

    let text = dest.path().join("text");
    assert_eq!(count_files(&text.join("batch_0001")), 500);
    assert_eq!(count_files(&text.join("batch_0002")), 1);
    assert!(text.join("batch_0002/doc_0500.txt").exists());
    assert!(!text.join("batch_0003").exists());
}

#[test]
fn corrupt_pdf_is_a_per_file_failure() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let broken = write_text(source.path(), "broken.pdf", "this is not a pdf");
    write_text(source.path(), "notes.txt", "meeting notes");

    let result = sorter(source.path(), dest.path(), SortMode::Documents)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.stats.errors, 1);
    assert_eq!(result.stats.failures.len(), 1);
    assert_eq!(result.stats.failures[0].stage, FailureStage::Hash);
    assert!(result.stats.failures[0].path.ends_with("broken.pdf"));
    assert!(broken.exists());
    assert!(dest.path().join("text/batch_0001/notes.txt").exists());
}

#[test]
fn missing_source_is_fatal_and_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("does_not_exist");
    let dest = temp.path().join("sorted");

    let result = sorter(&source, &dest, SortMode::Media).build().run();

    assert!(matches!(
        result,
        Err(SorterError::Scan(ScanError::DirectoryNotFound { .. }))
    ));
    assert!(!dest.exists());
}

#[test]
fn reformatted_documents_are_duplicates() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_text(source.path(), "a/report.md", "Quarterly Report\n\nRevenue up.");
    write_text(source.path(), "b/report.md", "quarterly   report revenue\tUP.");
    write_text(source.path(), "c/other.md", "Something else entirely");

    let result = sorter(source.path(), dest.path(), SortMode::Documents)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.stats.unique_kept, 2);
    assert_eq!(result.stats.duplicates_removed, 1);
    assert!(result.duplicates[0].path.ends_with("b/report.md"));
    assert!(result.duplicates[0].original.ends_with("a/report.md"));
    assert!(dest.path().join("text/batch_0001/report.md").exists());
    assert!(dest.path().join("text/batch_0001/other.md").exists());
    // Emptied subdirectories are gone, the root stays
    assert!(!source.path().join("a").exists());
    assert!(source.path().exists());
}

#[test]
fn runs_are_deterministic() {
    fn populate(dir: &Path) {
        write_text(dir, "z.txt", "alpha");
        write_text(dir, "m/a.txt", "alpha");
        write_text(dir, "m/b.csv", "1,2,3");
        write_text(dir, "b.txt", "beta");
        write_text(dir, "y/c.txt", "beta");
        write_text(dir, "d.txt", "gamma");
    }

    fn outcome(root: &Path) -> (Vec<(PathBuf, PathBuf)>, Vec<PathBuf>) {
        let source = root.join("in");
        let dest = root.join("out");
        populate(&source);

        let result = sorter(&source, &dest, SortMode::Documents)
            .max_files_per_batch(2)
            .build()
            .run()
            .unwrap();

        let source = fs::canonicalize(&source).unwrap();
        let placements = result
            .placements
            .iter()
            .map(|p| {
                (
                    p.source.strip_prefix(&source).unwrap().to_path_buf(),
                    p.destination.strip_prefix(&dest).unwrap().to_path_buf(),
                )
            })
            .collect();
        let duplicates = result
            .duplicates
            .iter()
            .map(|d| d.path.strip_prefix(&source).unwrap().to_path_buf())
            .collect();
        (placements, duplicates)
    }

    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let (placements, duplicates) = outcome(first.path());
    assert_eq!((placements.clone(), duplicates.clone()), outcome(second.path()));

    // Lexicographic traversal: b.txt before y/c.txt, m/a.txt before z.txt
    assert_eq!(duplicates, vec![PathBuf::from("y/c.txt"), PathBuf::from("z.txt")]);
    assert_eq!(
        placements[0],
        (PathBuf::from("b.txt"), PathBuf::from("text/batch_0001/b.txt"))
    );
}

#[test]
fn second_run_on_emptied_source_is_a_no_op() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_text(source.path(), "one.txt", "one");
    write_text(source.path(), "two.txt", "two");

    let pipeline = sorter(source.path(), dest.path(), SortMode::Documents).build();
    let first = pipeline.run().unwrap();
    assert_eq!(first.stats.unique_kept, 2);

    let second = pipeline.run().unwrap();
    assert_eq!(second.stats.scanned, 0);
    assert_eq!(second.stats.batches_created, 0);
    assert_eq!(count_files(&dest.path().join("text/batch_0001")), 2);
}

#[test]
fn destination_inside_source_is_never_rescanned() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("inbox");
    let dest = source.join("sorted");
    write_text(&source, "first.txt", "first");

    sorter(&source, &dest, SortMode::Documents).build().run().unwrap();
    assert!(dest.join("text/batch_0001/first.txt").exists());

    write_text(&source, "second.txt", "second");
    let result = sorter(&source, &dest, SortMode::Documents).build().run().unwrap();

    assert_eq!(result.stats.scanned, 1);
    assert_eq!(count_files(&dest.join("text/batch_0001")), 2);
}

#[test]
fn later_runs_fill_the_last_batch_before_opening_another() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("in");
    let dest = temp.path().join("out");

    for name in ["a", "b", "c"] {
        write_text(&source, &format!("{}.txt", name), name);
    }
    let first = sorter(&source, &dest, SortMode::Documents)
        .max_files_per_batch(2)
        .build()
        .run()
        .unwrap();
    assert_eq!(first.stats.batches_created, 2);

    for name in ["d", "e"] {
        write_text(&source, &format!("{}.txt", name), name);
    }
    let second = sorter(&source, &dest, SortMode::Documents)
        .max_files_per_batch(2)
        .build()
        .run()
        .unwrap();

    let text = dest.join("text");
    assert_eq!(second.stats.batches_created, 1);
    assert_eq!(count_files(&text.join("batch_0001")), 2);
    assert_eq!(count_files(&text.join("batch_0002")), 2);
    assert!(text.join("batch_0002/d.txt").exists());
    assert!(text.join("batch_0003/e.txt").exists());
}

#[test]
fn name_collision_in_batch_does_not_overwrite() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("in");
    let dest = temp.path().join("out");
    write_text(&dest, "text/batch_0001/notes.txt", "from an earlier run");
    write_text(&source, "notes.txt", "new notes");

    let result = sorter(&source, &dest, SortMode::Documents).build().run().unwrap();

    let batch = dest.join("text/batch_0001");
    assert_eq!(result.stats.unique_kept, 1);
    assert_eq!(
        fs::read_to_string(batch.join("notes.txt")).unwrap(),
        "from an earlier run"
    );
    assert_eq!(fs::read_to_string(batch.join("notes_1.txt")).unwrap(), "new notes");
}

#[test]
fn hidden_files_are_skipped_unless_included() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("in");
    let dest = temp.path().join("out");
    write_text(&source, ".secret.txt", "hidden");
    write_text(&source, "visible.txt", "shown");

    let result = sorter(&source, &dest, SortMode::Documents).build().run().unwrap();
    assert_eq!(result.stats.scanned, 1);
    assert!(source.join(".secret.txt").exists());

    let result = sorter(&source, &dest, SortMode::Documents)
        .include_hidden(true)
        .build()
        .run()
        .unwrap();
    assert_eq!(result.stats.scanned, 1);
    assert!(dest.join("text/batch_0001/.secret.txt").exists());
}

#[test]
fn media_mode_sorts_plain_text_but_not_documents() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_jpeg(&source.path().join("photo.jpg"), 1);
    write_text(source.path(), "notes.txt", "Packing list\n\nsunscreen");
    write_text(source.path(), "notes_copy.md", "packing list sunscreen");
    write_text(source.path(), "report.pdf", "%PDF-1.4 not media");
    fs::write(source.path().join("letter.docx"), b"PK\x03\x04").unwrap();

    let result = sorter(source.path(), dest.path(), SortMode::Media)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.stats.scanned, 3);
    assert_eq!(result.stats.unique_kept, 2);
    assert_eq!(result.stats.duplicates_removed, 1);
    assert!(result.duplicates[0].path.ends_with("notes_copy.md"));

    // One flat sequence, no category folders
    let batch = dest.path().join("batch_0001");
    assert!(batch.join("photo.jpg").exists());
    assert!(batch.join("notes.txt").exists());
    assert!(!dest.path().join("text").exists());
    assert!(source.path().join("report.pdf").exists());
    assert!(source.path().join("letter.docx").exists());
}

#[test]
fn identical_heic_files_are_deduplicated() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let bytes = b"\0\0\0\x18ftypheic\0\0\0\0mif1heic";
    fs::write(source.path().join("IMG_0001.heic"), bytes).unwrap();
    fs::write(source.path().join("IMG_0001 copy.heic"), bytes).unwrap();
    fs::write(source.path().join("IMG_0002.HEIF"), b"\0\0\0\x18ftypheif other").unwrap();

    let result = sorter(source.path(), dest.path(), SortMode::Media)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.stats.errors, 0);
    assert_eq!(result.stats.unique_kept, 2);
    assert_eq!(result.stats.duplicates_removed, 1);
    assert!(dest.path().join("batch_0001/IMG_0001 copy.heic").exists());
    assert!(dest.path().join("batch_0001/IMG_0002.HEIF").exists());
    assert!(!source.path().join("IMG_0001.heic").exists());
}

fn write_gradient(path: &Path, vertical: bool) -> image::RgbImage {
    let img = image::RgbImage::from_fn(64, 64, |x, y| {
        let step = if vertical { y } else { x };
        let v = (step * 4) as u8;
        image::Rgb([v, v, v])
    });
    img.save(path).unwrap();
    img
}

#[test]
fn resized_copy_is_caught_within_threshold() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let img = write_gradient(&source.path().join("gradient.jpg"), false);
    image::imageops::resize(&img, 32, 32, image::imageops::FilterType::Triangle)
        .save(source.path().join("gradient_small.jpg"))
        .unwrap();
    write_gradient(&source.path().join("vertical.jpg"), true);

    let result = sorter(source.path(), dest.path(), SortMode::Media)
        .threshold(10)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.stats.unique_kept, 2);
    assert_eq!(result.stats.duplicates_removed, 1);
    assert!(result.duplicates[0].path.ends_with("gradient_small.jpg"));
    assert!(result.duplicates[0].original.ends_with("gradient.jpg"));
    assert!(dest.path().join("batch_0001/vertical.jpg").exists());
}

#[test]
fn loose_threshold_merges_different_images() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_gradient(&source.path().join("a.jpg"), false);
    write_gradient(&source.path().join("b.jpg"), true);

    // Horizontal and vertical gradients differ in half of their 64 bits
    let strict = sorter(source.path(), dest.path(), SortMode::Media)
        .threshold(16)
        .build();
    let loose = sorter(source.path(), dest.path(), SortMode::Media)
        .threshold(40)
        .build();

    let result = loose.run().unwrap();
    assert_eq!(result.stats.unique_kept, 1);
    assert_eq!(result.stats.duplicates_removed, 1);

    write_gradient(&source.path().join("c.jpg"), false);
    write_gradient(&source.path().join("d.jpg"), true);
    let result = strict.run().unwrap();
    assert_eq!(result.stats.unique_kept, 2);
    assert_eq!(result.stats.duplicates_removed, 0);
}

#[cfg(unix)]
fn set_read_only(dir: &Path, read_only: bool) {
    use std::os::unix::fs::PermissionsExt;
    let mode = if read_only { 0o555 } else { 0o755 };
    fs::set_permissions(dir, fs::Permissions::from_mode(mode)).unwrap();
}

/// False when running as a user that ignores directory permissions
#[cfg(unix)]
fn permissions_enforced(dir: &Path) -> bool {
    let marker = dir.join(".write_check");
    if fs::write(&marker, b"").is_err() {
        return true;
    }
    fs::remove_file(&marker).unwrap();
    false
}

#[cfg(unix)]
#[test]
fn read_only_batch_folder_leaves_file_in_source() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("in");
    let dest = temp.path().join("out");
    write_text(&source, "a.txt", "same");
    write_text(&source, "b.txt", "same");
    let batch = dest.join("text/batch_0001");
    fs::create_dir_all(&batch).unwrap();
    set_read_only(&batch, true);

    if !permissions_enforced(&batch) {
        set_read_only(&batch, false);
        return;
    }

    let result = sorter(&source, &dest, SortMode::Documents).build().run();
    set_read_only(&batch, false);
    let result = result.unwrap();

    assert_eq!(result.stats.errors, 1);
    assert_eq!(result.stats.failures[0].stage, FailureStage::Move);
    assert!(result.stats.failures[0].path.ends_with("a.txt"));
    assert_eq!(result.stats.batches_created, 0);
    assert_eq!(result.stats.unique_kept, 0);
    assert!(source.join("a.txt").exists());

    // a.txt is still the surviving copy, so b.txt goes
    assert_eq!(result.stats.duplicates_removed, 1);
    assert!(!source.join("b.txt").exists());
    assert_eq!(count_files(&batch), 0);
}

#[cfg(unix)]
#[test]
fn undeletable_duplicate_is_recorded_and_kept() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("in");
    let dest = temp.path().join("out");
    write_text(&source, "a.txt", "same");
    let locked = source.join("locked");
    write_text(&locked, "b.txt", "same");
    set_read_only(&locked, true);

    if !permissions_enforced(&locked) {
        set_read_only(&locked, false);
        return;
    }

    let result = sorter(&source, &dest, SortMode::Documents).build().run();
    set_read_only(&locked, false);
    let result = result.unwrap();

    assert_eq!(result.stats.errors, 1);
    assert_eq!(result.stats.failures[0].stage, FailureStage::Delete);
    assert_eq!(result.stats.duplicates_removed, 0);
    assert_eq!(result.stats.unique_kept, 1);
    assert!(locked.join("b.txt").exists());
    assert!(dest.join("text/batch_0001/a.txt").exists());
}

#[cfg(unix)]
#[test]
fn symlinked_folders_are_sorted_only_when_followed() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("in");
    let dest = temp.path().join("out");
    let shared = temp.path().join("shared");
    write_text(&source, "local.txt", "local");
    write_text(&shared, "linked.txt", "linked");
    std::os::unix::fs::symlink(&shared, source.join("shared")).unwrap();

    let result = sorter(&source, &dest, SortMode::Documents).build().run().unwrap();
    assert_eq!(result.stats.scanned, 1);
    assert!(shared.join("linked.txt").exists());

    let result = sorter(&source, &dest, SortMode::Documents)
        .follow_symlinks(true)
        .build()
        .run()
        .unwrap();
    assert_eq!(result.stats.scanned, 1);
    assert!(dest.join("text/batch_0001/linked.txt").exists());
    assert!(!shared.join("linked.txt").exists());
}
