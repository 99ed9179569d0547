//! # CLI Module
//!
//! Command-line interface for the batch sorter.
//!
//! ## Usage
//! ```bash
//! # Sort images and videos from ./source_images into ./sorted_images
//! batch-sort media
//!
//! # Explicit directories, smaller batches
//! batch-sort media --source ~/inbox --dest ~/sorted --max-files 100
//!
//! # Tolerate small image differences
//! batch-sort media --threshold 4
//!
//! # Documents, JSON summary
//! batch-sort documents --output json
//! ```
//!
//! Source and destination fall back to `MEDIA_SORT_SOURCE`/`MEDIA_SORT_DEST`
//! or `DOCUMENT_SORT_SOURCE`/`DOCUMENT_SORT_DEST`.

use batch_sorter::core::pipeline::{Pipeline, PipelineResult, SorterConfig};
use batch_sorter::core::scanner::SortMode;
use batch_sorter::error::{Result, SorterError};
use batch_sorter::events::{Event, EventChannel, PipelineEvent, ProcessEvent, ScanEvent};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;

/// Batch Sorter - deduplicate and split folders into fixed-size batches
#[derive(Parser, Debug)]
#[command(name = "batch-sort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sort images, videos and plain text into batch_NNNN folders
    Media {
        /// Directory to sort
        #[arg(long, env = "MEDIA_SORT_SOURCE", default_value = "./source_images")]
        source: PathBuf,

        /// Where batch folders are created
        #[arg(long, env = "MEDIA_SORT_DEST", default_value = "./sorted_images")]
        dest: PathBuf,

        #[command(flatten)]
        options: SortOptions,
    },
    /// Sort documents into <category>/batch_NNNN folders
    Documents {
        /// Directory to sort
        #[arg(long, env = "DOCUMENT_SORT_SOURCE", default_value = "./source_documents")]
        source: PathBuf,

        /// Where category folders are created
        #[arg(long, env = "DOCUMENT_SORT_DEST", default_value = "./sorted_documents")]
        dest: PathBuf,

        #[command(flatten)]
        options: SortOptions,
    },
}

#[derive(Args, Debug)]
struct SortOptions {
    /// Maximum files per batch folder
    #[arg(short, long, default_value = "500")]
    max_files: usize,

    /// Image similarity threshold (Hamming distance, 0 = identical hashes only)
    #[arg(short, long, default_value = "0")]
    threshold: u32,

    /// Include hidden files and directories
    #[arg(long)]
    include_hidden: bool,

    /// Follow symbolic links into other directories
    #[arg(long)]
    follow_symlinks: bool,

    /// Also remove the source directory once it is empty
    #[arg(long)]
    remove_empty_source: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let (mode, source, dest, options) = match cli.command {
        Commands::Media {
            source,
            dest,
            options,
        } => (SortMode::Media, source, dest, options),
        Commands::Documents {
            source,
            dest,
            options,
        } => (SortMode::Documents, source, dest, options),
    };

    batch_sorter::init_tracing(options.verbose);

    let config = SorterConfig {
        source_dir: source,
        dest_dir: dest,
        mode,
        max_files_per_batch: options.max_files,
        similarity_threshold: options.threshold,
        include_hidden: options.include_hidden,
        follow_symlinks: options.follow_symlinks,
        remove_empty_source: options.remove_empty_source,
    };

    run_sort(config, options.output, options.verbose)
}

fn run_sort(config: SorterConfig, output: OutputFormat, verbose: bool) -> Result<()> {
    let term = Term::stderr();

    // Print header
    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Batch Sorter").bold().cyan(),
            style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!(
            "  {} {} → {}",
            style(config.mode).yellow(),
            config.source_dir.display(),
            config.dest_dir.display()
        ))
        .ok();
        term.write_line("").ok();
    }

    let pipeline = Pipeline::builder().config(config).build();

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        let Some(pb) = progress_clone else {
            return;
        };

        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Scan(ScanEvent::Completed { total_files }) => {
                    pb.set_length(total_files as u64);
                }
                Event::Process(ProcessEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(format!(
                            "{}",
                            p.current_path.file_name().unwrap_or_default().to_string_lossy()
                        ));
                    }
                }
                Event::Process(ProcessEvent::BatchOpened { path }) => {
                    if verbose {
                        pb.println(format!("  opened {}", path.display()));
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    // Run the pipeline
    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = result?;

    // Output results
    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, verbose),
        OutputFormat::Json => print_json_results(&result)?,
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, verbose: bool) {
    let stats = &result.stats;

    term.write_line("").ok();
    term.write_line(&format!("{} Sort Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files scanned in {:.1}s",
        style(stats.scanned).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} unique files moved into batches",
        style(stats.unique_kept).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicates removed",
        style(stats.duplicates_removed).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} batch folders created",
        style(stats.batches_created).cyan()
    ))
    .ok();

    if stats.junk_removed > 0 || stats.empty_dirs_removed > 0 {
        term.write_line(&format!(
            "  {} junk files and {} empty directories cleaned up",
            style(stats.junk_removed).dim(),
            style(stats.empty_dirs_removed).dim()
        ))
        .ok();
    }

    if stats.errors > 0 {
        term.write_line(&format!(
            "  {} files could not be processed and were left in place",
            style(stats.errors).red()
        ))
        .ok();
    }

    if verbose && !result.duplicates.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Duplicates:").bold().underlined()))
            .ok();
        for duplicate in &result.duplicates {
            term.write_line(&format!(
                "    {} {} {}",
                style("○").dim(),
                duplicate.path.display(),
                style(format!("(same as {})", duplicate.original.display())).dim()
            ))
            .ok();
        }
    }

    if !stats.failures.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Failures:").bold().underlined()))
            .ok();
        for failure in &stats.failures {
            term.write_line(&format!(
                "    {} {} {}: {}",
                style("✗").red(),
                failure.path.display(),
                style(format!("[{}]", failure.stage)).dim(),
                failure.reason
            ))
            .ok();
        }
    }
}

fn print_json_results(result: &PipelineResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| SorterError::Io(std::io::Error::from(e)))?;
    println!("{}", json);
    Ok(())
}
