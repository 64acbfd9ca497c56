use super::flush::{flush_sink, write_empty, FlushedSink};
use super::processor::{process_file, FileStats};
use super::sink::{ClosedSink, SinkPool};
use crate::config::ExtractConfig;
use crate::rules::{Rule, RuleSet};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// One written output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    pub key: String,
    pub path: PathBuf,
    pub entries: usize,
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// RFC 3339 start time
    pub started_at: String,
    pub elapsed_secs: f64,
    pub files: usize,
    pub files_failed: usize,
    pub records: usize,
    pub records_skipped: usize,
    pub values: usize,
    pub write_errors: usize,
    pub sinks: usize,
    pub flush_failed: usize,
    pub outputs: Vec<OutputFile>,
}

/// Shared counters updated by collection workers
#[derive(Default)]
struct Totals {
    done: AtomicUsize,
    failed: AtomicUsize,
    records: AtomicUsize,
    skipped: AtomicUsize,
    values: AtomicUsize,
    write_errors: AtomicUsize,
}

impl Totals {
    fn add(&self, stats: FileStats) {
        self.records.fetch_add(stats.records, Ordering::Relaxed);
        self.skipped.fetch_add(stats.skipped, Ordering::Relaxed);
        self.values.fetch_add(stats.values, Ordering::Relaxed);
        self.write_errors
            .fetch_add(stats.write_errors, Ordering::Relaxed);
    }
}

/// One unit of flush work, owned end-to-end by a single worker
enum FlushJob<'a> {
    Sink(&'a ClosedSink),
    /// A rule that produced no values this run
    Empty(&'a Rule),
}

impl FlushJob<'_> {
    fn key(&self) -> &str {
        match self {
            FlushJob::Sink(sink) => &sink.key,
            FlushJob::Empty(rule) => &rule.key,
        }
    }
}

/// Drives discovery, parallel collection and parallel flush
pub struct Orchestrator {
    config: ExtractConfig,
    rules: RuleSet,
}

impl Orchestrator {
    pub fn new(config: ExtractConfig, rules: RuleSet) -> Self {
        Self { config, rules }
    }

    /// Run the whole pipeline
    ///
    /// Per-file and per-key failures are logged and counted in the summary;
    /// only setup failures (directories, thread pools, unreadable input root)
    /// end the run with an error.
    pub fn run(&self) -> Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary {
            started_at: Utc::now().to_rfc3339(),
            ..RunSummary::default()
        };

        fs::create_dir_all(&self.config.tmp_dir).with_context(|| {
            format!("Failed to create {}", self.config.tmp_dir.display())
        })?;
        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!("Failed to create {}", self.config.output_dir.display())
        })?;

        let files = self.discover()?;
        summary.files = files.len();
        if files.is_empty() {
            warn!(root = %self.config.input_root.display(), "No documents found");
        }
        info!(
            files = files.len(),
            rules = self.rules.len(),
            workers = self.config.parse_parallelism,
            "Collecting"
        );

        let sinks = SinkPool::new(&self.config.tmp_dir);
        let totals = self.collect_files(&files, &sinks)?;
        summary.files_failed = totals.failed.into_inner();
        summary.records = totals.records.into_inner();
        summary.records_skipped = totals.skipped.into_inner();
        summary.values = totals.values.into_inner();
        summary.write_errors = totals.write_errors.into_inner();

        // Every collection worker has returned; nothing writes after this
        let written: HashSet<String> = sinks.keys().into_iter().collect();
        let mut closed = Vec::new();
        for result in sinks.close_all() {
            match result {
                Ok(sink) => closed.push(sink),
                Err(e) => {
                    summary.flush_failed += 1;
                    error!(error = %e, "Failed to close sink");
                }
            }
        }
        summary.sinks = closed.len();

        // Rules with no values still get a fresh, empty output file
        let mut jobs: Vec<FlushJob> = closed.iter().map(FlushJob::Sink).collect();
        jobs.extend(
            self.rules
                .iter()
                .filter(|rule| !written.contains(&rule.key))
                .map(FlushJob::Empty),
        );

        info!(
            sinks = closed.len(),
            empty = jobs.len() - closed.len(),
            workers = self.config.flush_parallelism,
            "Flushing"
        );
        for result in self.flush(&jobs)? {
            match result {
                Ok(flushed) => summary.outputs.push(OutputFile {
                    key: flushed.key,
                    path: flushed.output,
                    entries: flushed.entries,
                }),
                Err(e) => {
                    summary.flush_failed += 1;
                    error!("{:#}", e);
                }
            }
        }

        summary.elapsed_secs = start.elapsed().as_secs_f64();
        info!(
            outputs = summary.outputs.len(),
            failed_files = summary.files_failed,
            failed_flushes = summary.flush_failed,
            elapsed_secs = summary.elapsed_secs,
            "Done"
        );
        Ok(summary)
    }

    /// Every document under the input root, sorted by path
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        discover_documents(&self.config.input_root, &self.config.extension)
    }

    fn collect_files(&self, files: &[PathBuf], sinks: &SinkPool) -> Result<Totals> {
        let pool = worker_pool("harvest-parse", self.config.parse_parallelism)?;
        let totals = Totals::default();
        let total = files.len();
        let every = self.config.progress_every.max(1);

        pool.install(|| {
            files.par_iter().for_each(|path| {
                match process_file(path, &self.rules, sinks) {
                    Ok(stats) => totals.add(stats),
                    Err(e) => {
                        totals.failed.fetch_add(1, Ordering::Relaxed);
                        warn!("Skipping file: {:#}", e);
                    }
                }

                let done = totals.done.fetch_add(1, Ordering::Relaxed) + 1;
                if done % every == 0 || done == total {
                    info!("{} / {} done ({} remaining)", done, total, total - done);
                }
            });
        });

        Ok(totals)
    }

    fn flush(&self, jobs: &[FlushJob]) -> Result<Vec<Result<FlushedSink>>> {
        let pool = worker_pool("harvest-flush", self.config.flush_parallelism)?;
        let output_dir = &self.config.output_dir;

        let results: Vec<Result<FlushedSink>> = pool.install(|| {
            jobs.par_iter()
                .map(|job| -> Result<FlushedSink> {
                    let flushed = match job {
                        FlushJob::Sink(sink) => flush_sink(sink, output_dir),
                        FlushJob::Empty(rule) => write_empty(&rule.key, &rule.file_stem, output_dir),
                    }
                    .with_context(|| format!("Failed to flush `{}`", job.key()))?;
                    info!(
                        output = %flushed.output.display(),
                        entries = flushed.entries,
                        "Wrote"
                    );
                    Ok(flushed)
                })
                .collect()
        });

        Ok(results)
    }
}

/// Recursively list regular files with `extension` under `root`, sorted
///
/// Symlinks are not followed. Unreadable entries below the root are logged
/// and skipped; an unreadable root is an error.
pub fn discover_documents(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Input root is not a directory: {}", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| format!("Failed to read {}", root.display()));
            }
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let is_document = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext == extension);
        if is_document {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn worker_pool(name: &'static str, workers: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(move |i| format!("{}-{}", name, i))
        .build()
        .with_context(|| format!("Failed to start {} worker pool", name))
}
