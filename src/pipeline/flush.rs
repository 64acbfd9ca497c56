use super::sink::ClosedSink;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Extension of the final per-rule files
pub const OUTPUT_EXTENSION: &str = "json";

/// Outcome of flushing one sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushedSink {
    pub key: String,
    pub output: PathBuf,
    /// Lines read from the sink
    pub lines: usize,
    /// Distinct strings written
    pub entries: usize,
}

/// Sort, dedupe and write one sink as a pretty JSON array
///
/// The output file is named after the sink file's stem and overwrites any
/// previous run's output.
pub fn flush_sink(sink: &ClosedSink, output_dir: &Path) -> Result<FlushedSink> {
    let values = read_sink(&sink.path)?;
    let lines = values.len();
    let entries = sort_unique(values);

    let output = output_path(&sink.path, output_dir)?;
    write_array(&output, &entries)?;

    Ok(FlushedSink {
        key: sink.key.clone(),
        output,
        lines,
        entries: entries.len(),
    })
}

/// Write `[]` for a rule that produced nothing, replacing any earlier output
pub fn write_empty(key: &str, file_stem: &str, output_dir: &Path) -> Result<FlushedSink> {
    let output = output_dir.join(format!("{}.{}", file_stem, OUTPUT_EXTENSION));
    write_array(&output, &[])?;

    Ok(FlushedSink {
        key: key.to_string(),
        output,
        lines: 0,
        entries: 0,
    })
}

/// Sort lexicographically and drop duplicates
pub fn sort_unique(mut values: Vec<String>) -> Vec<String> {
    values.sort_unstable();
    values.dedup();
    values
}

/// Decode every line of a sink file back into its string
fn read_sink(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("Failed to open sink {}", path.display()))?;

    let mut values = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read sink {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<String>(line) {
            Ok(value) => values.push(value),
            Err(e) => warn!(
                sink = %path.display(),
                line = index + 1,
                error = %e,
                "Skipping undecodable sink line"
            ),
        }
    }
    Ok(values)
}

fn output_path(sink_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = sink_path
        .file_stem()
        .with_context(|| format!("Sink path has no file name: {}", sink_path.display()))?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    Ok(output_dir.join(name))
}

fn write_array(path: &Path, entries: &[String]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entries)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}
