use super::sink::SinkPool;
use crate::rules::RuleSet;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Top-level document shape; records stay raw until decoded one by one
#[derive(Deserialize)]
struct Document {
    data: Vec<Box<RawValue>>,
}

/// Counters for one processed document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Entries in the document's `data` array
    pub records: usize,
    /// Entries that were not JSON objects
    pub skipped: usize,
    /// Strings appended to sinks
    pub values: usize,
    /// Strings dropped because their sink rejected the write
    pub write_errors: usize,
}

/// Run every rule over every record of one document and route the results
///
/// Fails only when the file cannot be read or is not a `{"data": [...]}`
/// document. Records that are not objects are skipped and counted. Bytes
/// that are not valid UTF-8 are replaced with U+FFFD.
pub fn process_file(path: &Path, rules: &RuleSet, pool: &SinkPool) -> Result<FileStats> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    // Invalid UTF-8 inside one record must not cost the rest of the file
    let text = String::from_utf8_lossy(&bytes);
    let document: Document = serde_json::from_str(&text)
        .with_context(|| format!("Malformed document {}", path.display()))?;

    let mut stats = FileStats {
        records: document.data.len(),
        ..FileStats::default()
    };

    for raw in &document.data {
        let record = match serde_json::from_str::<Map<String, Value>>(raw.get()) {
            Ok(map) => Value::Object(map),
            Err(_) => {
                stats.skipped += 1;
                continue;
            }
        };

        for rule in rules {
            if !rule.matches(&record) {
                continue;
            }
            for value in rule.extract(&record) {
                if value.is_empty() {
                    continue;
                }
                match pool.write(&rule.key, &value) {
                    Ok(()) => stats.values += 1,
                    Err(e) => {
                        stats.write_errors += 1;
                        warn!(rule = %rule.key, error = %e, "Dropped extracted value");
                    }
                }
            }
        }
    }

    Ok(stats)
}
