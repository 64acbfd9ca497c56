use crate::error::HarvestError;
use crate::security::KeySanitizer;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;

/// Extension of per-rule sink files
pub const SINK_EXTENSION: &str = "tmp";

/// Lifecycle of one key's sink file
enum SinkState {
    /// Registered, file not created yet
    Pending,
    Open {
        writer: BufWriter<File>,
        lines: usize,
    },
    Closed,
}

/// Append target for one rule key
struct Sink {
    path: PathBuf,
    state: Mutex<SinkState>,
}

/// A sink that has been flushed and released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedSink {
    pub key: String,
    pub path: PathBuf,
    /// Lines appended before the sink was closed
    pub lines: usize,
}

#[derive(Default)]
struct SinkTable {
    sinks: HashMap<String, Arc<Sink>>,
    /// File path -> key, so two keys never share a file
    paths: HashMap<PathBuf, String>,
    closed: bool,
}

/// Lazily created per-key line sinks shared by all collection workers
///
/// The key table is only write-locked to register a new key, which does no
/// I/O. The sink file is created on the first write while holding just that
/// key's mutex, so writers on other keys never wait on a filesystem call.
pub struct SinkPool {
    dir: PathBuf,
    table: RwLock<SinkTable>,
}

impl SinkPool {
    /// Create a pool writing into `dir`, which must already exist
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            table: RwLock::new(SinkTable::default()),
        }
    }

    /// Append `value` as one JSON-encoded line to the sink for `key`
    ///
    /// The sink file is created (truncating any leftover) on the first write
    /// for a key. If creation fails the key stays pending and the next write
    /// tries again. Fails with [`HarvestError::SinkClosed`] after [`close_all`].
    ///
    /// [`close_all`]: SinkPool::close_all
    pub fn write(&self, key: &str, value: &str) -> Result<(), HarvestError> {
        let sink = self.sink_for(key)?;
        let mut state = sink.state.lock().unwrap_or_else(PoisonError::into_inner);

        if matches!(*state, SinkState::Pending) {
            let file = File::create(&sink.path).map_err(|e| HarvestError::io(&sink.path, e))?;
            debug!(key, path = %sink.path.display(), "Created sink");
            *state = SinkState::Open {
                writer: BufWriter::new(file),
                lines: 0,
            };
        }

        let SinkState::Open { writer, lines } = &mut *state else {
            return Err(HarvestError::SinkClosed(key.to_string()));
        };

        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        writer
            .write_all(&line)
            .map_err(|e| HarvestError::io(&sink.path, e))?;
        *lines += 1;
        Ok(())
    }

    /// Number of keys that have been written to, including any whose file
    /// could not be created
    pub fn len(&self) -> usize {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sinks
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys that have been written to, sorted
    pub fn keys(&self) -> Vec<String> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = table.sinks.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn is_closed(&self) -> bool {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .closed
    }

    /// Flush and release every sink, sorted by key
    ///
    /// Each sink is closed exactly once; calling this again returns nothing.
    /// Keys whose file was never created are dropped. A sink whose buffered
    /// data cannot be flushed is returned as an error without affecting the
    /// others.
    pub fn close_all(&self) -> Vec<Result<ClosedSink, HarvestError>> {
        let sinks: Vec<(String, Arc<Sink>)> = {
            let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
            table.closed = true;
            table.paths.clear();
            let drained = table.sinks.drain().collect();
            drained
        };

        let mut closed: Vec<(String, Result<ClosedSink, HarvestError>)> = sinks
            .into_iter()
            .filter_map(|(key, sink)| {
                let state = mem::replace(
                    &mut *sink.state.lock().unwrap_or_else(PoisonError::into_inner),
                    SinkState::Closed,
                );
                match state {
                    SinkState::Open { writer, lines } => {
                        let result = Self::finish(&key, &sink.path, writer, lines);
                        Some((key, result))
                    }
                    SinkState::Pending | SinkState::Closed => None,
                }
            })
            .collect();

        closed.sort_by(|a, b| a.0.cmp(&b.0));
        closed.into_iter().map(|(_, result)| result).collect()
    }

    fn finish(
        key: &str,
        path: &Path,
        writer: BufWriter<File>,
        lines: usize,
    ) -> Result<ClosedSink, HarvestError> {
        let file = writer
            .into_inner()
            .map_err(|e| HarvestError::io(path, e.into_error()))?;
        file.sync_all().map_err(|e| HarvestError::io(path, e))?;
        Ok(ClosedSink {
            key: key.to_string(),
            path: path.to_path_buf(),
            lines,
        })
    }

    /// Find or register the sink for `key`; never touches the filesystem
    fn sink_for(&self, key: &str) -> Result<Arc<Sink>, HarvestError> {
        {
            let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
            if table.closed {
                return Err(HarvestError::SinkClosed(key.to_string()));
            }
            if let Some(sink) = table.sinks.get(key) {
                return Ok(Arc::clone(sink));
            }
        }

        let path = self.sink_path(key)?;
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if table.closed {
            return Err(HarvestError::SinkClosed(key.to_string()));
        }
        // Another writer may have registered it between the two locks
        if let Some(sink) = table.sinks.get(key) {
            return Ok(Arc::clone(sink));
        }
        if let Some(other) = table.paths.get(&path) {
            return Err(HarvestError::KeyCollision {
                first: other.clone(),
                second: key.to_string(),
                stem: KeySanitizer::sanitize(key)?,
            });
        }

        let sink = Arc::new(Sink {
            path: path.clone(),
            state: Mutex::new(SinkState::Pending),
        });
        table.paths.insert(path, key.to_string());
        table.sinks.insert(key.to_string(), Arc::clone(&sink));
        Ok(sink)
    }

    fn sink_path(&self, key: &str) -> Result<PathBuf, HarvestError> {
        let stem = KeySanitizer::sanitize(key)?;
        Ok(self.dir.join(format!("{}.{}", stem, SINK_EXTENSION)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pending_key_does_not_block_other_keys() {
        let dir = tempdir().unwrap();
        let pool = SinkPool::new(dir.path());

        // Hold one key's lock the way a slow file creation would
        let slow = pool.sink_for("slow").unwrap();
        let _held = slow.state.lock().unwrap();

        pool.write("fast", "x").unwrap();
        assert_eq!(pool.keys(), vec!["fast", "slow"]);
        assert!(!dir.path().join("slow.tmp").exists());
    }

    #[test]
    fn test_registration_does_not_create_file() {
        let dir = tempdir().unwrap();
        let pool = SinkPool::new(dir.path());

        let sink = pool.sink_for("menu@more").unwrap();
        assert_eq!(sink.path, dir.path().join("menu@more.tmp"));
        assert!(!sink.path.exists());
        assert!(matches!(
            *sink.state.lock().unwrap(),
            SinkState::Pending
        ));
    }
}
