use std::path::{Path, PathBuf};

/// Where the downloader leaves its documents
pub const DEFAULT_INPUT_ROOT: &str = "../wtrec-downloader/wtrecs";

/// Per-rule sink files live here during collection
pub const DEFAULT_TMP_DIR: &str = "units_tmp";

/// Final per-rule JSON arrays
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Log progress after this many processed files
pub const DEFAULT_PROGRESS_EVERY: usize = 100;

/// Only files with this extension are treated as documents
pub const DEFAULT_EXTENSION: &str = "json";

/// Settings for one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    pub input_root: PathBuf,
    pub tmp_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Worker threads reading documents
    pub parse_parallelism: usize,
    /// Worker threads writing output files
    pub flush_parallelism: usize,
    pub progress_every: usize,
    pub extension: String,
}

impl ExtractConfig {
    /// Create a config with default directories and CPU-derived parallelism
    pub fn new() -> Self {
        let cpus = available_cpus();
        Self {
            input_root: PathBuf::from(DEFAULT_INPUT_ROOT),
            tmp_dir: PathBuf::from(DEFAULT_TMP_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            parse_parallelism: cpus * 4,
            flush_parallelism: cpus * 2,
            progress_every: DEFAULT_PROGRESS_EVERY,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn input_root(mut self, path: impl AsRef<Path>) -> Self {
        self.input_root = path.as_ref().to_path_buf();
        self
    }

    pub fn tmp_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.tmp_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn output_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set the number of document workers (at least 1)
    pub fn parse_parallelism(mut self, workers: usize) -> Self {
        self.parse_parallelism = workers.max(1);
        self
    }

    /// Set the number of flush workers (at least 1)
    pub fn flush_parallelism(mut self, workers: usize) -> Self {
        self.flush_parallelism = workers.max(1);
        self
    }

    /// Set the progress log interval in files (at least 1)
    pub fn progress_every(mut self, files: usize) -> Self {
        self.progress_every = files.max(1);
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.input_root, PathBuf::from(DEFAULT_INPUT_ROOT));
        assert_eq!(config.tmp_dir, PathBuf::from("units_tmp"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.progress_every, 100);
        assert_eq!(config.extension, "json");
        assert!(config.parse_parallelism >= 4);
        assert!(config.flush_parallelism >= 2);
        assert_eq!(config.parse_parallelism, config.flush_parallelism * 2);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ExtractConfig::new()
            .input_root("in")
            .tmp_dir("tmp")
            .output_dir("out")
            .parse_parallelism(3)
            .flush_parallelism(2)
            .progress_every(10)
            .extension(".ndjson");

        assert_eq!(config.input_root, PathBuf::from("in"));
        assert_eq!(config.tmp_dir, PathBuf::from("tmp"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.parse_parallelism, 3);
        assert_eq!(config.flush_parallelism, 2);
        assert_eq!(config.progress_every, 10);
        assert_eq!(config.extension, "ndjson");
    }

    #[test]
    fn test_zero_values_clamped() {
        let config = ExtractConfig::new()
            .parse_parallelism(0)
            .flush_parallelism(0)
            .progress_every(0);

        assert_eq!(config.parse_parallelism, 1);
        assert_eq!(config.flush_parallelism, 1);
        assert_eq!(config.progress_every, 1);
    }
}
