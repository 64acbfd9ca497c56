use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Invalid rule spec `{spec}`: {reason}")]
    InvalidSpec { spec: String, reason: String },

    #[error("Duplicate rule key: {0}")]
    DuplicateRule(String),

    #[error("Rule keys `{first}` and `{second}` map to the same file name `{stem}`")]
    KeyCollision {
        first: String,
        second: String,
        stem: String,
    },

    #[error("Invalid rule key: {0}")]
    InvalidKey(String),

    #[error("Sink pool is closed; cannot write to `{0}`")]
    SinkClosed(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarvestError {
    pub(crate) fn invalid_spec(spec: &str, reason: impl Into<String>) -> Self {
        HarvestError::InvalidSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarvestError::Io {
            path: path.into(),
            source,
        }
    }
}
