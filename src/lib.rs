// Public API exports
pub mod collector;
pub mod config;
pub mod dsl;
pub mod error;
pub mod hooks;
pub mod pipeline;
pub mod rules;
pub mod security;

// Re-export main types for convenience
pub use config::ExtractConfig;
pub use error::HarvestError;
pub use security::KeySanitizer;

pub use dsl::{parse, PathSegment, RuleSpec, SegmentKind};

pub use rules::{Rule, RuleSet, BUILTIN_SPECS, DISCRIMINATOR};

pub use pipeline::{
    flush_sink, process_file, ClosedSink, FileStats, FlushedSink, Orchestrator, OutputFile,
    RunSummary, SinkPool,
};
