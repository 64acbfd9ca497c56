mod flush;
mod orchestrator;
mod processor;
mod sink;


pub use flush::{flush_sink, sort_unique, write_empty, FlushedSink, OUTPUT_EXTENSION};
pub use orchestrator::{discover_documents, Orchestrator, OutputFile, RunSummary};
pub use processor::{process_file, FileStats};
pub use sink::{ClosedSink, SinkPool, SINK_EXTENSION};
