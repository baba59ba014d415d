//! CrashBase Core Analytics Engine
//!
//! An in-memory columnar analytics engine for traffic-collision event logs.
//! Ingests a delimited collision log through a parallel, chunked, partial-read
//! pipeline and answers count queries with lock-free parallel scans.

pub mod ingest;
pub mod processor;
pub mod query;
pub mod schema;
pub mod store;

// Re-export main types
pub use processor::CrashDataProcessor;
pub use query::QueryKind;
pub use store::EventStore;

/// Engine error type
#[derive(Debug, thiserror::Error)]
pub enum CrashError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid query input: {0}")]
    InvalidQueryInput(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, CrashError>;
