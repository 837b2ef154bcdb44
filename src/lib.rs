//! # gbk-to-sqlite - GenBank flat files into SQLite
//!
//! Streams GenBank records (plain or gzip-compressed) and denormalizes the
//! genome → record → feature → qualifier hierarchy into four tables.
//!
//! gbk-to-sqlite provides:
//! - A streaming flat-file reader that holds one record at a time
//! - A row flattener keyed by (genome_id, record_id, feature_index)
//! - Batched, transactional bulk inserts with bounded memory
//! - Deferred index creation and bulk-load pragmas

pub mod genbank;
pub mod reader;
pub mod flatten;
pub mod loader;
pub mod storage;
pub mod convert;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use convert::{convert_gbk_to_sqlite, ConversionStats, ConvertOptions, Converter};
pub use genbank::{Feature, Location, Qualifier, Record, Strand};
pub use loader::DEFAULT_BATCH_SIZE;
pub use storage::SqliteStore;

/// Result type alias for gbk-to-sqlite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for gbk-to-sqlite operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(std::path::PathBuf),

    #[error("Invalid batch size: {0} (must be at least 1)")]
    InvalidBatchSize(usize),
}
