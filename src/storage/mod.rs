//! Storage Layer - SQLite-backed persistence
//!
//! Tables:
//! - genome(id, gbk_path)
//! - record(id, genome_id, name, definition, accession, version)
//! - feature(genome_id, record_id, feature_index, location_start, location_end, location_strand)
//! - qualifier(genome_id, record_id, feature_index, key, value)

pub mod rows;
pub mod schema;
pub mod sqlite;

pub use rows::{FeatureRow, QualifierRow, TableRow};
pub use sqlite::{DbStats, SqliteStore};
