//! Database schema definitions

/// SQL to create the genome table (one row per input file)
pub const CREATE_GENOME_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS genome (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    gbk_path TEXT NOT NULL
)
"#;

/// SQL to create the record table (one row per LOCUS entry)
pub const CREATE_RECORD_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS record (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    genome_id INTEGER NOT NULL REFERENCES genome(id),
    name TEXT NOT NULL,
    definition TEXT,
    accession TEXT,
    version TEXT
)
"#;

/// SQL to create the feature table
/// A feature is addressed by (genome_id, record_id, feature_index);
/// `id` exists only as the rowid and nothing references it.
pub const CREATE_FEATURE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS feature (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    genome_id INTEGER NOT NULL REFERENCES genome(id),
    record_id INTEGER NOT NULL REFERENCES record(id),
    feature_index INTEGER NOT NULL,
    location_start INTEGER,
    location_end INTEGER,
    location_strand TEXT
)
"#;

/// SQL to create the qualifier table. No uniqueness: keys repeat.
pub const CREATE_QUALIFIER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS qualifier (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    genome_id INTEGER NOT NULL REFERENCES genome(id),
    record_id INTEGER NOT NULL REFERENCES record(id),
    feature_index INTEGER NOT NULL,
    key TEXT NOT NULL,
    value TEXT
)
"#;

/// Secondary indexes, built once after the bulk load
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_qualifier_feature ON qualifier(record_id, feature_index)",
    "CREATE INDEX IF NOT EXISTS idx_qualifier_feature_key ON qualifier(record_id, feature_index, key)",
    "CREATE INDEX IF NOT EXISTS idx_feature_record ON feature(record_id)",
    "CREATE INDEX IF NOT EXISTS idx_record_genome ON record(genome_id)",
];

/// Index names, in creation order
pub const INDEX_NAMES: &[&str] = &[
    "idx_qualifier_feature",
    "idx_qualifier_feature_key",
    "idx_feature_record",
    "idx_record_genome",
];

/// Session pragmas for bulk import. Trades crash durability for write
/// throughput; a failed run is re-executed from an empty database.
pub const BULK_LOAD_PRAGMAS: &[(&str, &str)] = &[
    ("synchronous", "OFF"),
    ("temp_store", "MEMORY"),
    ("cache_size", "100000"),
];

/// Journal mode set alongside [`BULK_LOAD_PRAGMAS`]
pub const BULK_LOAD_JOURNAL_MODE: &str = "MEMORY";

/// All table creation statements, parents first
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![
        CREATE_GENOME_TABLE,
        CREATE_RECORD_TABLE,
        CREATE_FEATURE_TABLE,
        CREATE_QUALIFIER_TABLE,
    ]
}
