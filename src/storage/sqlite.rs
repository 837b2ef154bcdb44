//! SQLite storage implementation

use super::rows::{insert_sql, TableRow};
use super::schema;
use crate::genbank::Record;
use crate::Result;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::Path;

/// SQLite-backed storage for converted GenBank files.
///
/// Owns its connection for the whole run; nothing else writes to the
/// database while a conversion is in progress.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create the four tables up front
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Read-only access for ad hoc queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Relax durability for bulk import throughput
    pub fn apply_bulk_pragmas(&self) -> Result<()> {
        let mode: String = self.conn.pragma_update_and_check(
            None,
            "journal_mode",
            schema::BULK_LOAD_JOURNAL_MODE,
            |row| row.get(0),
        )?;
        for &(name, value) in schema::BULK_LOAD_PRAGMAS {
            self.conn.pragma_update(None, name, value)?;
        }
        tracing::debug!("Applied bulk load pragmas (journal_mode = {})", mode);
        Ok(())
    }

    /// Create secondary indexes (no-op for indexes that already exist)
    pub fn create_indexes(&self) -> Result<()> {
        for stmt in schema::CREATE_INDEXES {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Names of all user-created indexes
    pub fn index_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;

        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(names)
    }

    // ========== Single-row Operations ==========

    /// Insert a genome row and return its id
    pub fn insert_genome(&self, gbk_path: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO genome (gbk_path) VALUES (?1)", [gbk_path])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a record row and return its id
    pub fn insert_record(&self, genome_id: i64, record: &Record) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO record (genome_id, name, definition, accession, version)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                genome_id,
                record.name,
                record.definition,
                record.accession,
                record.version,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // ========== Bulk Operations ==========

    /// Insert all rows in one transaction. Empty input opens no transaction.
    pub fn bulk_insert<R: TableRow>(&mut self, rows: &[R]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let sql = insert_sql(R::TABLE, R::COLUMNS);
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for row in rows {
                row.bind(&mut stmt)?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    // ========== Statistics ==========

    fn count(&self, table: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            genomes: self.count("genome")?,
            records: self.count("record")?,
            features: self.count("feature")?,
            qualifiers: self.count("qualifier")?,
        })
    }
}

/// Row counts per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DbStats {
    pub genomes: usize,
    pub records: usize,
    pub features: usize,
    pub qualifiers: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Genomes: {}", self.genomes)?;
        writeln!(f, "  Records: {}", self.records)?;
        writeln!(f, "  Features: {}", self.features)?;
        writeln!(f, "  Qualifiers: {}", self.qualifiers)
    }
}
