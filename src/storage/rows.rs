//! Flat row types and their table bindings

use rusqlite::{params, Statement};

/// A row type that can be bulk-inserted.
///
/// `COLUMNS` fixes the column order; `bind` must supply values in exactly
/// that order.
pub trait TableRow {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Execute the prepared insert statement with this row's values
    fn bind(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize>;
}

/// Build `INSERT INTO table (a, b) VALUES (?1, ?2)`
pub fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// One row of the `feature` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    pub genome_id: i64,
    pub record_id: i64,
    pub feature_index: i64,
    pub location_start: Option<i64>,
    pub location_end: Option<i64>,
    pub location_strand: Option<&'static str>,
}

impl TableRow for FeatureRow {
    const TABLE: &'static str = "feature";
    const COLUMNS: &'static [&'static str] = &[
        "genome_id",
        "record_id",
        "feature_index",
        "location_start",
        "location_end",
        "location_strand",
    ];

    fn bind(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.genome_id,
            self.record_id,
            self.feature_index,
            self.location_start,
            self.location_end,
            self.location_strand,
        ])
    }
}

/// One row of the `qualifier` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifierRow {
    pub genome_id: i64,
    pub record_id: i64,
    pub feature_index: i64,
    pub key: String,
    pub value: Option<String>,
}

impl TableRow for QualifierRow {
    const TABLE: &'static str = "qualifier";
    const COLUMNS: &'static [&'static str] =
        &["genome_id", "record_id", "feature_index", "key", "value"];

    fn bind(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.genome_id,
            self.record_id,
            self.feature_index,
            self.key,
            self.value,
        ])
    }
}
