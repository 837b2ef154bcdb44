//! Batch buffer & bulk loader
//!
//! Feature and qualifier rows are buffered per table and written in one
//! transaction per batch. The two buffers flush independently.

use crate::flatten::RowSink;
use crate::storage::{FeatureRow, QualifierRow, SqliteStore, TableRow};
use crate::{Error, Result};

/// Default number of buffered rows per table before a flush
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Rows waiting to be written to one table
#[derive(Debug)]
pub struct BatchBuffer<R> {
    rows: Vec<R>,
    batch_size: usize,
    flushes: usize,
    written: usize,
}

impl<R: TableRow> BatchBuffer<R> {
    pub fn new(batch_size: usize) -> Self {
        Self {
            rows: Vec::with_capacity(batch_size.min(DEFAULT_BATCH_SIZE)),
            batch_size,
            flushes: 0,
            written: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of bulk inserts performed so far
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Number of rows written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Buffer a row, flushing when the buffer reaches the batch size.
    /// Returns whether a flush happened.
    pub fn push(&mut self, row: R, store: &mut SqliteStore) -> Result<bool> {
        self.rows.push(row);
        if self.rows.len() >= self.batch_size {
            self.flush(store)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Write every buffered row in one transaction and clear the buffer
    pub fn flush(&mut self, store: &mut SqliteStore) -> Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }

        let count = store.bulk_insert(&self.rows)?;
        tracing::debug!("Flushed {} rows into {}", count, R::TABLE);
        self.rows.clear();
        self.flushes += 1;
        self.written += count;
        Ok(())
    }
}

/// Flush counters reported at the end of a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub features_written: usize,
    pub qualifiers_written: usize,
    pub feature_flushes: usize,
    pub qualifier_flushes: usize,
}

/// Buffers flattened rows and bulk-inserts them through the store it holds
pub struct BulkLoader<'a> {
    store: &'a mut SqliteStore,
    features: BatchBuffer<FeatureRow>,
    qualifiers: BatchBuffer<QualifierRow>,
}

impl<'a> BulkLoader<'a> {
    pub fn new(store: &'a mut SqliteStore, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize(batch_size));
        }
        Ok(Self {
            store,
            features: BatchBuffer::new(batch_size),
            qualifiers: BatchBuffer::new(batch_size),
        })
    }

    /// The store, for single-row inserts of parent rows
    pub fn store(&self) -> &SqliteStore {
        &*self.store
    }

    /// Rows currently buffered: (features, qualifiers)
    pub fn pending(&self) -> (usize, usize) {
        (self.features.len(), self.qualifiers.len())
    }

    fn stats(&self) -> LoadStats {
        LoadStats {
            features_written: self.features.written(),
            qualifiers_written: self.qualifiers.written(),
            feature_flushes: self.features.flushes(),
            qualifier_flushes: self.qualifiers.flushes(),
        }
    }

    /// Flush whatever remains in both buffers and report totals
    pub fn finish(mut self) -> Result<LoadStats> {
        self.features.flush(self.store)?;
        self.qualifiers.flush(self.store)?;
        Ok(self.stats())
    }
}

impl RowSink for BulkLoader<'_> {
    fn push_feature(&mut self, row: FeatureRow) -> Result<()> {
        self.features.push(row, self.store)?;
        Ok(())
    }

    fn push_qualifier(&mut self, row: QualifierRow) -> Result<()> {
        self.qualifiers.push(row, self.store)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_row(record_id: i64, feature_index: i64) -> FeatureRow {
        FeatureRow {
            genome_id: 1,
            record_id,
            feature_index,
            location_start: Some(0),
            location_end: Some(10),
            location_strand: Some("+"),
        }
    }

    fn qualifier_row(feature_index: i64) -> QualifierRow {
        QualifierRow {
            genome_id: 1,
            record_id: 1,
            feature_index,
            key: "gene".to_string(),
            value: Some("x".to_string()),
        }
    }

    fn store_with_record() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        let genome_id = store.insert_genome("test.gbk").unwrap();
        store
            .insert_record(
                genome_id,
                &crate::genbank::Record {
                    name: "R".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        store
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(
            BulkLoader::new(&mut store, 0),
            Err(Error::InvalidBatchSize(0))
        ));
    }

    #[test]
    fn test_flush_at_threshold() {
        let mut store = store_with_record();
        let mut buffer = BatchBuffer::new(2);

        assert!(!buffer.push(feature_row(1, 0), &mut store).unwrap());
        assert!(buffer.push(feature_row(1, 1), &mut store).unwrap());
        assert!(buffer.is_empty());
        assert_eq!(store.stats().unwrap().features, 2);

        assert!(!buffer.push(feature_row(1, 2), &mut store).unwrap());
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.flushes(), 1);
    }

    #[test]
    fn test_buffers_flush_independently() {
        let mut store = store_with_record();
        let mut loader = BulkLoader::new(&mut store, 3).unwrap();

        for i in 0..3 {
            loader.push_qualifier(qualifier_row(i)).unwrap();
        }
        loader.push_feature(feature_row(1, 0)).unwrap();
        assert_eq!(loader.pending(), (1, 0));
        assert_eq!(loader.store().stats().unwrap().qualifiers, 3);
        assert_eq!(loader.store().stats().unwrap().features, 0);

        let stats = loader.finish().unwrap();
        assert_eq!(
            stats,
            LoadStats {
                features_written: 1,
                qualifiers_written: 3,
                feature_flushes: 1,
                qualifier_flushes: 1,
            }
        );
        assert_eq!(store.stats().unwrap().features, 1);
    }

    #[test]
    fn test_finish_with_empty_buffers() {
        let mut store = store_with_record();
        let loader = BulkLoader::new(&mut store, 10).unwrap();
        let stats = loader.finish().unwrap();
        assert_eq!(stats, LoadStats::default());
    }
}
