//! Conversion pipeline
//!
//! Reader → flattener → loader, one record at a time. Parent rows (genome,
//! record) are inserted immediately for their ids; feature and qualifier
//! rows go through the batch buffers. Indexes are built once at the end.

use crate::flatten::{flatten_record, LocationFallback};
use crate::loader::{BulkLoader, DEFAULT_BATCH_SIZE};
use crate::reader::iter_records;
use crate::storage::SqliteStore;
use crate::{Error, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// Knobs for one conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Rows buffered per table before a bulk insert
    pub batch_size: usize,
    /// Build secondary indexes after loading
    pub create_indexes: bool,
    /// Apply the bulk-load pragmas before loading
    pub tune_pragmas: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            create_indexes: true,
            tune_pragmas: true,
        }
    }
}

impl ConvertOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidBatchSize(self.batch_size));
        }
        Ok(())
    }
}

/// Outcome of converting one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub genome_id: i64,
    pub records: usize,
    pub features: usize,
    pub qualifiers: usize,
    pub feature_flushes: usize,
    pub qualifier_flushes: usize,
    pub fallbacks: Vec<LocationFallback>,
    pub elapsed: Duration,
}

/// Progress notification, sent after each record is loaded
#[derive(Debug, Clone, Copy)]
pub struct RecordProgress<'r> {
    pub records: usize,
    pub name: &'r str,
}

/// Drives conversions into one store.
///
/// Construction applies the session pragmas; [`Converter::finish`] builds
/// the indexes. Files converted in between each get their own genome row.
pub struct Converter<'a> {
    store: &'a mut SqliteStore,
    options: ConvertOptions,
}

impl<'a> Converter<'a> {
    pub fn new(store: &'a mut SqliteStore, options: ConvertOptions) -> Result<Self> {
        options.validate()?;
        if options.tune_pragmas {
            store.apply_bulk_pragmas()?;
        }
        Ok(Self { store, options })
    }

    /// Convert one GenBank file (`.gz` is decompressed on the fly)
    pub fn convert_file(&mut self, gbk_path: &Path) -> Result<ConversionStats> {
        self.convert_file_with_progress(gbk_path, |_| {})
    }

    pub fn convert_file_with_progress<F>(
        &mut self,
        gbk_path: &Path,
        mut on_record: F,
    ) -> Result<ConversionStats>
    where
        F: FnMut(RecordProgress<'_>),
    {
        let started = Instant::now();
        tracing::info!(
            "Converting {} to SQLite database using batch size {}",
            gbk_path.display(),
            self.options.batch_size
        );

        // genome.gbk_path is TEXT; refuse paths that would not survive the trip
        let path_text = gbk_path
            .to_str()
            .ok_or_else(|| Error::NonUtf8Path(gbk_path.to_path_buf()))?;
        // open before touching the database so a missing file leaves no genome row
        let records = iter_records(gbk_path)?;
        let genome_id = self.store.insert_genome(path_text)?;
        let mut stats = ConversionStats {
            genome_id,
            ..Default::default()
        };

        let mut loader = BulkLoader::new(self.store, self.options.batch_size)?;
        for record in records {
            let record = record?;
            let record_id = loader.store().insert_record(genome_id, &record)?;
            let summary = flatten_record(genome_id, record_id, &record, &mut loader)?;

            stats.records += 1;
            stats.fallbacks.extend(summary.fallbacks);
            on_record(RecordProgress {
                records: stats.records,
                name: &record.name,
            });
        }

        let load = loader.finish()?;
        stats.features = load.features_written;
        stats.qualifiers = load.qualifiers_written;
        stats.feature_flushes = load.feature_flushes;
        stats.qualifier_flushes = load.qualifier_flushes;
        stats.elapsed = started.elapsed();

        tracing::info!(
            "Loaded {}: {} records, {} features, {} qualifiers in {:?}",
            gbk_path.display(),
            stats.records,
            stats.features,
            stats.qualifiers,
            stats.elapsed
        );
        if !stats.fallbacks.is_empty() {
            // each fallback was already warned about by the flattener
            tracing::info!(
                "{} features in {} had no strand information",
                stats.fallbacks.len(),
                gbk_path.display()
            );
        }

        Ok(stats)
    }

    /// Convert several files in order
    pub fn convert_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Vec<ConversionStats>> {
        paths
            .iter()
            .map(|path| self.convert_file(path.as_ref()))
            .collect()
    }

    /// Build indexes (if enabled) once all data is loaded
    pub fn finish(self) -> Result<()> {
        if self.options.create_indexes {
            tracing::info!("Creating indexes");
            self.store.create_indexes()?;
        }
        Ok(())
    }
}

/// Convert one file into the database at `db_path`, creating it if needed
pub fn convert_gbk_to_sqlite(
    gbk_path: &Path,
    db_path: &Path,
    options: ConvertOptions,
) -> Result<ConversionStats> {
    let mut store = SqliteStore::open(db_path)?;
    let mut converter = Converter::new(&mut store, options)?;
    let stats = converter.convert_file(gbk_path)?;
    converter.finish()?;
    Ok(stats)
}
