//! Row flattener - turns one record's nested features and qualifiers into
//! flat rows keyed by (genome_id, record_id, feature_index)

use crate::genbank::Record;
use crate::storage::{FeatureRow, QualifierRow};
use crate::Result;

/// Receiver of flattened rows, in emission order
pub trait RowSink {
    fn push_feature(&mut self, row: FeatureRow) -> Result<()>;
    fn push_qualifier(&mut self, row: QualifierRow) -> Result<()>;
}

/// A feature whose location had no strand attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFallback {
    pub record_name: String,
    pub feature_index: i64,
}

/// What flattening one record produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenSummary {
    pub features: usize,
    pub qualifiers: usize,
    pub fallbacks: Vec<LocationFallback>,
}

/// Emit one feature row per feature (index = position in the record, from
/// 0) followed by that feature's qualifier rows.
///
/// A location without strand information is not an error: it is logged,
/// reported in the summary, and stored with whatever bounds it has.
pub fn flatten_record<S: RowSink>(
    genome_id: i64,
    record_id: i64,
    record: &Record,
    sink: &mut S,
) -> Result<FlattenSummary> {
    let mut summary = FlattenSummary::default();

    for (idx, feature) in record.features.iter().enumerate() {
        let feature_index = idx as i64;

        if !feature.location.is_fully_specified() {
            tracing::warn!(
                "Feature {} of record {} does not have strand attribute",
                feature_index,
                record.name
            );
            summary.fallbacks.push(LocationFallback {
                record_name: record.name.clone(),
                feature_index,
            });
        }

        let location = &feature.location;
        sink.push_feature(FeatureRow {
            genome_id,
            record_id,
            feature_index,
            location_start: location.start(),
            location_end: location.end(),
            location_strand: location.strand().map(|s| s.as_str()),
        })?;
        summary.features += 1;

        for qualifier in &feature.qualifiers {
            sink.push_qualifier(QualifierRow {
                genome_id,
                record_id,
                feature_index,
                key: qualifier.key.clone(),
                value: qualifier.value.clone(),
            })?;
            summary.qualifiers += 1;
        }
    }

    Ok(summary)
}
