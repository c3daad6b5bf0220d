//! Per-condition, per-replicate species measurements
//!
//! A [`Sample`] is a [`BaseData`] with a fixed schema: one row per measured
//! species (or gene) per condition per replicate. The specialization adds
//! condition and replicate shorthands on top of the generic query layer;
//! it introduces no new invariants.

use std::path::Path;

use arrow::record_batch::RecordBatch;

use crate::predicate::Predicate;
use crate::schema::TableSchema;
use crate::table::BaseData;
use crate::value::CellValue;
use crate::{storage, Result};

/// Species or gene identifier key column
pub const IDENTIFIER: &str = "identifier";
/// Experimental condition key column
pub const CONDITION: &str = "condition";
/// Replicate number key column
pub const REPLICATE: &str = "replicate";
/// Measured value column
pub const VALUE: &str = "value";

/// Measurement table: one row per species per condition per replicate
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    data: BaseData,
}

/// Alias used when the table holds a whole experiment rather than one sample
pub type ExperimentalData = Sample;

impl Sample {
    /// The fixed schema declaration for measurement tables
    #[must_use]
    pub fn table_schema() -> TableSchema {
        TableSchema::from_parts(
            vec![
                IDENTIFIER.to_string(),
                CONDITION.to_string(),
                REPLICATE.to_string(),
            ],
            vec![VALUE.to_string()],
        )
    }

    /// Wrap a record batch carrying the measurement columns
    ///
    /// # Errors
    /// Returns `Error::Schema` if a required column is missing or has an
    /// unsupported type
    pub fn new(batch: RecordBatch) -> Result<Self> {
        Ok(Self {
            data: BaseData::new(batch, Self::table_schema())?,
        })
    }

    /// Load a measurement table from a Parquet file
    ///
    /// # Errors
    /// Returns `Error::Storage` if the file cannot be read and
    /// `Error::Schema` if the loaded table misses a required column
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(storage::read_parquet(path)?)
    }

    fn wrap(data: BaseData) -> Self {
        Self { data }
    }

    /// The generic query layer underneath
    #[must_use]
    pub const fn data(&self) -> &BaseData {
        &self.data
    }

    /// The underlying engine table (read-only view semantics)
    #[must_use]
    pub const fn to_batch(&self) -> &RecordBatch {
        self.data.to_batch()
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.data.num_rows()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Rows satisfying `predicate`, as a new measurement table
    ///
    /// # Errors
    /// See [`BaseData::filter`]
    pub fn filter(&self, predicate: &Predicate) -> Result<Self> {
        Ok(Self::wrap(self.data.filter(predicate)?))
    }

    /// Distinct values of `column`, in first-seen order
    ///
    /// # Errors
    /// See [`BaseData::unique`]
    pub fn unique(&self, column: &str) -> Result<Vec<CellValue>> {
        self.data.unique(column)
    }

    /// Partition rows by the distinct combination of `columns`
    ///
    /// # Errors
    /// See [`BaseData::group_by`]
    pub fn group_by(&self, columns: &[&str]) -> Result<Vec<(Vec<CellValue>, Self)>> {
        Ok(self
            .data
            .group_by(columns)?
            .into_iter()
            .map(|(key, part)| (key, Self::wrap(part)))
            .collect())
    }

    /// Key-based join with another measurement table
    ///
    /// The merged result carries suffixed value columns, so it is a generic
    /// [`BaseData`] rather than a `Sample`.
    ///
    /// # Errors
    /// See [`BaseData::merge`]
    pub fn merge(&self, other: &Self, on: &[&str]) -> Result<BaseData> {
        self.data.merge(&other.data, on)
    }

    /// Rows measured under `condition`
    ///
    /// # Errors
    /// See [`BaseData::filter`]
    pub fn by_condition(&self, condition: impl Into<CellValue>) -> Result<Self> {
        self.filter(&Predicate::new().eq(CONDITION, condition))
    }

    /// Rows for one species, partitioned by replicate
    ///
    /// # Errors
    /// See [`BaseData::filter`] and [`BaseData::group_by`]
    pub fn replicates_of(
        &self,
        identifier: impl Into<CellValue>,
    ) -> Result<Vec<(CellValue, Self)>> {
        let matching = self.filter(&Predicate::new().eq(IDENTIFIER, identifier))?;
        Ok(matching
            .group_by(&[REPLICATE])?
            .into_iter()
            .map(|(mut key, part)| (key.pop().unwrap_or(CellValue::Null), part))
            .collect())
    }

    /// Distinct measured species, in first-seen order
    ///
    /// # Errors
    /// See [`BaseData::unique`]
    pub fn identifiers(&self) -> Result<Vec<CellValue>> {
        self.unique(IDENTIFIER)
    }

    /// Distinct experimental conditions, in first-seen order
    ///
    /// # Errors
    /// See [`BaseData::unique`]
    pub fn conditions(&self) -> Result<Vec<CellValue>> {
        self.unique(CONDITION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn two_condition_sample() -> Sample {
        let schema = Arc::new(Schema::new(vec![
            Field::new(IDENTIFIER, DataType::Utf8, false),
            Field::new(CONDITION, DataType::Utf8, false),
            Field::new(REPLICATE, DataType::Int64, false),
            Field::new(VALUE, DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["TP53", "TP53"])),
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Int64Array::from(vec![1, 1])),
                Arc::new(Float64Array::from(vec![5.0, 7.0])),
            ],
        )
        .unwrap();
        Sample::new(batch).unwrap()
    }

    #[test]
    fn test_by_condition_selects_exactly_matching_rows() {
        let sample = two_condition_sample();
        let a = sample.by_condition("A").unwrap();
        assert_eq!(a.num_rows(), 1);
        assert_eq!(
            a.unique(VALUE).unwrap(),
            vec![CellValue::Float(5.0)]
        );
    }

    #[test]
    fn test_unique_identifier() {
        let sample = two_condition_sample();
        assert_eq!(
            sample.identifiers().unwrap(),
            vec![CellValue::from("TP53")]
        );
    }

    #[test]
    fn test_replicates_of_groups_by_replicate() {
        let sample = two_condition_sample();
        let reps = sample.replicates_of("TP53").unwrap();
        assert_eq!(reps.len(), 1);
        assert_eq!(reps[0].0, CellValue::Int(1));
        assert_eq!(reps[0].1.num_rows(), 2);
    }

    #[test]
    fn test_missing_replicate_column_fails_construction() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(IDENTIFIER, DataType::Utf8, false),
            Field::new(CONDITION, DataType::Utf8, false),
            Field::new(VALUE, DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["TP53"])),
                Arc::new(StringArray::from(vec!["A"])),
                Arc::new(Float64Array::from(vec![5.0])),
            ],
        )
        .unwrap();
        assert!(Sample::new(batch).is_err());
    }
}
