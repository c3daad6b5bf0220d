//! Per-term statistical enrichment results
//!
//! An [`EnrichmentResult`] is a [`BaseData`] with a fixed schema: one row
//! per enriched biological term (pathway, GO category) with its score and
//! significance measure. The scores themselves are computed upstream; this
//! layer only keys, filters, and thresholds them.

use std::path::Path;

use arrow::record_batch::RecordBatch;

use crate::predicate::{Constraint, Predicate};
use crate::schema::TableSchema;
use crate::table::BaseData;
use crate::value::CellValue;
use crate::{storage, Error, Result};

/// Term identifier key column (e.g. a GO or pathway accession)
pub const TERM: &str = "term";
/// Term category key column (e.g. the source ontology or database)
pub const CATEGORY: &str = "category";
/// Enrichment score value column
pub const SCORE: &str = "score";
/// Significance measure value column
pub const P_VALUE: &str = "p_value";

/// Comparison applied by [`EnrichmentResult::significant`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparator {
    /// Keep rows at or below the threshold (the usual p-value cutoff)
    #[default]
    Le,
    /// Keep rows strictly below the threshold
    Lt,
    /// Keep rows at or above the threshold
    Ge,
    /// Keep rows strictly above the threshold
    Gt,
}

impl Comparator {
    const fn constraint(self, threshold: f64) -> Constraint {
        match self {
            Self::Le => Constraint::Le(threshold),
            Self::Lt => Constraint::Lt(threshold),
            Self::Ge => Constraint::Ge(threshold),
            Self::Gt => Constraint::Gt(threshold),
        }
    }
}

/// Enrichment table: one row per term with score and significance
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentResult {
    data: BaseData,
}

impl EnrichmentResult {
    /// The fixed schema declaration for enrichment tables
    #[must_use]
    pub fn table_schema() -> TableSchema {
        TableSchema::from_parts(
            vec![TERM.to_string(), CATEGORY.to_string()],
            vec![SCORE.to_string(), P_VALUE.to_string()],
        )
    }

    /// Wrap a record batch carrying the enrichment columns
    ///
    /// # Errors
    /// Returns `Error::Schema` if a required column is missing or has an
    /// unsupported type
    pub fn new(batch: RecordBatch) -> Result<Self> {
        Ok(Self {
            data: BaseData::new(batch, Self::table_schema())?,
        })
    }

    /// Load an enrichment table from a Parquet file
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

    /// Rows satisfying `predicate`, as a new enrichment table
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

    /// Key-based join with another enrichment table
    ///
    /// The merged result carries suffixed value columns, so it is a generic
    /// [`BaseData`] rather than an `EnrichmentResult`.
    ///
    /// # Errors
    /// See [`BaseData::merge`]
    pub fn merge(&self, other: &Self, on: &[&str]) -> Result<BaseData> {
        self.data.merge(&other.data, on)
    }

    /// Rows whose significance measure satisfies `comparator` against
    /// `threshold`
    ///
    /// # Errors
    /// Returns `Error::Value` if `threshold` is not a finite number
    pub fn significant(&self, threshold: f64, comparator: Comparator) -> Result<Self> {
        if !threshold.is_finite() {
            return Err(Error::Value(format!(
                "Significance threshold must be finite, got {threshold}"
            )));
        }
        self.filter(&Predicate::new().with(P_VALUE, comparator.constraint(threshold)))
    }

    /// Rows significant at `threshold` under the default `<=` comparator
    ///
    /// # Errors
    /// See [`significant`](Self::significant)
    pub fn significant_at(&self, threshold: f64) -> Result<Self> {
        self.significant(threshold, Comparator::default())
    }

    /// Distinct enriched terms, in first-seen order
    ///
    /// # Errors
    /// See [`BaseData::unique`]
    pub fn terms(&self) -> Result<Vec<CellValue>> {
        self.unique(TERM)
    }

    /// Distinct term categories, in first-seen order
    ///
    /// # Errors
    /// See [`BaseData::unique`]
    pub fn categories(&self) -> Result<Vec<CellValue>> {
        self.unique(CATEGORY)
    }
}
