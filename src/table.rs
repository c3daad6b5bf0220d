//! The shared query layer over Arrow tables
//!
//! [`BaseData`] wraps one Arrow [`RecordBatch`] together with a declared
//! [`TableSchema`] and exposes the semantic operations every specialized
//! table builds on: `filter`, `unique`, `group_by`, `merge`, `to_batch`.
//!
//! Design rules:
//! - Value semantics: every operation returns a new instance; nothing
//!   mutates in place. Columns are `Arc`ed, so instances are cheap to clone
//!   and safe for concurrent readers.
//! - Eager contract checks: schema violations surface before any row scan.
//! - Computation delegates to the Arrow kernels (`filter_record_batch`,
//!   `take`, `interleave`); this layer only decides *which* rows.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, UInt32Array};
use arrow::compute;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::predicate::{Constraint, Predicate};
use crate::schema::TableSchema;
use crate::value::CellValue;
use crate::{Error, Result};

/// Join strategy for [`BaseData::merge_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    /// Keep only rows whose key combination appears on both sides
    #[default]
    Inner,
    /// Keep every row; the missing side is filled with nulls
    Outer,
}

/// Configurable merge policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Join strategy (default inner)
    pub kind: JoinKind,
    /// Suffixes appended to colliding non-key column names, `(left, right)`
    pub suffixes: (String, String),
    /// Require the full key combination to be unique on each side
    pub validate: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            kind: JoinKind::Inner,
            suffixes: ("_x".to_string(), "_y".to_string()),
            validate: false,
        }
    }
}

/// A queryable experimental-data table
///
/// Wraps an Arrow `RecordBatch` plus the declared key/value columns. The
/// batch may carry more columns than the declaration requires; operations
/// may only reference declared columns.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseData {
    batch: RecordBatch,
    schema: TableSchema,
}

impl BaseData {
    /// Wrap a record batch under a declared schema
    ///
    /// This is the only ingress point into the query layer.
    ///
    /// # Errors
    /// Returns `Error::Schema` if a declared column is missing from the
    /// batch or has an unsupported type
    pub fn new(batch: RecordBatch, schema: TableSchema) -> Result<Self> {
        schema.validate_batch(&batch)?;
        Ok(Self { batch, schema })
    }

    /// The declared schema
    #[must_use]
    pub const fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// The underlying engine table (read-only view semantics)
    ///
    /// This is the only egress point back to Arrow for persistence,
    /// display, or statistics. Mutating data reached through the returned
    /// view is unsupported.
    #[must_use]
    pub const fn to_batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Consume the table, returning the engine batch
    #[must_use]
    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    /// Rows satisfying every constraint of `predicate`
    ///
    /// # Errors
    /// Returns `Error::Schema` if a constraint references an undeclared
    /// column or compares a non-numeric one, `Error::Value` for a
    /// non-finite threshold. Validation completes before any row is
    /// scanned; on failure the receiver is untouched.
    pub fn filter(&self, predicate: &Predicate) -> Result<Self> {
        let arrow_schema = self.batch.schema();
        let mut resolved: Vec<(usize, &Constraint)> = Vec::with_capacity(predicate.terms().len());
        for (column, constraint) in predicate.terms() {
            let idx = self.column_index(column)?;
            constraint.check_against(column, arrow_schema.field(idx).data_type())?;
            resolved.push((idx, constraint));
        }

        let mut mask = Vec::with_capacity(self.batch.num_rows());
        for row in 0..self.batch.num_rows() {
            let mut keep = true;
            for (idx, constraint) in &resolved {
                let cell = CellValue::from_column(self.batch.column(*idx), row)?;
                if !constraint.matches(&cell) {
                    keep = false;
                    break;
                }
            }
            mask.push(keep);
        }

        let filtered = compute::filter_record_batch(&self.batch, &BooleanArray::from(mask))?;
        Ok(Self {
            batch: filtered,
            schema: self.schema.clone(),
        })
    }

    /// Distinct values of `column`, in first-seen order
    ///
    /// # Errors
    /// Returns `Error::Schema` if `column` is not declared
    pub fn unique(&self, column: &str) -> Result<Vec<CellValue>> {
        let idx = self.column_index(column)?;
        let col = self.batch.column(idx);
        let mut seen = FxHashSet::default();
        let mut values = Vec::new();
        for row in 0..self.batch.num_rows() {
            let cell = CellValue::from_column(col, row)?;
            if seen.insert(cell.clone()) {
                values.push(cell);
            }
        }
        Ok(values)
    }

    /// Partition rows by the distinct combination of `columns`
    ///
    /// Groups appear in first-seen order; each partition shares the parent
    /// schema. An empty table yields an empty partition list.
    ///
    /// # Errors
    /// Returns `Error::Schema` on an undeclared column
    #[allow(clippy::cast_possible_truncation)]
    pub fn group_by(&self, columns: &[&str]) -> Result<Vec<(Vec<CellValue>, Self)>> {
        let idxs: Vec<usize> = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<_>>()?;

        let mut order: Vec<Vec<CellValue>> = Vec::new();
        let mut groups: FxHashMap<Vec<CellValue>, Vec<u32>> = FxHashMap::default();
        for row in 0..self.batch.num_rows() {
            let key = key_at(&self.batch, &idxs, row)?;
            match groups.entry(key) {
                Entry::Occupied(mut e) => e.get_mut().push(row as u32),
                Entry::Vacant(e) => {
                    order.push(e.key().clone());
                    e.insert(vec![row as u32]);
                }
            }
        }

        let mut partitions = Vec::with_capacity(order.len());
        for key in order {
            let rows = groups.remove(&key).unwrap_or_default();
            let batch = take_batch(&self.batch, &UInt32Array::from(rows))?;
            partitions.push((
                key,
                Self {
                    batch,
                    schema: self.schema.clone(),
                },
            ));
        }
        Ok(partitions)
    }

    /// Inner join with `other` on the given key columns
    ///
    /// Shorthand for [`merge_with`](Self::merge_with) with default options.
    ///
    /// # Errors
    /// See [`merge_with`](Self::merge_with)
    pub fn merge(&self, other: &Self, on: &[&str]) -> Result<Self> {
        self.merge_with(other, on, &MergeOptions::default())
    }

    /// Key-based join combining rows of `self` and `other`
    ///
    /// Rows pair up wherever their `on` key combinations match; with
    /// [`JoinKind::Inner`] unmatched rows are dropped, with
    /// [`JoinKind::Outer`] they are kept and the missing side is
    /// null-filled. The result carries each `on` column once, then both
    /// sides' remaining columns; a colliding non-key name gets the
    /// deterministic suffix of its originating side. The result's key
    /// columns are exactly `on`; everything else becomes a value column.
    ///
    /// # Errors
    /// Returns `Error::Schema` if an `on` column is missing from either
    /// side or its types disagree, `Error::Value` for an empty `on` list
    /// or, when `options.validate` is set, a duplicated key combination
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::too_many_lines)]
    pub fn merge_with(&self, other: &Self, on: &[&str], options: &MergeOptions) -> Result<Self> {
        if on.is_empty() {
            return Err(Error::Value(
                "Merge requires at least one key column".to_string(),
            ));
        }
        let left_idx: Vec<usize> = on
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<_>>()?;
        let right_idx: Vec<usize> = on
            .iter()
            .map(|c| other.column_index(c))
            .collect::<Result<_>>()?;

        let left_schema = self.batch.schema();
        let right_schema = other.batch.schema();
        for (pos, name) in on.iter().enumerate() {
            let l = left_schema.field(left_idx[pos]).data_type();
            let r = right_schema.field(right_idx[pos]).data_type();
            if l != r {
                return Err(Error::Schema(format!(
                    "Merge key {name} has mismatched types: {l:?} vs {r:?}"
                )));
            }
        }

        // Hash the right side by key combination.
        let mut right_keys: FxHashMap<Vec<CellValue>, Vec<u32>> = FxHashMap::default();
        for row in 0..other.batch.num_rows() {
            let key = key_at(&other.batch, &right_idx, row)?;
            right_keys.entry(key).or_default().push(row as u32);
        }

        if options.validate {
            if let Some(key) = right_keys.iter().find(|(_, rows)| rows.len() > 1) {
                return Err(Error::Value(format!(
                    "Duplicate key combination on right side of merge: {:?}",
                    key.0
                )));
            }
            let mut left_seen = FxHashSet::default();
            for row in 0..self.batch.num_rows() {
                let key = key_at(&self.batch, &left_idx, row)?;
                if !left_seen.insert(key.clone()) {
                    return Err(Error::Value(format!(
                        "Duplicate key combination on left side of merge: {key:?}"
                    )));
                }
            }
        }

        // Pair up rows. key_sources records which side supplies the key
        // columns of each output row: (0, row) = left, (1, row) = right.
        let outer = options.kind == JoinKind::Outer;
        let mut left_take: Vec<Option<u32>> = Vec::new();
        let mut right_take: Vec<Option<u32>> = Vec::new();
        let mut key_sources: Vec<(usize, usize)> = Vec::new();
        let mut matched_right = vec![false; other.batch.num_rows()];
        for row in 0..self.batch.num_rows() {
            let key = key_at(&self.batch, &left_idx, row)?;
            if let Some(rows) = right_keys.get(&key) {
                for &r in rows {
                    left_take.push(Some(row as u32));
                    right_take.push(Some(r));
                    key_sources.push((0, row));
                    matched_right[r as usize] = true;
                }
            } else if outer {
                left_take.push(Some(row as u32));
                right_take.push(None);
                key_sources.push((0, row));
            }
        }
        if outer {
            for (row, hit) in matched_right.iter().enumerate() {
                if !hit {
                    left_take.push(None);
                    right_take.push(Some(row as u32));
                    key_sources.push((1, row));
                }
            }
        }
        let left_indices = UInt32Array::from(left_take);
        let right_indices = UInt32Array::from(right_take);

        let on_set: FxHashSet<&str> = on.iter().copied().collect();
        let left_value_names: FxHashSet<&str> = left_schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .filter(|n| !on_set.contains(n))
            .collect();
        let right_value_names: FxHashSet<&str> = right_schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .filter(|n| !on_set.contains(n))
            .collect();

        let mut fields: Vec<Field> = Vec::new();
        let mut columns: Vec<ArrayRef> = Vec::new();

        // Key columns once, reconciled from whichever side owns each row.
        for (pos, name) in on.iter().enumerate() {
            let l_col = self.batch.column(left_idx[pos]);
            let r_col = other.batch.column(right_idx[pos]);
            let arrays: [&dyn Array; 2] = [l_col.as_ref(), r_col.as_ref()];
            let merged = compute::interleave(&arrays, &key_sources)?;
            let nullable = left_schema.field(left_idx[pos]).is_nullable()
                || right_schema.field(right_idx[pos]).is_nullable();
            fields.push(Field::new(
                (*name).to_string(),
                merged.data_type().clone(),
                nullable,
            ));
            columns.push(merged);
        }

        for (i, field) in left_schema.fields().iter().enumerate() {
            if on_set.contains(field.name().as_str()) {
                continue;
            }
            let taken = compute::take(self.batch.column(i).as_ref(), &left_indices, None)?;
            let name = if right_value_names.contains(field.name().as_str()) {
                format!("{}{}", field.name(), options.suffixes.0)
            } else {
                field.name().clone()
            };
            fields.push(Field::new(
                name,
                field.data_type().clone(),
                field.is_nullable() || outer,
            ));
            columns.push(taken);
        }
        for (i, field) in right_schema.fields().iter().enumerate() {
            if on_set.contains(field.name().as_str()) {
                continue;
            }
            let taken = compute::take(other.batch.column(i).as_ref(), &right_indices, None)?;
            let name = if left_value_names.contains(field.name().as_str()) {
                format!("{}{}", field.name(), options.suffixes.1)
            } else {
                field.name().clone()
            };
            fields.push(Field::new(
                name,
                field.data_type().clone(),
                field.is_nullable() || outer,
            ));
            columns.push(taken);
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        let value_columns: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .filter(|n| !on_set.contains(n.as_str()))
            .collect();
        let schema = TableSchema::new(on.iter().map(ToString::to_string), value_columns)?;

        tracing::debug!(
            left_rows = self.num_rows(),
            right_rows = other.num_rows(),
            result_rows = batch.num_rows(),
            "merged tables"
        );
        Ok(Self { batch, schema })
    }

    /// Index of a declared column in the wrapped batch
    fn column_index(&self, name: &str) -> Result<usize> {
        if !self.schema.contains(name) {
            return Err(Error::Schema(format!(
                "Column not in declared schema: {name}"
            )));
        }
        self.batch.schema().index_of(name).map_err(Error::from)
    }
}

/// Key tuple of one row
fn key_at(batch: &RecordBatch, indices: &[usize], row: usize) -> Result<Vec<CellValue>> {
    indices
        .iter()
        .map(|&i| CellValue::from_column(batch.column(i), row))
        .collect()
}

/// Gather rows by index into a new batch under the same Arrow schema
fn take_batch(batch: &RecordBatch, indices: &UInt32Array) -> Result<RecordBatch> {
    let columns = batch
        .columns()
        .iter()
        .map(|col| compute::take(col.as_ref(), indices, None).map_err(Error::from))
        .collect::<Result<Vec<ArrayRef>>>()?;
    RecordBatch::try_new(batch.schema(), columns).map_err(Error::from)
}
