//! Declared table schemas
//!
//! A [`TableSchema`] names the columns a table is required to carry and the
//! semantic role of each: key columns drive filtering, grouping, and joins;
//! value columns hold measured or computed data. Validation against the
//! wrapped Arrow table happens eagerly at construction, never during a row
//! scan.

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::value::CellValue;
use crate::{Error, Result};

/// Semantic role of a declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Used to filter, group, or join rows
    Key,
    /// Holds measured or computed data
    Value,
}

/// Declared set of required key and value columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    key_columns: Vec<String>,
    value_columns: Vec<String>,
}

impl TableSchema {
    /// Declare a schema from key and value column names
    ///
    /// # Errors
    /// Returns `Error::Schema` if a name appears twice, in either role
    pub fn new<K, V>(key_columns: K, value_columns: V) -> Result<Self>
    where
        K: IntoIterator,
        K::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let key_columns: Vec<String> = key_columns.into_iter().map(Into::into).collect();
        let value_columns: Vec<String> = value_columns.into_iter().map(Into::into).collect();

        let mut seen = rustc_hash::FxHashSet::default();
        for name in key_columns.iter().chain(&value_columns) {
            if !seen.insert(name.as_str()) {
                return Err(Error::Schema(format!(
                    "Column declared more than once: {name}"
                )));
            }
        }

        Ok(Self {
            key_columns,
            value_columns,
        })
    }

    /// Fixed declarations with known-distinct names skip the duplicate check
    pub(crate) fn from_parts(key_columns: Vec<String>, value_columns: Vec<String>) -> Self {
        Self {
            key_columns,
            value_columns,
        }
    }

    /// Declared key columns, in declaration order
    #[must_use]
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    /// Declared value columns, in declaration order
    #[must_use]
    pub fn value_columns(&self) -> &[String] {
        &self.value_columns
    }

    /// All declared columns, keys first
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.key_columns
            .iter()
            .chain(&self.value_columns)
            .map(String::as_str)
    }

    /// Whether `column` is declared in either role
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.role_of(column).is_some()
    }

    /// Role of a declared column, `None` if undeclared
    #[must_use]
    pub fn role_of(&self, column: &str) -> Option<ColumnRole> {
        if self.key_columns.iter().any(|c| c == column) {
            Some(ColumnRole::Key)
        } else if self.value_columns.iter().any(|c| c == column) {
            Some(ColumnRole::Value)
        } else {
            None
        }
    }

    /// Check every declared column exists in `batch` with a supported type
    ///
    /// # Errors
    /// Returns `Error::Schema` naming the first missing or unsupported column
    pub fn validate_batch(&self, batch: &RecordBatch) -> Result<()> {
        let arrow_schema = batch.schema();
        for name in self.columns() {
            let field = arrow_schema
                .fields()
                .iter()
                .find(|f| f.name() == name)
                .ok_or_else(|| Error::Schema(format!("Required column missing: {name}")))?;
            if !CellValue::supports(field.data_type()) {
                return Err(Error::Schema(format!(
                    "Column {name} has unsupported type: {:?}",
                    field.data_type()
                )));
            }
        }
        Ok(())
    }
}
