//! Typed filter predicates
//!
//! A [`Predicate`] is a conjunction of per-column constraints: equality,
//! set membership, or a numeric comparison. Constraints on distinct columns
//! are independent, so a predicate can be assembled in any order and applied
//! in one pass.
//!
//! Validation is eager: the table resolves every referenced column against
//! its declared schema, checks comparison constraints target numeric
//! columns, and rejects non-finite thresholds before any row is scanned.

use arrow::datatypes::DataType;

use crate::value::CellValue;
use crate::{Error, Result};

/// A single column constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Cell equals the given value
    Eq(CellValue),
    /// Cell is a member of the given set
    In(Vec<CellValue>),
    /// Cell is strictly less than the threshold
    Lt(f64),
    /// Cell is at most the threshold
    Le(f64),
    /// Cell is strictly greater than the threshold
    Gt(f64),
    /// Cell is at least the threshold
    Ge(f64),
}

impl Constraint {
    /// Whether this constraint only applies to numeric columns
    #[must_use]
    pub const fn requires_numeric(&self) -> bool {
        matches!(self, Self::Lt(_) | Self::Le(_) | Self::Gt(_) | Self::Ge(_))
    }

    /// Comparison threshold, if this is a numeric constraint
    #[must_use]
    pub const fn threshold(&self) -> Option<f64> {
        match self {
            Self::Lt(t) | Self::Le(t) | Self::Gt(t) | Self::Ge(t) => Some(*t),
            Self::Eq(_) | Self::In(_) => None,
        }
    }

    /// Evaluate the constraint against one cell
    ///
    /// Null cells fail every constraint except an explicit `Eq(Null)` or a
    /// membership set containing `Null`.
    #[must_use]
    pub fn matches(&self, cell: &CellValue) -> bool {
        match self {
            Self::Eq(expected) => cell == expected,
            Self::In(set) => set.contains(cell),
            Self::Lt(t) => cell.as_f64().is_some_and(|v| v < *t),
            Self::Le(t) => cell.as_f64().is_some_and(|v| v <= *t),
            Self::Gt(t) => cell.as_f64().is_some_and(|v| v > *t),
            Self::Ge(t) => cell.as_f64().is_some_and(|v| v >= *t),
        }
    }

    /// Check the constraint is applicable to a column of `data_type`
    ///
    /// # Errors
    /// Returns `Error::Schema` for a comparison on a non-numeric column and
    /// `Error::Value` for a non-finite threshold
    pub fn check_against(&self, column: &str, data_type: &DataType) -> Result<()> {
        if self.requires_numeric() {
            let numeric = matches!(
                data_type,
                DataType::Int32 | DataType::Int64 | DataType::Float32 | DataType::Float64
            );
            if !numeric {
                return Err(Error::Schema(format!(
                    "Comparison constraint on non-numeric column {column}: {data_type:?}"
                )));
            }
        }
        if let Some(t) = self.threshold() {
            if !t.is_finite() {
                return Err(Error::Value(format!(
                    "Threshold for column {column} must be finite, got {t}"
                )));
            }
        }
        Ok(())
    }
}

/// Conjunction of column constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    terms: Vec<(String, Constraint)>,
}

impl Predicate {
    /// Create an empty predicate (matches every row)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column` to equal `value`
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.terms.push((column.into(), Constraint::Eq(value.into())));
        self
    }

    /// Require `column` to be one of `values`
    #[must_use]
    pub fn is_in<I>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CellValue>,
    {
        let set = values.into_iter().map(Into::into).collect();
        self.terms.push((column.into(), Constraint::In(set)));
        self
    }

    /// Require `column` to be strictly less than `threshold`
    #[must_use]
    pub fn lt(mut self, column: impl Into<String>, threshold: f64) -> Self {
        self.terms.push((column.into(), Constraint::Lt(threshold)));
        self
    }

    /// Require `column` to be at most `threshold`
    #[must_use]
    pub fn le(mut self, column: impl Into<String>, threshold: f64) -> Self {
        self.terms.push((column.into(), Constraint::Le(threshold)));
        self
    }

    /// Require `column` to be strictly greater than `threshold`
    #[must_use]
    pub fn gt(mut self, column: impl Into<String>, threshold: f64) -> Self {
        self.terms.push((column.into(), Constraint::Gt(threshold)));
        self
    }

    /// Require `column` to be at least `threshold`
    #[must_use]
    pub fn ge(mut self, column: impl Into<String>, threshold: f64) -> Self {
        self.terms.push((column.into(), Constraint::Ge(threshold)));
        self
    }

    /// Append a pre-built constraint
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, constraint: Constraint) -> Self {
        self.terms.push((column.into(), constraint));
        self
    }

    /// Merge the terms of two predicates into one conjunction
    #[must_use]
    pub fn and(mut self, other: Self) -> Self {
        self.terms.extend(other.terms);
        self
    }

    /// The constraint terms, in insertion order
    #[must_use]
    pub fn terms(&self) -> &[(String, Constraint)] {
        &self.terms
    }

    /// Whether the predicate has no constraints
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
