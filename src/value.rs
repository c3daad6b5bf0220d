//! Dynamically typed scalar cells
//!
//! Query operations (predicates, unique-value extraction, group keys, join
//! keys) traffic in engine-agnostic scalars rather than Arrow arrays. A
//! [`CellValue`] is one cell of a table, restricted to the column types the
//! crate supports: string, integer, float, boolean, null.
//!
//! `CellValue` is `Eq`, `Ord`, and `Hash` so it can key hash maps and
//! ordered sets; floats compare via `total_cmp` and hash via `to_bits`.

use std::fmt;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;

use crate::{Error, Result};

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// String or categorical value
    Str(String),
    /// Integer value (Int32 columns are widened to i64)
    Int(i64),
    /// Floating-point value (Float32 columns are widened to f64)
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Missing value
    Null,
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        const fn discriminant(v: &CellValue) -> u8 {
            match v {
                CellValue::Null => 0,
                CellValue::Bool(_) => 1,
                CellValue::Int(_) => 2,
                CellValue::Float(_) => 3,
                CellValue::Str(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Str(s) => s.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::Bool(b) => b.hash(state),
            Self::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for numeric comparisons
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether the value is [`CellValue::Null`]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Extract the cell at `row` from an Arrow column
    ///
    /// # Errors
    /// Returns `Error::Schema` if the column's data type is unsupported
    pub fn from_column(column: &ArrayRef, row: usize) -> Result<Self> {
        if column.is_null(row) {
            return Ok(Self::Null);
        }
        match column.data_type() {
            DataType::Utf8 => {
                let array = column
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .ok_or_else(|| {
                        Error::Schema("Failed to downcast Utf8 column to StringArray".to_string())
                    })?;
                Ok(Self::Str(array.value(row).to_string()))
            }
            DataType::Int32 => {
                let array = column
                    .as_any()
                    .downcast_ref::<Int32Array>()
                    .ok_or_else(|| {
                        Error::Schema("Failed to downcast Int32 column to Int32Array".to_string())
                    })?;
                Ok(Self::Int(i64::from(array.value(row))))
            }
            DataType::Int64 => {
                let array = column
                    .as_any()
                    .downcast_ref::<Int64Array>()
                    .ok_or_else(|| {
                        Error::Schema("Failed to downcast Int64 column to Int64Array".to_string())
                    })?;
                Ok(Self::Int(array.value(row)))
            }
            DataType::Float32 => {
                let array = column
                    .as_any()
                    .downcast_ref::<Float32Array>()
                    .ok_or_else(|| {
                        Error::Schema(
                            "Failed to downcast Float32 column to Float32Array".to_string(),
                        )
                    })?;
                Ok(Self::Float(f64::from(array.value(row))))
            }
            DataType::Float64 => {
                let array = column
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .ok_or_else(|| {
                        Error::Schema(
                            "Failed to downcast Float64 column to Float64Array".to_string(),
                        )
                    })?;
                Ok(Self::Float(array.value(row)))
            }
            DataType::Boolean => {
                let array = column
                    .as_any()
                    .downcast_ref::<BooleanArray>()
                    .ok_or_else(|| {
                        Error::Schema(
                            "Failed to downcast Boolean column to BooleanArray".to_string(),
                        )
                    })?;
                Ok(Self::Bool(array.value(row)))
            }
            dt => Err(Error::Schema(format!("Unsupported column type: {dt:?}"))),
        }
    }

    /// Whether a column of this Arrow type can be wrapped by the crate
    #[must_use]
    pub const fn supports(data_type: &DataType) -> bool {
        matches!(
            data_type,
            DataType::Utf8
                | DataType::Int32
                | DataType::Int64
                | DataType::Float32
                | DataType::Float64
                | DataType::Boolean
        )
    }
}
