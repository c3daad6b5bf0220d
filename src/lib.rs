//! # Biotable: Columnar Experimental-Biology Tables
//!
//! Biotable manages tabular experimental biological data — species-level
//! measurements and downstream enrichment-analysis results — as structured,
//! queryable tables on top of Apache Arrow.
//!
//! The core is [`BaseData`]: a wrapper around an Arrow `RecordBatch` plus a
//! declared [`TableSchema`], exposing semantic query operations (filter by
//! key, unique-value extraction, grouped partitioning, key-based merge)
//! with eager schema enforcement. Two specializations build on it:
//!
//! - [`Sample`] (alias [`ExperimentalData`]): per-condition, per-replicate
//!   species measurements
//! - [`EnrichmentResult`]: per-term statistical results with a
//!   significance-threshold filter
//!
//! Every operation returns a new instance; nothing mutates in place.
//! Columns are refcounted, so instances are cheap to clone and safe for
//! concurrent readers.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{Float64Array, Int64Array, RecordBatch, StringArray};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use biotable::{sample, Sample};
//!
//! # fn main() -> biotable::Result<()> {
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new(sample::IDENTIFIER, DataType::Utf8, false),
//!     Field::new(sample::CONDITION, DataType::Utf8, false),
//!     Field::new(sample::REPLICATE, DataType::Int64, false),
//!     Field::new(sample::VALUE, DataType::Float64, false),
//! ]));
//! let batch = RecordBatch::try_new(
//!     schema,
//!     vec![
//!         Arc::new(StringArray::from(vec!["TP53", "TP53"])),
//!         Arc::new(StringArray::from(vec!["control", "treated"])),
//!         Arc::new(Int64Array::from(vec![1, 1])),
//!         Arc::new(Float64Array::from(vec![5.0, 7.0])),
//!     ],
//! )?;
//!
//! let sample = Sample::new(batch)?;
//! let treated = sample.by_condition("treated")?;
//! assert_eq!(treated.num_rows(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod enrichment;
pub mod error;
pub mod predicate;
pub mod sample;
pub mod schema;
pub mod storage;
pub mod table;
pub mod value;

pub use enrichment::{Comparator, EnrichmentResult};
pub use error::{Error, Result};
pub use predicate::{Constraint, Predicate};
pub use sample::{ExperimentalData, Sample};
pub use schema::{ColumnRole, TableSchema};
pub use table::{BaseData, JoinKind, MergeOptions};
pub use value::CellValue;
