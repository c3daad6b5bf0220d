//! Load/save boundary (Parquet)
//!
//! The minimal persistence contract: one `RecordBatch` in, one out. Row
//! groups of a file are concatenated into a single batch on read, so a
//! loaded table behaves exactly like an in-memory constructed one.

use std::fs::File;
use std::path::Path;

use arrow::compute;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;

use crate::{Error, Result};

/// Read a table from a Parquet file
///
/// # Errors
/// Returns `Error::Storage` if the file cannot be opened or parsed
pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<RecordBatch> {
    let file = File::open(path.as_ref())
        .map_err(|e| Error::Storage(format!("Failed to open Parquet file: {e}")))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::Storage(format!("Failed to parse Parquet file: {e}")))?;
    let schema = builder.schema().clone();

    let reader = builder
        .build()
        .map_err(|e| Error::Storage(format!("Failed to create Parquet reader: {e}")))?;

    let mut batches = Vec::new();
    for batch in reader {
        let batch =
            batch.map_err(|e| Error::Storage(format!("Failed to read record batch: {e}")))?;
        batches.push(batch);
    }

    let batch = if batches.is_empty() {
        RecordBatch::new_empty(schema)
    } else {
        compute::concat_batches(&schema, &batches)?
    };
    tracing::debug!(
        rows = batch.num_rows(),
        path = %path.as_ref().display(),
        "loaded parquet table"
    );
    Ok(batch)
}

/// Write a table to a Parquet file, replacing any existing content
///
/// # Errors
/// Returns `Error::Storage` if the file cannot be created or written
pub fn write_parquet<P: AsRef<Path>>(batch: &RecordBatch, path: P) -> Result<()> {
    let file = File::create(path.as_ref())
        .map_err(|e| Error::Storage(format!("Failed to create Parquet file: {e}")))?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .map_err(|e| Error::Storage(format!("Failed to create Parquet writer: {e}")))?;
    writer
        .write(batch)
        .map_err(|e| Error::Storage(format!("Failed to write record batch: {e}")))?;
    writer
        .close()
        .map_err(|e| Error::Storage(format!("Failed to finalize Parquet file: {e}")))?;

    tracing::debug!(
        rows = batch.num_rows(),
        path = %path.as_ref().display(),
        "saved parquet table"
    );
    Ok(())
}
