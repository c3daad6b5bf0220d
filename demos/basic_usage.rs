//! Basic biotable usage: measurement tables and the query layer
//!
//! This example demonstrates:
//! - Building a measurement table from an in-memory Arrow batch
//! - Condition filtering and replicate grouping
//! - Merging measurements with an annotation table
//!
//! Run with: cargo run --example basic_usage
//! Set RUST_LOG=debug to see the merge/storage events.

use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use biotable::{sample, BaseData, Predicate, Sample, TableSchema};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Biotable Basic Usage Example ===\n");

    // Build a small proteomics table: two genes, two conditions, replicates
    let batch = measurement_batch()?;
    let data = Sample::new(batch)?;
    println!("Loaded {} measurement rows", data.num_rows());
    println!("  Identifiers: {:?}", data.identifiers()?);
    println!("  Conditions:  {:?}\n", data.conditions()?);

    // Filter to one condition
    let treated = data.by_condition("treated")?;
    println!("Rows under 'treated': {}", treated.num_rows());

    // Partition one gene's rows by replicate
    println!("\nReplicates of TP53:");
    for (replicate, part) in data.replicates_of("TP53")? {
        println!("  replicate {replicate}: {} rows", part.num_rows());
    }

    // Attach per-gene annotations with an inner merge
    let annotations = annotation_table()?;
    let merged = data.data().merge(&annotations, &[sample::IDENTIFIER])?;
    println!("\nMerged with annotations: {} rows", merged.num_rows());

    let heavy = merged.filter(&Predicate::new().ge("pathway_count", 10.0))?;
    println!(
        "Genes in 10+ pathways: {:?}",
        heavy.unique(sample::IDENTIFIER)?
    );

    Ok(())
}

fn measurement_batch() -> Result<RecordBatch, arrow::error::ArrowError> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(sample::IDENTIFIER, DataType::Utf8, false),
        Field::new(sample::CONDITION, DataType::Utf8, false),
        Field::new(sample::REPLICATE, DataType::Int64, false),
        Field::new(sample::VALUE, DataType::Float64, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec![
                "TP53", "TP53", "TP53", "BRCA1", "BRCA1",
            ])),
            Arc::new(StringArray::from(vec![
                "control", "treated", "treated", "control", "treated",
            ])),
            Arc::new(Int64Array::from(vec![1, 1, 2, 1, 1])),
            Arc::new(Float64Array::from(vec![5.0, 7.0, 7.4, 2.5, 2.2])),
        ],
    )
}

fn annotation_table() -> Result<BaseData, Box<dyn std::error::Error>> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(sample::IDENTIFIER, DataType::Utf8, false),
        Field::new("pathway_count", DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec!["TP53", "BRCA1"])),
            Arc::new(Int64Array::from(vec![12, 8])),
        ],
    )?;
    Ok(BaseData::new(
        batch,
        TableSchema::new([sample::IDENTIFIER], ["pathway_count"])?,
    )?)
}
