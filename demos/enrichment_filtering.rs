//! Enrichment filtering: significance thresholds over term tables
//!
//! This example demonstrates:
//! - Building an enrichment table from an in-memory Arrow batch
//! - Significance-threshold filtering with the default and inverted
//!   comparators
//! - Grouping terms by category
//!
//! Run with: cargo run --example enrichment_filtering

use std::sync::Arc;

use arrow::array::{Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use biotable::{enrichment, Comparator, EnrichmentResult};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Biotable Enrichment Filtering Example ===\n");

    let result = EnrichmentResult::new(term_batch()?)?;
    println!("Loaded {} enriched terms", result.num_rows());
    println!("  Categories: {:?}\n", result.categories()?);

    // Default comparator keeps p <= threshold
    let hits = result.significant_at(0.05)?;
    println!("Terms significant at 0.05: {:?}", hits.terms()?);

    // Inverted comparator inspects what was filtered away
    let misses = result.significant(0.05, Comparator::Gt)?;
    println!("Terms above the cutoff:    {:?}\n", misses.terms()?);

    // Per-category breakdown of the significant set
    println!("Significant terms per category:");
    for (category, part) in hits.group_by(&[enrichment::CATEGORY])? {
        println!("  {:?}: {} terms", category, part.num_rows());
    }

    Ok(())
}

fn term_batch() -> Result<RecordBatch, arrow::error::ArrowError> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(enrichment::TERM, DataType::Utf8, false),
        Field::new(enrichment::CATEGORY, DataType::Utf8, false),
        Field::new(enrichment::SCORE, DataType::Float64, false),
        Field::new(enrichment::P_VALUE, DataType::Float64, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec![
                "GO:0006915",
                "GO:0008283",
                "hsa04110",
                "hsa04115",
            ])),
            Arc::new(StringArray::from(vec!["BP", "BP", "KEGG", "KEGG"])),
            Arc::new(Float64Array::from(vec![4.2, 1.1, 2.0, 3.6])),
            Arc::new(Float64Array::from(vec![0.001, 0.2, 0.03, 0.004])),
        ],
    )
}
