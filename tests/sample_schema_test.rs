//! Sample / ExperimentalData schema and shorthand tests

use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use biotable::{sample, CellValue, ExperimentalData, Predicate, Sample};

fn batch(
    identifiers: Vec<&str>,
    conditions: Vec<&str>,
    replicates: Vec<i64>,
    values: Vec<f64>,
) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new(sample::IDENTIFIER, DataType::Utf8, false),
        Field::new(sample::CONDITION, DataType::Utf8, false),
        Field::new(sample::REPLICATE, DataType::Int64, false),
        Field::new(sample::VALUE, DataType::Float64, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(identifiers)),
            Arc::new(StringArray::from(conditions)),
            Arc::new(Int64Array::from(replicates)),
            Arc::new(Float64Array::from(values)),
        ],
    )
    .unwrap()
}

#[test]
fn test_by_condition_concrete_scenario() {
    // two TP53 measurements under two conditions
    let sample = Sample::new(batch(
        vec!["TP53", "TP53"],
        vec!["A", "B"],
        vec![1, 1],
        vec![5.0, 7.0],
    ))
    .unwrap();

    let a = sample.by_condition("A").unwrap();
    assert_eq!(a.num_rows(), 1);
    assert_eq!(
        a.unique(sample::VALUE).unwrap(),
        vec![CellValue::Float(5.0)]
    );
    assert_eq!(
        sample.unique(sample::IDENTIFIER).unwrap(),
        vec![CellValue::from("TP53")]
    );
}

#[test]
fn test_experimental_data_is_sample() {
    let data: ExperimentalData = Sample::new(batch(
        vec!["TP53"],
        vec!["A"],
        vec![1],
        vec![5.0],
    ))
    .unwrap();
    assert_eq!(data.num_rows(), 1);
}

#[test]
fn test_replicates_of_partitions_by_replicate() {
    let sample = Sample::new(batch(
        vec!["TP53", "TP53", "TP53", "BRCA1"],
        vec!["A", "A", "B", "A"],
        vec![1, 2, 1, 1],
        vec![5.0, 5.2, 7.0, 2.5],
    ))
    .unwrap();

    let reps = sample.replicates_of("TP53").unwrap();
    assert_eq!(reps.len(), 2);
    assert_eq!(reps[0].0, CellValue::Int(1));
    assert_eq!(reps[0].1.num_rows(), 2);
    assert_eq!(reps[1].0, CellValue::Int(2));
    assert_eq!(reps[1].1.num_rows(), 1);
    // BRCA1 rows never leak into the partitioning
    for (_, part) in &reps {
        assert_eq!(
            part.unique(sample::IDENTIFIER).unwrap(),
            vec![CellValue::from("TP53")]
        );
    }
}

#[test]
fn test_replicates_of_unknown_identifier_is_empty() {
    let sample = Sample::new(batch(vec!["TP53"], vec!["A"], vec![1], vec![5.0])).unwrap();
    assert!(sample.replicates_of("KRAS").unwrap().is_empty());
}

#[test]
fn test_conditions_and_identifiers_shorthands() {
    let sample = Sample::new(batch(
        vec!["TP53", "BRCA1", "TP53"],
        vec!["B", "A", "A"],
        vec![1, 1, 1],
        vec![1.0, 2.0, 3.0],
    ))
    .unwrap();
    assert_eq!(
        sample.conditions().unwrap(),
        vec![CellValue::from("B"), CellValue::from("A")]
    );
    assert_eq!(
        sample.identifiers().unwrap(),
        vec![CellValue::from("TP53"), CellValue::from("BRCA1")]
    );
}

#[test]
fn test_filter_returns_sample() {
    let sample = Sample::new(batch(
        vec!["TP53", "BRCA1"],
        vec!["A", "A"],
        vec![1, 1],
        vec![5.0, 2.5],
    ))
    .unwrap();
    let strong = sample
        .filter(&Predicate::new().ge(sample::VALUE, 4.0))
        .unwrap();
    // the result is still a Sample, so condition shorthands keep working
    assert_eq!(strong.by_condition("A").unwrap().num_rows(), 1);
}

#[test]
fn test_merge_two_samples_on_identifier_and_condition() {
    let proteomics = Sample::new(batch(
        vec!["TP53", "BRCA1"],
        vec!["A", "A"],
        vec![1, 1],
        vec![5.0, 2.5],
    ))
    .unwrap();
    let rna = Sample::new(batch(
        vec!["TP53", "EGFR"],
        vec!["A", "A"],
        vec![1, 1],
        vec![11.0, 8.0],
    ))
    .unwrap();

    let merged = proteomics
        .merge(&rna, &[sample::IDENTIFIER, sample::CONDITION])
        .unwrap();
    assert_eq!(merged.num_rows(), 1);
    assert!(merged.schema().contains("value_x"));
    assert!(merged.schema().contains("value_y"));
    assert_eq!(
        merged.unique(sample::IDENTIFIER).unwrap(),
        vec![CellValue::from("TP53")]
    );
}

#[test]
fn test_construction_rejects_missing_required_column() {
    let schema = Arc::new(Schema::new(vec![
        Field::new(sample::IDENTIFIER, DataType::Utf8, false),
        Field::new(sample::VALUE, DataType::Float64, false),
    ]));
    let bad = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec!["TP53"])),
            Arc::new(Float64Array::from(vec![5.0])),
        ],
    )
    .unwrap();
    let err = Sample::new(bad).unwrap_err();
    assert!(err.to_string().contains("condition"));
}
