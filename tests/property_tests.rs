//! Property-based tests for the BaseData query layer
//!
//! Invariants under test:
//! - filtering never introduces values
//! - filter composition equals the conjoined predicate, in either order
//! - filtering is idempotent
//! - group-by partitions are a disjoint cover of the rows
//! - inner-join keys are contained in both sides' key sets

use std::sync::Arc;

use arrow::array::{Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use biotable::{BaseData, CellValue, Predicate, TableSchema};
use proptest::prelude::*;

const IDS: [&str; 4] = ["TP53", "BRCA1", "EGFR", "MYC"];
const CONDS: [&str; 3] = ["A", "B", "C"];

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

fn build_table(rows: &[(usize, usize, f64)]) -> BaseData {
    let schema = Arc::new(Schema::new(vec![
        Field::new("identifier", DataType::Utf8, false),
        Field::new("condition", DataType::Utf8, false),
        Field::new("value", DataType::Float64, false),
    ]));
    let identifiers = StringArray::from_iter_values(rows.iter().map(|r| IDS[r.0]));
    let conditions = StringArray::from_iter_values(rows.iter().map(|r| CONDS[r.1]));
    let values = Float64Array::from_iter_values(rows.iter().map(|r| r.2));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(identifiers),
            Arc::new(conditions),
            Arc::new(values),
        ],
    )
    .unwrap();
    BaseData::new(
        batch,
        TableSchema::new(["identifier", "condition"], ["value"]).unwrap(),
    )
    .unwrap()
}

/// Generate a measurement table with up to `max_rows` rows
fn arb_table(max_rows: usize) -> impl Strategy<Value = BaseData> {
    proptest::collection::vec((0..IDS.len(), 0..CONDS.len(), 0.0f64..100.0), 0..max_rows)
        .prop_map(|rows| build_table(&rows))
}

/// Generate a single-column equality predicate on a key column
fn arb_key_predicate() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        (0..IDS.len()).prop_map(|i| Predicate::new().eq("identifier", IDS[i])),
        (0..CONDS.len()).prop_map(|c| Predicate::new().eq("condition", CONDS[c])),
    ]
}

fn is_subset(sub: &[CellValue], sup: &[CellValue]) -> bool {
    sub.iter().all(|v| sup.contains(v))
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: filtering never introduces values in any column
    #[test]
    fn prop_filter_unique_is_subset(
        table in arb_table(50),
        predicate in arb_key_predicate()
    ) {
        let filtered = table.filter(&predicate).unwrap();
        for column in ["identifier", "condition", "value"] {
            prop_assert!(is_subset(
                &filtered.unique(column).unwrap(),
                &table.unique(column).unwrap()
            ));
        }
    }

    /// Property: chained filters equal the conjoined predicate
    #[test]
    fn prop_filter_composition(
        table in arb_table(50),
        p1 in arb_key_predicate(),
        p2 in arb_key_predicate()
    ) {
        let chained = table.filter(&p1).unwrap().filter(&p2).unwrap();
        let conjoined = table.filter(&p1.clone().and(p2.clone())).unwrap();
        prop_assert_eq!(&chained, &conjoined);

        // independent column constraints commute
        let reversed = table.filter(&p2).unwrap().filter(&p1).unwrap();
        prop_assert_eq!(chained.num_rows(), reversed.num_rows());
    }

    /// Property: filtering is idempotent
    #[test]
    fn prop_filter_idempotent(
        table in arb_table(50),
        predicate in arb_key_predicate()
    ) {
        let once = table.filter(&predicate).unwrap();
        let twice = once.filter(&predicate).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Property: group-by partitions are a disjoint cover of the rows
    #[test]
    fn prop_group_by_disjoint_cover(table in arb_table(50)) {
        let parts = table.group_by(&["identifier"]).unwrap();

        let total: usize = parts.iter().map(|(_, p)| p.num_rows()).sum();
        prop_assert_eq!(total, table.num_rows());

        // each partition holds exactly its own key, so no row is in two
        for (key, part) in &parts {
            prop_assert!(!part.is_empty());
            prop_assert_eq!(part.unique("identifier").unwrap(), key.clone());
        }

        // distinct keys cover the table's key set
        let keys: Vec<CellValue> = parts.iter().map(|(k, _)| k[0].clone()).collect();
        prop_assert_eq!(keys, table.unique("identifier").unwrap());
    }

    /// Property: inner-join keys are contained in both sides' key sets
    #[test]
    fn prop_merge_key_containment(
        left in arb_table(30),
        right in arb_table(30)
    ) {
        let merged = left.merge(&right, &["identifier"]).unwrap();
        let keys = merged.unique("identifier").unwrap();
        prop_assert!(is_subset(&keys, &left.unique("identifier").unwrap()));
        prop_assert!(is_subset(&keys, &right.unique("identifier").unwrap()));
    }

    /// Property: merging with an empty table yields an empty table
    #[test]
    fn prop_merge_empty_right_yields_empty(left in arb_table(30)) {
        let right = build_table(&[]);
        let merged = left.merge(&right, &["identifier"]).unwrap();
        prop_assert_eq!(merged.num_rows(), 0);
    }
}
