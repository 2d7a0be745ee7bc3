//! Tests for normalized-name deduplication

use super::{make_record, make_record_with_address};
use crate::app::services::orchestrator::deduplication::deduplicate_records;

#[test]
fn test_case_and_whitespace_variants_collapse() {
    let records = vec![make_record("Shell Station"), make_record("shell   station")];

    let (survivors, removed) = deduplicate_records(records);

    assert_eq!(survivors.len(), 1);
    assert_eq!(removed, 1);
    // First occurrence wins
    assert_eq!(survivors[0].record.name, "Shell Station");
    assert_eq!(survivors[0].duplicates_absorbed, 1);
}

#[test]
fn test_distinct_names_are_kept() {
    let records = vec![
        make_record("Texaco Spanish Town"),
        make_record("Rubis Half Way Tree"),
        make_record("Total Montego Bay"),
    ];

    let (survivors, removed) = deduplicate_records(records);

    assert_eq!(survivors.len(), 3);
    assert_eq!(removed, 0);
    assert!(survivors.iter().all(|s| s.duplicates_absorbed == 0));
}

#[test]
fn test_input_order_is_preserved() {
    let records = vec![
        make_record("Bravo"),
        make_record("Alpha"),
        make_record("bravo"),
        make_record("Charlie"),
    ];

    let (survivors, removed) = deduplicate_records(records);

    let names: Vec<&str> = survivors.iter().map(|s| s.record.name.as_str()).collect();
    assert_eq!(names, vec!["Bravo", "Alpha", "Charlie"]);
    assert_eq!(removed, 1);
}

#[test]
fn test_multiple_duplicates_accumulate_on_survivor() {
    let records = vec![
        make_record("Epping Farm Texaco"),
        make_record("EPPING FARM TEXACO"),
        make_record("epping  farm  texaco"),
    ];

    let (survivors, removed) = deduplicate_records(records);

    assert_eq!(survivors.len(), 1);
    assert_eq!(removed, 2);
    assert_eq!(survivors[0].duplicates_absorbed, 2);
}

#[test]
fn test_duplicate_address_does_not_override_survivor() {
    let records = vec![
        make_record_with_address("Shell Station", "Old Hope Rd"),
        make_record_with_address("Shell  Station", "Constant Spring Rd"),
    ];

    let (survivors, _) = deduplicate_records(records);

    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].record.address.as_deref(), Some("Old Hope Rd"));
}

#[test]
fn test_empty_input() {
    let (survivors, removed) = deduplicate_records(Vec::new());
    assert!(survivors.is_empty());
    assert_eq!(removed, 0);
}
