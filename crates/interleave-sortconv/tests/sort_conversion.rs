//! End-to-end sort conversion scenarios against the recording backend.

use interleave_sortconv::SortConverter;
use interleave_sortconv::backend::test_support::{RecordedSort, RecordingBackend};
use interleave_types::TypeDescriptor;

#[test]
fn nested_record_fields_convert_recursively() {
    let inner = TypeDescriptor::record(Some("Inner"), vec![("flag".to_string(), TypeDescriptor::Bool)]);
    let outer = TypeDescriptor::record(
        Some("Outer"),
        vec![("count".to_string(), TypeDescriptor::Int), ("inner".to_string(), inner)],
    );

    let mut converter = SortConverter::new(RecordingBackend::new());
    let sort = converter.get_sort_for(&outer).unwrap();
    match sort {
        RecordedSort::Datatype(name, fields) => {
            assert_eq!(name, "Outer");
            assert_eq!(fields.len(), 2);
            let (_, inner_sort) = fields.iter().find(|(n, _)| n == "inner").unwrap();
            assert!(matches!(inner_sort, RecordedSort::Datatype(n, _) if n == "Inner"));
        }
        other => panic!("expected Datatype, got {other:?}"),
    }
}

#[test]
fn sequence_of_records_converts_through_the_element_cache() {
    let elem = TypeDescriptor::record(Some("Item"), vec![("id".to_string(), TypeDescriptor::UInt)]);
    let ty = TypeDescriptor::sequence(elem);

    let mut converter = SortConverter::new(RecordingBackend::new());
    let sort = converter.get_sort_for(&ty).unwrap();
    assert!(matches!(sort, RecordedSort::Sequence(inner) if matches!(*inner, RecordedSort::Datatype(ref n, _) if n == "Item")));
}

#[test]
fn repeated_lookups_do_not_reregister_the_same_name() {
    let ty = TypeDescriptor::record(Some("Dup"), vec![("x".to_string(), TypeDescriptor::Bool)]);
    let mut converter = SortConverter::new(RecordingBackend::new());
    for _ in 0..5 {
        converter.get_sort_for(&ty).unwrap();
    }
    // Can't see the backend's private field from here, so re-derive the
    // same shape and confirm the sort is stable instead.
    let second = converter.get_sort_for(&ty).unwrap();
    let first = converter.get_sort_for(&ty).unwrap();
    assert_eq!(first, second);
}
