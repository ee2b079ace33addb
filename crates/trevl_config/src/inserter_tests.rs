//! Tests for path-addressed insertion.

use super::*;
use serde_json::json;

#[test]
fn empty_path_returns_value() {
    let result = insert(json!({"a": 1}), "", Some(json!([1, 2, 3]))).unwrap();
    assert_eq!(result, json!({"a": 1}));

    let result = insert(json!(7), DocumentPath::root(), None).unwrap();
    assert_eq!(result, json!(7));
}

#[test]
fn creates_mapping_for_field_head() {
    let result = insert(json!("chart title"), "title.text", None).unwrap();
    assert_eq!(result, json!({"title": {"text": "chart title"}}));
}

#[test]
fn creates_sequence_for_index_head() {
    let result = insert(json!("red"), "0.color", None).unwrap();
    assert_eq!(result, json!([{"color": "red"}]));
}

#[test]
fn accumulates_overlapping_paths_in_one_root() {
    let doc = insert(json!("$sales.region"), "series.0.data.x", None).unwrap();
    let doc = insert(json!("$sales.revenue"), "series.0.data.y", Some(doc)).unwrap();
    let doc = insert(json!("Revenue"), "series.0.name", Some(doc)).unwrap();

    assert_eq!(
        doc,
        json!({
            "series": [{
                "data": {"x": "$sales.region", "y": "$sales.revenue"},
                "name": "Revenue",
            }]
        })
    );
}

#[test]
fn appends_at_current_length() {
    let doc = insert(json!("first"), "items.0", None).unwrap();
    let doc = insert(json!("second"), "items.1", Some(doc)).unwrap();
    assert_eq!(doc, json!({"items": ["first", "second"]}));
}

#[test]
fn overwrites_existing_index() {
    let doc = json!({"items": ["first", "second"]});
    let doc = insert(json!("replaced"), "items.0", Some(doc)).unwrap();
    assert_eq!(doc, json!({"items": ["replaced", "second"]}));
}

#[test]
fn index_past_length_is_rejected() {
    let doc = json!({"items": ["first"]});
    let error = insert(json!("gap"), "items.2", Some(doc)).unwrap_err();

    assert_eq!(
        error,
        ConfigError::UnsupportedIndex {
            path: "items.2".to_string(),
            index: 2,
            len: 1,
        }
    );
}

#[test]
fn index_into_mapping_is_structural_conflict() {
    let doc = json!({"series": {"name": "a"}});
    let error = insert(json!(1), "series.0", Some(doc)).unwrap_err();

    assert_eq!(
        error,
        ConfigError::StructuralConflict {
            path: "series".to_string(),
            expected: "sequence".to_string(),
            found: "mapping".to_string(),
        }
    );
}

#[test]
fn field_into_sequence_is_structural_conflict() {
    let error = insert(json!(1), "name", Some(json!([1, 2]))).unwrap_err();
    assert!(matches!(error, ConfigError::StructuralConflict { .. }));
}

#[test]
fn field_into_scalar_is_structural_conflict() {
    let doc = json!({"title": "plain"});
    let error = insert(json!("x"), "title.text", Some(doc)).unwrap_err();

    assert_eq!(
        error,
        ConfigError::StructuralConflict {
            path: "title".to_string(),
            expected: "mapping".to_string(),
            found: "string".to_string(),
        }
    );
}

#[test]
fn null_slot_is_rebuilt() {
    let doc = json!({"title": null});
    let doc = insert(json!("t"), "title.text", Some(doc)).unwrap();
    assert_eq!(doc, json!({"title": {"text": "t"}}));
}

#[test]
fn inserted_value_reads_back_through_path() {
    let cases = [
        "a",
        "a.b.c",
        "0",
        "0.1",
        "series.0.data.0.x",
        "plotOptions.series.stacking",
    ];
    for raw in cases {
        let path = DocumentPath::from(raw);
        // Index 1 right after a fresh sequence is past its length.
        if raw == "0.1" {
            assert!(insert(json!("v"), path, None).is_err());
            continue;
        }
        let doc = insert(json!({"leaf": raw}), path.clone(), None).unwrap();
        assert_eq!(path.get(&doc), Some(&json!({"leaf": raw})), "path {raw}");
    }
}

#[test]
fn insert_into_leaves_document_untouched_on_error() {
    let mut doc = json!({"series": [{"name": "a"}]});
    let before = doc.clone();

    let error = insert_into(&mut doc, "series.5.name", json!("b")).unwrap_err();

    assert!(error.is_structural());
    assert_eq!(doc, before);
}

#[test]
fn insert_into_updates_in_place() {
    let mut doc = json!({});
    insert_into(&mut doc, "series.0.color", json!("#ff0000")).unwrap();
    insert_into(&mut doc, "series.0.name", json!("Revenue")).unwrap();

    assert_eq!(
        doc,
        json!({"series": [{"color": "#ff0000", "name": "Revenue"}]})
    );
}

#[test]
fn preserves_first_seen_key_order() {
    let doc = insert(json!(1), "z", None).unwrap();
    let doc = insert(json!(2), "a", Some(doc)).unwrap();
    let doc = insert(json!(3), "z", Some(doc)).unwrap();

    let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["z".to_string(), "a".to_string()]);
}

#[test]
fn oversized_index_is_out_of_sequence() {
    let error = insert(
        json!(1),
        "a.99999999999999999999999",
        Some(json!({"a": [0]})),
    )
    .unwrap_err();
    assert_eq!(
        error,
        ConfigError::UnsupportedIndex {
            path: format!("a.{}", usize::MAX),
            index: usize::MAX,
            len: 1,
        }
    );

    let error = insert(json!(1), "99999999999999999999999", None).unwrap_err();
    assert!(matches!(error, ConfigError::UnsupportedIndex { len: 0, .. }));
}
