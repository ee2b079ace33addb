//! Tests for dotted document paths.

use super::*;
use serde_json::json;

#[test]
fn numeric_segments_become_indices() {
    let path = DocumentPath::from("series.0.data.x");

    assert_eq!(
        path.segments(),
        &[
            PathSegment::Field("series".to_string()),
            PathSegment::Index(0),
            PathSegment::Field("data".to_string()),
            PathSegment::Field("x".to_string()),
        ]
    );
}

#[test]
fn signed_or_mixed_segments_stay_fields() {
    assert_eq!(PathSegment::parse("-1"), PathSegment::Field("-1".to_string()));
    assert_eq!(PathSegment::parse("1a"), PathSegment::Field("1a".to_string()));
    assert_eq!(PathSegment::parse(""), PathSegment::Field(String::new()));
}

#[test]
fn empty_string_is_root() {
    let path = DocumentPath::from("");
    assert!(path.is_empty());
    assert_eq!(path, DocumentPath::root());
}

#[test]
fn pre_split_parts_match_dotted_form() {
    let parts: &[&str] = &["plotOptions", "series", "stacking"];
    assert_eq!(
        DocumentPath::from(parts),
        DocumentPath::from("plotOptions.series.stacking")
    );
}

#[test]
fn display_round_trips_dotted_string() {
    let raw = "a.new.0.path";
    assert_eq!(DocumentPath::from(raw).to_string(), raw);
}

#[test]
fn get_reads_nested_values() {
    let document = json!({"series": [{"data": {"x": "$sales.region"}}]});

    assert_eq!(
        DocumentPath::from("series.0.data.x").get(&document),
        Some(&json!("$sales.region"))
    );
    assert_eq!(DocumentPath::from("series.1").get(&document), None);
    assert_eq!(DocumentPath::from("series.data").get(&document), None);
    assert_eq!(DocumentPath::root().get(&document), Some(&document));
}

#[test]
fn serializes_as_dotted_string() {
    let path = DocumentPath::from("title.text");
    let encoded = serde_json::to_value(&path).unwrap();
    assert_eq!(encoded, json!("title.text"));

    let decoded: DocumentPath = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, path);
}

#[test]
fn oversized_digit_segment_stays_an_index() {
    assert_eq!(
        PathSegment::parse("99999999999999999999999"),
        PathSegment::Index(usize::MAX)
    );
}
