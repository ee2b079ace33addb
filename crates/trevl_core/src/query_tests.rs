//! Tests for cube queries.

use super::*;
use serde_json::json;

const NO_FIELDS: [&str; 0] = [];

fn query() -> CubeQuery {
    CubeQuery::new("cube-name", ["m-1", "m-2"], ["d-1", "d-2"])
        .unwrap()
        .with_computed(Computed::new("c-1", "code-1"))
        .with_computed(Computed::new("c-2", "code-2"))
}

// ============================================================================
// Field references
// ============================================================================

#[test]
fn measures_resolve_with_cube_prefix() {
    let query = query();
    assert_eq!(query.field("m-1").unwrap(), "$cube-name.m-1");
    assert_eq!(query.field("m-2").unwrap(), "$cube-name.m-2");
}

#[test]
fn dimensions_resolve_with_cube_prefix() {
    let query = query();
    assert_eq!(query.field("d-1").unwrap(), "$cube-name.d-1");
    assert_eq!(query.field("d-2").unwrap(), "$cube-name.d-2");
}

#[test]
fn computed_fields_resolve_without_cube() {
    let query = query();
    assert_eq!(query.field("c-1").unwrap(), "$c-1");
    assert_eq!(query.field("c-2").unwrap(), "$c-2");
}

#[test]
fn unknown_field_lists_sorted_names() {
    let error = query().field("m-3").unwrap_err();

    assert_eq!(
        error,
        TrevlError::UnknownField {
            field: "m-3".to_string(),
            source_name: "cube 'cube-name'".to_string(),
            available: vec![
                "c-1".to_string(),
                "c-2".to_string(),
                "d-1".to_string(),
                "d-2".to_string(),
                "m-1".to_string(),
                "m-2".to_string(),
            ],
        }
    );
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn query_without_fields_is_rejected() {
    let error = CubeQuery::new("cube", NO_FIELDS, NO_FIELDS).unwrap_err();
    assert!(matches!(error, TrevlError::MissingQueryFields { .. }));
}

#[test]
fn dimension_only_query_is_valid() {
    let query = CubeQuery::new("cube", NO_FIELDS, ["region"]).unwrap();
    assert_eq!(query.serialize(), json!({"dimensions": ["cube.region"]}));
}

#[test]
fn filter_needs_values_or_parameter() {
    let error = Filter::new("region", "equals", None, None).unwrap_err();
    assert_eq!(
        error,
        TrevlError::InvalidFilter {
            member: "region".to_string()
        }
    );

    assert!(Filter::new("region", "equals", Some(vec!["EU".into()]), None).is_ok());
    assert!(Filter::new("region", "equals", None, Some("p".into())).is_ok());
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn serializes_measures_and_dimensions() {
    let query = CubeQuery::new("sales", ["revenue"], ["region"]).unwrap();
    assert_eq!(
        query.serialize(),
        json!({"measures": ["sales.revenue"], "dimensions": ["sales.region"]})
    );
}

#[test]
fn serializes_filters_with_cube_prefix() {
    let query = CubeQuery::new("sales", ["revenue"], NO_FIELDS)
        .unwrap()
        .with_filter(Filter::with_values("region", "equals", ["EU", "US"]))
        .with_filter(Filter::with_parameter("year", "equals", "selectedYear"));

    assert_eq!(
        query.serialize(),
        json!({
            "measures": ["sales.revenue"],
            "filters": [
                {"member": "sales.region", "operator": "equals", "values": ["EU", "US"]},
                {"member": "sales.year", "operator": "equals", "parameter": "selectedYear"},
            ],
        })
    );
}

#[test]
fn parameter_wins_over_values() {
    let filter = Filter::new(
        "region",
        "equals",
        Some(vec!["EU".into()]),
        Some("selectedRegion".into()),
    )
    .unwrap();
    let query = CubeQuery::new("sales", ["revenue"], NO_FIELDS)
        .unwrap()
        .with_filter(filter);

    assert_eq!(
        query.serialize()["filters"][0],
        json!({"member": "sales.region", "operator": "equals", "parameter": "selectedRegion"})
    );
}

#[test]
fn serializes_computed_arguments_as_references() {
    let query = CubeQuery::new("sales", ["revenue", "cost"], NO_FIELDS)
        .unwrap()
        .with_computed(
            Computed::new("margin", "a - b")
                .with_argument("a", "revenue")
                .with_argument("b", "cost"),
        )
        .with_computed(Computed::new("constant", "1"));

    assert_eq!(
        query.serialize()["computed"],
        json!([
            {"name": "margin", "code": "a - b", "arguments": {"a": "$sales.revenue", "b": "$sales.cost"}},
            {"name": "constant", "code": "1"},
        ])
    );
}

#[test]
fn execution_form_drops_computed_fields() {
    let query = query();
    let serialized = query.serialize_for_execution();

    assert!(serialized.get("computed").is_none());
    assert_eq!(serialized["measures"], json!(["cube-name.m-1", "cube-name.m-2"]));
}

// ============================================================================
// Multi-cube queries
// ============================================================================

#[test]
fn multi_cube_query_passes_fields_through() {
    let query = MultiCubeQuery::new(
        ["cubeA.meas1", "cubeB.meas2"],
        ["cubeA.dim1", "cubeB.dim2"],
    )
    .unwrap();

    assert_eq!(
        query.serialize(),
        json!({
            "measures": ["cubeA.meas1", "cubeB.meas2"],
            "dimensions": ["cubeA.dim1", "cubeB.dim2"],
        })
    );
    assert_eq!(query.field("cubeA.meas1").unwrap(), "$cubeA.meas1");
    assert!(query.field("meas1").is_err());
}

#[test]
fn multi_cube_query_without_fields_is_rejected() {
    assert!(MultiCubeQuery::new(NO_FIELDS, NO_FIELDS).is_err());
}

// ============================================================================
// Definitions
// ============================================================================

#[test]
fn definition_with_cube_builds_cube_query() {
    let def: QueryDefinition = serde_json::from_value(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "filters": [{"member": "region", "operator": "equals", "values": ["EU"]}],
        "computed": [{"name": "double", "code": "x * 2", "arguments": {"x": "revenue"}}],
    }))
    .unwrap();

    let query = Query::try_from(def).unwrap();

    assert!(matches!(query, Query::Cube(_)));
    assert_eq!(query.field("double").unwrap(), "$double");
    assert_eq!(
        query.serialize()["filters"][0]["member"],
        json!("sales.region")
    );
}

#[test]
fn definition_without_cube_builds_multi_cube_query() {
    let def: QueryDefinition = serde_json::from_value(json!({
        "measures": ["cubeA.meas1"],
    }))
    .unwrap();

    let query = Query::try_from(def).unwrap();
    assert!(matches!(query, Query::MultiCube(_)));
}

#[test]
fn definition_filter_without_values_fails_to_parse() {
    let result: Result<QueryDefinition, _> = serde_json::from_value(json!({
        "cube": "sales",
        "measures": ["revenue"],
        "filters": [{"member": "region", "operator": "equals"}],
    }));
    assert!(result.is_err());
}
