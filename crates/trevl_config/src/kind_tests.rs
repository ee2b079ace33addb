//! Tests for component kinds and the kind registry.

use super::*;
use serde_json::json;

fn registry_with(kinds: Vec<ComponentKind>) -> KindRegistry {
    KindRegistry::from_kinds(kinds).unwrap()
}

#[test]
fn builder_records_own_declarations() {
    let kind = ComponentKind::new("Pie")
        .with_parent("Base")
        .with_type("chart")
        .with_default(json!({"chart": {"type": "pie"}}))
        .with_keyword("name", "series.0.name");

    assert_eq!(kind.name(), "Pie");
    assert_eq!(kind.parent(), Some("Base"));
    assert_eq!(kind.component_type(), Some("chart"));
    assert_eq!(kind.default_display(), &json!({"chart": {"type": "pie"}}));
    assert_eq!(
        kind.keyword_paths().get("name"),
        Some(&DocumentPath::from("series.0.name"))
    );
}

#[test]
fn register_rejects_non_mapping_default() {
    let mut registry = KindRegistry::new();
    let error = registry
        .register(ComponentKind::new("Bad").with_default(json!([1, 2])))
        .unwrap_err();

    assert!(matches!(error, ConfigError::InvalidDefault { ref kind, .. } if kind == "Bad"));
    assert!(registry.is_empty());
}

#[test]
fn register_rejects_self_parent() {
    let mut registry = KindRegistry::new();
    let error = registry
        .register(ComponentKind::new("Loop").with_parent("Loop"))
        .unwrap_err();

    assert!(matches!(error, ConfigError::CyclicHierarchy { .. }));
}

#[test]
fn register_replaces_existing_kind() {
    let mut registry = KindRegistry::new();
    registry.register(ComponentKind::new("A").with_type("one")).unwrap();

    let previous = registry
        .register(ComponentKind::new("A").with_type("two"))
        .unwrap();

    assert_eq!(previous.unwrap().component_type(), Some("one"));
    assert_eq!(registry.get("A").unwrap().component_type(), Some("two"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn ancestry_is_root_first() {
    let registry = registry_with(vec![
        ComponentKind::new("StackedBar").with_parent("Bar"),
        ComponentKind::new("Bar").with_parent("Base"),
        ComponentKind::new("Base"),
    ]);

    let names: Vec<&str> = registry
        .ancestry("StackedBar")
        .unwrap()
        .iter()
        .map(|k| k.name())
        .collect();

    assert_eq!(names, vec!["Base", "Bar", "StackedBar"]);
}

#[test]
fn ancestry_of_root_is_itself() {
    let registry = registry_with(vec![ComponentKind::new("Base")]);
    let chain = registry.ancestry("Base").unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].name(), "Base");
}

#[test]
fn ancestry_detects_cycles() {
    let registry = registry_with(vec![
        ComponentKind::new("A").with_parent("B"),
        ComponentKind::new("B").with_parent("C"),
        ComponentKind::new("C").with_parent("A"),
    ]);

    let error = registry.ancestry("A").unwrap_err();

    assert_eq!(
        error,
        ConfigError::CyclicHierarchy {
            chain: vec!["A".into(), "B".into(), "C".into(), "A".into()],
        }
    );
}

#[test]
fn ancestry_reports_missing_parent() {
    let registry = registry_with(vec![ComponentKind::new("Orphan").with_parent("Ghost")]);

    let error = registry.ancestry("Orphan").unwrap_err();

    assert_eq!(
        error,
        ConfigError::UnknownKind {
            name: "Ghost".to_string()
        }
    );
}

#[test]
fn names_are_sorted() {
    let registry = registry_with(vec![
        ComponentKind::new("Zeta"),
        ComponentKind::new("Alpha"),
        ComponentKind::new("Mid"),
    ]);
    assert_eq!(registry.names(), vec!["Alpha", "Mid", "Zeta"]);
}

#[test]
fn kinds_deserialize_from_definition_documents() {
    let kind: ComponentKind = serde_json::from_value(json!({
        "name": "Heatmap",
        "parent": "BaseChart",
        "default": {"chart": {"type": "heatmap"}},
        "keywords": {"value": "series.0.data.value"},
    }))
    .unwrap();

    assert_eq!(kind.name(), "Heatmap");
    assert_eq!(kind.parent(), Some("BaseChart"));
    assert_eq!(kind.component_type(), None);
    assert_eq!(
        kind.keyword_paths()["value"],
        DocumentPath::from("series.0.data.value")
    );
}
