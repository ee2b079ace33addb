//! Tests for text export of documents.

use super::*;
use serde_json::json;

fn sample() -> Value {
    json!({
        "description": "Sales",
        "components": [{
            "type": "chart",
            "id": "id-simple",
            "display": {
                "chart": {"type": "line"},
                "title": {"text": "chart title"},
                "series": [{"data": {"x": "$cube.measure", "y": 1.5, "z": null, "flag": true}}],
            },
            "queries": [{"measures": ["cube.measure"]}],
        }],
    })
}

#[test]
fn json_round_trip() {
    let document = sample();
    let text = to_json_string(&document).unwrap();
    assert_eq!(from_json_str(&text).unwrap(), document);
}

#[test]
fn yaml_round_trip() {
    let document = sample();
    let text = to_yaml_string(&document).unwrap();
    assert_eq!(from_yaml_str(&text).unwrap(), document);
}

#[test]
fn json_output_keeps_key_order() {
    let text = to_json_string(&json!({"type": "chart", "id": "a", "display": {}})).unwrap();
    let type_at = text.find("\"type\"").unwrap();
    let id_at = text.find("\"id\"").unwrap();
    let display_at = text.find("\"display\"").unwrap();
    assert!(type_at < id_at && id_at < display_at);
}

#[test]
fn invalid_text_reports_format() {
    let error = from_json_str("{not json").unwrap_err();
    assert!(matches!(error, TrevlError::ParseError { ref format, .. } if format == "json"));

    let error = from_yaml_str("a: [1, 2").unwrap_err();
    assert!(matches!(error, TrevlError::ParseError { ref format, .. } if format == "yaml"));
}

#[test]
fn format_from_extension() {
    assert_eq!(
        ExportFormat::from_path(Path::new("dash.yml")),
        Some(ExportFormat::Yaml)
    );
    assert_eq!(
        ExportFormat::from_path(Path::new("dash.JSON")),
        Some(ExportFormat::Json)
    );
    assert_eq!(ExportFormat::from_path(Path::new("dash.toml")), None);
    assert_eq!(ExportFormat::from_path(Path::new("dash")), None);
}

#[test]
fn format_parses_from_str() {
    assert_eq!("YAML".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
    assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
    assert!("xml".parse::<ExportFormat>().is_err());
}

#[test]
fn render_and_parse_agree() {
    let document = sample();
    for format in [ExportFormat::Json, ExportFormat::Yaml] {
        let text = format.render(&document).unwrap();
        assert_eq!(format.parse(&text).unwrap(), document, "format {format}");
    }
}
