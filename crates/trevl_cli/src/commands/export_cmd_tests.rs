use super::*;
use serde_json::json;
use tempfile::TempDir;

const DEFINITION: &str = r#"
description: Sales
components:
  - kind: ScoreComponent
    id: total
    query:
      cube: sales
      measures: [revenue]
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write definition");
    path
}

fn args(file: PathBuf) -> ExportArgs {
    ExportArgs {
        file,
        format: None,
        output: None,
    }
}

fn expected() -> serde_json::Value {
    json!({
        "description": "Sales",
        "components": [{
            "type": "score",
            "id": "total",
            "display": {"column": "$sales.revenue"},
            "queries": [{"measures": ["sales.revenue"]}],
        }],
    })
}

#[test]
fn test_export_uses_configured_format() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let file = write(&dir, "sales.yaml", DEFINITION);
    let mut config = AppConfig::default();
    config.output.format = ExportFormat::Yaml;

    let text = export_dashboard(&args(file), &config).unwrap();

    assert_eq!(ExportFormat::Yaml.parse(&text).unwrap(), expected());
    assert!(!text.trim_start().starts_with('{'));
}

#[test]
fn test_export_format_argument_wins() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let file = write(&dir, "sales.yml", DEFINITION);
    let mut config = AppConfig::default();
    config.output.format = ExportFormat::Yaml;
    let export_args = ExportArgs {
        format: Some(ExportFormat::Json),
        ..args(file)
    };

    let text = export_dashboard(&export_args, &config).unwrap();

    assert_eq!(ExportFormat::Json.parse(&text).unwrap(), expected());
}

#[test]
fn test_export_writes_output_file() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let file = write(&dir, "sales.yaml", DEFINITION);
    let output = dir.path().join("sales.json");
    let export_args = ExportArgs {
        output: Some(output.clone()),
        ..args(file)
    };

    execute(&export_args, &AppConfig::default()).unwrap();

    let written = fs::read_to_string(output).unwrap();
    assert_eq!(ExportFormat::Json.parse(&written).unwrap(), expected());
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let file = write(&dir, "sales.txt", DEFINITION);

    let result = load_definition(&file);

    assert!(matches!(result, Err(Error::InvalidArguments(_))));
}

#[test]
fn test_missing_file_is_reported() {
    let dir = TempDir::new().expect("Failed to create temp directory");

    let result = load_definition(&dir.path().join("missing.yaml"));

    assert!(matches!(result, Err(Error::File { .. })));
}

#[test]
fn test_invalid_component_fails_export() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let file = write(
        &dir,
        "broken.yaml",
        "components:\n  - kind: PieChart\n    query: {cube: sales, measures: [revenue]}\n",
    );

    let result = export_dashboard(&args(file), &AppConfig::default());

    assert!(matches!(
        result,
        Err(Error::Dashboard(trevl_core::TrevlError::MissingArgument { .. }))
    ));
}
