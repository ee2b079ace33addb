use super::*;
use trevl_core::ExportFormat;

#[test]
fn test_parse_export_with_format() {
    let cli = Cli::try_parse_from(["trevl", "export", "sales.yaml", "--format", "yaml"]).unwrap();

    match cli.command {
        Commands::Export(args) => {
            assert_eq!(args.file, PathBuf::from("sales.yaml"));
            assert_eq!(args.format, Some(ExportFormat::Yaml));
            assert_eq!(args.output, None);
        }
        _ => panic!("Expected export command"),
    }
}

#[test]
fn test_parse_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["trevl", "export", "sales.yaml", "--format", "xml"]).is_err());
}

#[test]
fn test_parse_render_with_global_config() {
    let cli = Cli::try_parse_from([
        "trevl",
        "render",
        "sales.yaml",
        "--component",
        "revenue",
        "--state",
        r#"{"region": "EU"}"#,
        "--config",
        "other.toml",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("other.toml")));
    match cli.command {
        Commands::Render(args) => {
            assert_eq!(args.component.as_deref(), Some("revenue"));
            assert_eq!(args.state, Some(serde_json::json!({"region": "EU"})));
        }
        _ => panic!("Expected render command"),
    }
}

#[test]
fn test_parse_kinds_show() {
    let cli = Cli::try_parse_from(["trevl", "kinds", "show", "DonutChart"]).unwrap();

    assert!(matches!(
        cli.command,
        Commands::Kinds(KindsCommands::Show { ref name, definition: None }) if name == "DonutChart"
    ));
}

#[test]
fn test_version_runs() {
    let cli = Cli::try_parse_from(["trevl", "version"]).unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();

    assert!(runtime.block_on(run(cli)).is_ok());
}
