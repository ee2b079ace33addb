use super::*;

#[test]
fn dashboard_errors_keep_their_message() {
    let inner = TrevlError::MissingArgument {
        kind: "DonutChart".to_string(),
        argument: "y".to_string(),
    };

    let error = Error::from(inner.clone());

    assert_eq!(error.to_string(), inner.to_string());
}

#[test]
fn file_errors_name_the_path() {
    let error = Error::file(
        "dashboards/sales.yaml",
        io::Error::new(io::ErrorKind::NotFound, "No such file"),
    );

    let message = error.to_string();
    assert!(message.contains("dashboards/sales.yaml"));
    assert!(message.contains("No such file"));
}

#[test]
fn service_errors_are_wrapped() {
    let error = Error::from(ClientError::MissingEnvironment {
        name: "X_MIDDLE_BASEURL".to_string(),
    });

    assert!(matches!(error, Error::Service(_)));
    assert!(error.to_string().contains("X_MIDDLE_BASEURL"));
}
