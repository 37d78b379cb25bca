use assert_cmd::Command;
use assert_fs::prelude::*;
use serde_json::Value;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const SCHEMA: &str = r#"{
    "title": "Contact",
    "properties": {
        "name": { "id": "order:010", "type": "string", "required": true, "maxLength": 20 },
        "age": { "id": "order:020", "type": "integer", "minimum": 18, "maximum": 65 },
        "email": { "id": "order:030", "type": "string", "format": "email", "required": true }
    },
    "links": [
        { "rel": "create", "href": "https://api.test/contacts", "title": "Save" }
    ]
}"#;

fn workspace_with_schema() -> (assert_fs::TempDir, assert_fs::fixture::ChildPath) {
    let workspace = assert_fs::TempDir::new().expect("temp dir");
    let schema = workspace.child("schema.json");
    schema.write_str(SCHEMA).expect("write schema");
    (workspace, schema)
}

#[test]
fn plan_renders_text() -> CliResult<()> {
    let (_workspace, schema) = workspace_with_schema();

    let output = Command::cargo_bin("form-kit")?
        .arg("plan")
        .arg("--schema")
        .arg(schema.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output)?;
    assert!(text.contains("Form: Contact"));
    assert!(text.contains(" - age (age) [choice]"));
    assert!(text.contains("Buttons: Save"));
    Ok(())
}

#[test]
fn plan_renders_json() -> CliResult<()> {
    let (_workspace, schema) = workspace_with_schema();

    let output = Command::cargo_bin("form-kit")?
        .arg("plan")
        .arg("--schema")
        .arg(schema.path())
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let payload: Value = serde_json::from_slice(&output)?;
    assert_eq!(payload["fields"][0]["name"], "name");
    assert_eq!(payload["fields"][2]["widget"], "email");
    Ok(())
}

#[test]
fn validate_accepts_clean_data() -> CliResult<()> {
    let (workspace, schema) = workspace_with_schema();
    let data = workspace.child("data.json");
    data.write_str(r#"{ "name": "Ada", "age": 36, "email": "ada@example.com" }"#)?;

    let output = Command::cargo_bin("form-kit")?
        .arg("validate")
        .arg("--schema")
        .arg(schema.path())
        .arg("--data")
        .arg(data.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8(output)?.contains("Validation result: valid"));
    Ok(())
}

#[test]
fn validate_reports_each_failing_field() -> CliResult<()> {
    let (workspace, schema) = workspace_with_schema();
    let data = workspace.child("data.json");
    data.write_str(r#"{ "name": "", "age": "17", "email": "nope" }"#)?;

    let output = Command::cargo_bin("form-kit")?
        .arg("validate")
        .arg("--schema")
        .arg(schema.path())
        .arg("--data")
        .arg(data.path())
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output)?;
    assert!(text.contains("Validation result: invalid"));
    assert!(text.contains("age - The value must not be lower than 18"));
    assert!(text.contains("email - Invalid email address"));
    Ok(())
}

#[test]
fn extract_coerces_raw_widget_values() -> CliResult<()> {
    let (workspace, schema) = workspace_with_schema();
    let values = workspace.child("values.json");
    values.write_str(r#"{ "name": "  Ada  ", "age": "36", "email": "ada@example.com" }"#)?;

    let output = Command::cargo_bin("form-kit")?
        .arg("extract")
        .arg("--schema")
        .arg(schema.path())
        .arg("--values")
        .arg(values.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let data: Value = serde_json::from_slice(&output)?;
    assert_eq!(data["name"], "Ada");
    assert_eq!(data["age"], 36);
    Ok(())
}

#[test]
fn submit_dry_runs_the_delivery() -> CliResult<()> {
    let (workspace, schema) = workspace_with_schema();
    let data = workspace.child("data.json");
    data.write_str(r#"{ "name": "Ada", "age": 36, "email": "ada@example.com" }"#)?;

    let output = Command::cargo_bin("form-kit")?
        .arg("submit")
        .arg("--schema")
        .arg(schema.path())
        .arg("--data")
        .arg(data.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output)?;
    assert!(text.contains("POST https://api.test/contacts (application/json)"));
    assert!(text.contains("Delivered payload:"));
    Ok(())
}

#[test]
fn submit_blocks_on_invalid_data() -> CliResult<()> {
    let (workspace, schema) = workspace_with_schema();
    let data = workspace.child("data.json");
    data.write_str(r#"{ "name": "Ada", "age": "17", "email": "ada@example.com" }"#)?;

    let output = Command::cargo_bin("form-kit")?
        .arg("submit")
        .arg("--schema")
        .arg(schema.path())
        .arg("--data")
        .arg(data.path())
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8(output)?.contains("age - The value must not be lower than 18"));
    Ok(())
}
