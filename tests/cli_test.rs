//! Integration tests for the muzzle binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const EVENTS_CONFIG: &str = r#"
name: lambda-events
instrumentation:
  references:
    - com.amazonaws.services.lambda.runtime.events.APIGatewayV2HTTPEvent
rules:
  - name: events
    group: com.amazonaws
    module: aws-lambda-java-events
    versions: "[3.0.0,)"
catalog:
  - artifact: com.amazonaws:aws-lambda-java-events
    releases: ["3.0.0", "3.2.0", "3.11.0"]
    symbols:
      - symbol: com.amazonaws.services.lambda.runtime.events.APIGatewayV2HTTPEvent
        since: "3.2.0"
resolved:
  com.amazonaws:aws-lambda-java-events: "3.11.0"
"#;

fn setup_project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".muzzle");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yml"), config).unwrap();
    temp
}

fn muzzle(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("muzzle"));
    cmd.current_dir(temp.path())
        .env_remove("MUZZLE_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--project")
        .arg(temp.path());
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("muzzle"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ompatibility-matrix verification"))
        .stdout(predicate::str::contains("matrix"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("muzzle"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_without_config_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    muzzle(&temp)
        .arg("verify")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("muzzle init"));
    Ok(())
}

#[test]
fn cli_no_subcommand_verifies() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(EVENTS_CONFIG);
    muzzle(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("All rules pass"));
    Ok(())
}

#[test]
fn cli_verify_set_failure_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(EVENTS_CONFIG);
    muzzle(&temp)
        .args(["verify", "--set", "com.amazonaws:aws-lambda-java-events=3.0.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[missing-symbol]"));
    Ok(())
}

#[test]
fn cli_verify_json_is_parseable() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(EVENTS_CONFIG);
    let output = muzzle(&temp)
        .args(["verify", "--format", "json"])
        .output()?;
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["summary"]["passed"], 1);
    Ok(())
}

#[test]
fn cli_matrix_reports_failing_sample() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(EVENTS_CONFIG);
    muzzle(&temp)
        .arg("matrix")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Fingerprint:"))
        .stdout(predicate::str::contains("3.0.0"))
        .stderr(predicate::str::contains("error[missing-symbol]"));
    Ok(())
}

#[test]
fn cli_matrix_fingerprint_is_stable() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(EVENTS_CONFIG);
    let run = || -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        let output = muzzle(&temp).args(["matrix", "--format", "json"]).output()?;
        Ok(serde_json::from_slice(&output.stdout)?)
    };
    let first = run()?;
    let second = run()?;
    assert!(first["summary"]["fingerprint"].is_string());
    assert_eq!(first["summary"]["fingerprint"], second["summary"]["fingerprint"]);
    Ok(())
}

#[test]
fn cli_init_then_matrix_passes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    muzzle(&temp)
        .args(["init", "--template", "aws-lambda-events"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created .muzzle/config.yml"));
    assert!(temp.path().join(".muzzle/config.yml").exists());

    muzzle(&temp).arg("matrix").assert().success();
    muzzle(&temp).arg("verify").assert().success();
    Ok(())
}

#[test]
fn cli_init_refuses_to_overwrite() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(EVENTS_CONFIG);
    muzzle(&temp)
        .arg("init")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--force"));
    Ok(())
}

#[test]
fn cli_rules_lists_rules() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(EVENTS_CONFIG);
    muzzle(&temp)
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("[3.0.0,)"));
    Ok(())
}

#[test]
fn cli_config_override_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let path = temp.path().join("lambda.yml");
    fs::write(&path, EVENTS_CONFIG)?;
    muzzle(&temp)
        .arg("--config")
        .arg(&path)
        .args(["config", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lambda-events\""));
    Ok(())
}

#[test]
fn cli_malformed_range_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(&EVENTS_CONFIG.replace("[3.0.0,)", "[3.0.0,"));
    muzzle(&temp)
        .arg("verify")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed-range"));
    Ok(())
}

#[test]
fn cli_config_check() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(EVENTS_CONFIG);
    muzzle(&temp).args(["config", "--check"]).assert().success();

    let temp = setup_project(&EVENTS_CONFIG.replace(
        "    versions: \"[3.0.0,)\"\n",
        "    versions: \"[3.0.0,)\"\n    excluded_dependencies: [\" com.amazonaws:aws-lambda-java-events\"]\n",
    ));
    muzzle(&temp)
        .args(["config", "--check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("excludes its own module"));
    Ok(())
}

#[test]
fn cli_verify_single_rule() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(EVENTS_CONFIG);
    muzzle(&temp).args(["verify", "--rule", "1"]).assert().success();
    muzzle(&temp)
        .args(["verify", "--rule", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No rule 2"));
    Ok(())
}

#[test]
fn cli_schema_prints_json_schema()-> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let output = muzzle(&temp).arg("schema").output()?;
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(value["properties"]["rules"].is_object());
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("muzzle"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("muzzle"));
    Ok(())
}
