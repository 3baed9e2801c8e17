//! `cgrid` binary tests.

use crate::common::{StubBackend, TestConfig, cgrid};
use anyhow::Result;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::Output;

/// Run `cgrid` off the async runtime so the stub backend keeps serving.
async fn run(config: PathBuf, args: Vec<String>) -> Result<Output> {
    let output = tokio::task::spawn_blocking(move || cgrid(&config).args(&args).output()).await??;
    Ok(output)
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_config_init_and_path() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    let path = temp.path().join("cfg").join("config.toml");

    cgrid(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"))
        .stdout(predicate::str::contains("page_limit = 50"));
    assert!(path.exists());

    cgrid(&path).args(["config", "init"]).assert().success().stdout(predicate::str::contains("already exists"));

    cgrid(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.display().to_string()));
    Ok(())
}

#[test]
fn test_config_show_prints_settings() -> Result<()> {
    let config = TestConfig::new("http://127.0.0.1:9/lookup")?;
    cgrid(&config.path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("endpoint = \"http://127.0.0.1:9/lookup\""))
        .stdout(predicate::str::contains("timeout_secs = 5"));
    Ok(())
}

#[test]
fn test_options_without_endpoint_fails() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    cgrid(&temp.path().join("absent.toml"))
        .args(["options", "product"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("cgrid config init"));
    Ok(())
}

#[test]
fn test_unknown_field_rejected() -> Result<()> {
    let config = TestConfig::new("http://127.0.0.1:9/lookup")?;
    cgrid(&config.path).args(["options", "wagon"]).assert().failure();
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_options_json_output() -> Result<()> {
    let backend = StubBackend::master_data(
        vec![("UN Code Init", Some("P1"), json!([{ "id": "U9", "name": "Hazmat" }, { "id": "U1", "name": "Other" }]))],
        Vec::new(),
    )
    .await?;
    let config = TestConfig::new(backend.url())?;

    let output = run(config.path.clone(), args(&["options", "uncode", "--driving", "P1", "--limit", "10", "--json"])).await?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let options: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(options, json!([
        { "label": "U9 || Hazmat", "value": "U9 || Hazmat" },
        { "label": "U1 || Other", "value": "U1 || Other" }
    ]));

    let sent = backend.requests_of("UN Code Init");
    assert_eq!(sent[0]["limit"], 10);
    assert_eq!(sent[0]["additionalFilter"][0]["FilterValue"], "P1");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_endpoint_flag_overrides_config() -> Result<()> {
    let backend = StubBackend::master_data(
        vec![("Product ID Init", None, json!([{ "id": "P1", "name": "Widget" }]))],
        Vec::new(),
    )
    .await?;
    let config = TestConfig::new("http://127.0.0.1:9/unused")?;

    let output = run(config.path.clone(), args(&["options", "product", "--endpoint", backend.url()])).await?;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Widget"));
    assert_eq!(backend.requests().len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_replay_json_report() -> Result<()> {
    let backend = StubBackend::master_data(
        vec![("DG Class Init", Some("U9"), json!([{ "id": "D1", "name": "Explosive" }]))],
        vec![
            ("U9", json!({ "DGClass": "D1", "DGClassDescription": "Explosive" })),
            ("P1", json!({ "UNCode": "U1", "DGClass": "D4" })),
        ],
    )
    .await?;
    let config = TestConfig::new(backend.url())?;

    let rows = config.write(
        "rows.json",
        r#"[{ "Product": "P7", "UNCode": "U7", "DGClass": "D7", "ContainsHazardousGoods": "Yes", "TripNumber": "T-1" }]"#,
    )?;
    let script = config.write(
        "script.json",
        r#"{
            "events": [
                { "event": "new-row" },
                { "event": "select", "row": -1, "field": "uncode", "value": "U9 || Hazmat" },
                { "event": "options", "row": "new", "field": "dgclass" },
                { "event": "select", "row": -1, "field": "product", "value": "P1 || Widget" },
                { "event": "commit" },
                { "event": "clear", "row": 0, "field": "product" }
            ]
        }"#,
    )?;

    let output = run(
        config.path.clone(),
        args(&["replay", script.to_str().unwrap(), "--rows", rows.to_str().unwrap(), "--json"]),
    )
    .await?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: Value = serde_json::from_slice(&output.stdout)?;
    let outcomes: Vec<&str> = report["steps"].as_array().unwrap().iter().map(|s| s["outcome"].as_str().unwrap()).collect();
    assert_eq!(
        outcomes,
        vec!["started", "Populated", "1 option(s)", "PriorityKept", "committed as row 1", "Cleared"]
    );

    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows[0]["Product"], "");
    assert_eq!(rows[0]["UNCode"], "");
    assert_eq!(rows[0]["ContainsHazardousGoods"], "No");
    assert_eq!(rows[0]["TripNumber"], "T-1");
    assert_eq!(rows[1]["Product"], "P1");
    assert_eq!(rows[1]["UNCode"], "U9");
    assert_eq!(rows[1]["DGClass"], "D1");
    assert_eq!(rows[1]["ContainsHazardousGoods"], "Yes");
    assert!(report["newRow"].is_null());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_replay_stops_on_misuse() -> Result<()> {
    let backend = StubBackend::master_data(Vec::new(), Vec::new()).await?;
    let config = TestConfig::new(backend.url())?;
    let script = config.write("script.json", r#"{ "events": [{ "event": "commit" }] }"#)?;

    let output = run(config.path.clone(), args(&["replay", script.to_str().unwrap()])).await?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("new row"));
    Ok(())
}

#[test]
fn test_replay_bad_script() -> Result<()> {
    let config = TestConfig::new("http://127.0.0.1:9/lookup")?;
    let script = config.write("script.json", "{ \"events\": [ { \"event\": \"undo\" } ] }")?;

    cgrid(&config.path)
        .args(["replay", script.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("script.json"));
    Ok(())
}
