// End-to-end tests for the apidrift binary

use anyhow::Result;
use assert_cmd::Command;
use indoc::indoc;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/fixtures")
        .join(name)
}

fn apidrift(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("apidrift").expect("binary builds");
    cmd.current_dir(dir)
        .env_remove("APIDRIFT_CONFIG")
        .env_remove("APIDRIFT_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn read_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[test]
fn test_compare_writes_results() -> Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("results.json");

    apidrift(dir.path())
        .arg("compare")
        .arg("--structures")
        .arg(fixture("client_v1.json"))
        .arg(fixture("client_v2.yaml"))
        .args(["--algorithms", "dbscan,minmaxscaler,tfidf"])
        .arg("--output")
        .arg(&output)
        .args(["--param", "dbscan.eps=0.3"])
        .assert()
        .success();

    let results = read_json(&output)?;
    assert_eq!(results["dbscan"]["parameters"], json!({"eps": 0.3, "min_samples": 2}));
    assert!(results["tfidf"]["feature_names"].is_array());
    // no numeric leaves in API structures
    assert!(results["minmaxscaler"]["error"]
        .as_str()
        .unwrap()
        .contains("no numeric values"));
    Ok(())
}

#[test]
fn test_compare_uses_config_file() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join(".apidrift.toml"),
        indoc! {r#"
            [compare]
            algorithms = ["tfidf"]

            [params.tfidf]
            max_features = 4
        "#},
    )?;
    let output = dir.path().join("results.yaml");

    apidrift(dir.path())
        .arg("compare")
        .arg("-s")
        .arg(fixture("client_v1.json"))
        .arg(fixture("client_v2.yaml"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let results: Value = serde_yaml::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(results.as_object().unwrap().len(), 1);
    assert_eq!(results["tfidf"]["feature_names"].as_array().unwrap().len(), 4);
    Ok(())
}

#[test]
fn test_single_structure_is_a_usage_error() -> Result<()> {
    let dir = TempDir::new()?;
    let assert = apidrift(dir.path())
        .arg("compare")
        .arg("-s")
        .arg(fixture("client_v1.json"))
        .args(["-o", "out.json"])
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("at least 2 structures"), "{}", stderr);
    assert!(!dir.path().join("out.json").exists());
    Ok(())
}

#[test]
fn test_pipeline_runs_steps_in_order() -> Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("clusters.json");

    apidrift(dir.path())
        .arg("pipeline")
        .args(["--pipeline", "canon:textnormalizer,extract:tfidf,cluster:dbscan"])
        .arg("--structures")
        .arg(fixture("client_v1.json"))
        .arg(fixture("client_v2.yaml"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let result = read_json(&output)?;
    assert_eq!(result["algorithm_used"], json!("dbscan"));
    assert_eq!(result["labels"], json!([0, 0]));
    Ok(())
}

#[test]
fn test_pipeline_reports_unknown_algorithm() -> Result<()> {
    let dir = TempDir::new()?;
    let assert = apidrift(dir.path())
        .arg("pipeline")
        .args(["--pipeline", "normalize:NoSuchAlgo"])
        .arg("-s")
        .arg(fixture("client_v1.json"))
        .arg(fixture("client_v2.yaml"))
        .args(["-o", "out.json"])
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("NoSuchAlgo"), "{}", stderr);
    assert!(stderr.contains("dbscan, minmaxscaler, textnormalizer, tfidf"), "{}", stderr);
    Ok(())
}

#[test]
fn test_normalize_overwrites_input_by_default() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("api.json");
    fs::write(&input, r#"{"Get_User": {"type": "function", "docstring": "Fetch  A\n User"}}"#)?;

    apidrift(dir.path())
        .args(["normalize", "--input"])
        .arg(&input)
        .assert()
        .success();

    assert_eq!(
        read_json(&input)?,
        json!({"getuser": {"type": "function", "docstring": "fetch a user"}})
    );
    Ok(())
}

#[test]
fn test_normalize_preview_and_collisions() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("api.json");
    let original = r#"{"user_name": 1, "username": 2}"#;
    fs::write(&input, original)?;

    let assert = apidrift(dir.path())
        .args(["normalize", "--preview", "--input"])
        .arg(&input)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(serde_json::from_str::<Value>(&stdout)?, json!({"username": 2}));
    assert_eq!(fs::read_to_string(&input)?, original);

    apidrift(dir.path())
        .args(["normalize", "--reject-collisions", "--input"])
        .arg(&input)
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(&input)?, original);
    Ok(())
}

#[test]
fn test_algorithms_lists_registry() -> Result<()> {
    let dir = TempDir::new()?;
    let assert = apidrift(dir.path()).arg("algorithms").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for name in ["dbscan", "minmaxscaler", "textnormalizer", "tfidf"] {
        assert!(stdout.contains(name), "missing {}", name);
    }
    Ok(())
}

#[test]
fn test_init_creates_config_once() -> Result<()> {
    let dir = TempDir::new()?;
    apidrift(dir.path()).arg("init").assert().success();
    assert!(dir.path().join(".apidrift.toml").exists());
    apidrift(dir.path()).arg("init").assert().failure();
    apidrift(dir.path()).args(["init", "--force"]).assert().success();
    Ok(())
}
