use anyhow::Result;
use apidrift::document::{as_api_structure, MemberKind};
use apidrift::io::{self, Format};
use apidrift::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_fixture_versions_load_as_api_structures() -> Result<()> {
    let v1 = io::load(Path::new("tests/data/fixtures/client_v1.json"))?;
    let v2 = io::load(Path::new("tests/data/fixtures/client_v2.yaml"))?;

    let v1 = as_api_structure(&v1).expect("v1 is an API structure");
    let v2 = as_api_structure(&v2).expect("v2 is an API structure");

    assert_eq!(v1["httpkit.Client"].kind, MemberKind::Class);
    assert_eq!(v2["httpkit.Client"].members.as_ref().unwrap().len(), 3);
    assert_eq!(
        v2["httpkit.Client"].members.as_ref().unwrap()["stream"].kind,
        MemberKind::AsyncMethod
    );
    assert_eq!(v1["httpkit.request"], v2["httpkit.request"]);
    Ok(())
}

#[test]
fn test_save_then_load_in_every_format() -> Result<()> {
    let dir = TempDir::new()?;
    let document = json!({
        "pkg.f": {"type": "function", "signature": "(x, y=1)", "docstring": "Add."},
        "stats": {"calls": 3, "ratio": 0.25}
    });

    for name in ["out.json", "out.yaml", "out.yml", "out.toml"] {
        let path = dir.path().join(name);
        io::save(&path, &document)?;
        assert_eq!(io::load(&path)?, document, "{}", name);
    }
    Ok(())
}

#[test]
fn test_toml_fixture() -> Result<()> {
    let metrics = io::load(Path::new("tests/data/fixtures/metrics.toml"))?;
    assert_eq!(
        metrics,
        json!({"latency": {"p50": 12, "p99": 80}, "errors": {"rate": 0.5}})
    );
    Ok(())
}

#[test]
fn test_unsupported_extension_names_it() {
    let err = io::save(Path::new("results.xml"), &json!({})).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(ref ext) if ext == "xml"));
    assert_eq!(
        Format::from_path(Path::new("api.TXT")).unwrap_err().to_string(),
        "Unsupported file format: txt"
    );
}

#[test]
fn test_parse_errors_carry_the_path() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"a\": ")?;

    let err = io::load(&path).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
    Ok(())
}

#[test]
fn test_toml_cannot_hold_null() {
    let err = io::render(&json!({"a": null}), Format::Toml);
    assert!(err.is_err());
}
