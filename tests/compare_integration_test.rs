// Integration tests for independent multi-algorithm comparison
// These tests verify the end-to-end workflow from persisted structures to results

use anyhow::Result;
use apidrift::algorithms::{Algorithm, AlgorithmCategory, AlgorithmDescriptor, AlgorithmRegistry};
use apidrift::comparison::{compare_structures, AlgorithmOutcome};
use apidrift::config::ParamSet;
use apidrift::{io, Error, NOISE};
use serde_json::{json, Value};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from("tests/data/fixtures").join(name)
}

fn load_versions() -> Result<Vec<Value>> {
    Ok(vec![
        io::load(&fixture("client_v1.json"))?,
        io::load(&fixture("client_v2.yaml"))?,
    ])
}

struct AlwaysFails;

impl Algorithm for AlwaysFails {
    fn name(&self) -> &'static str {
        "alwaysfails"
    }

    fn fit(&mut self, _data: &[Value]) -> apidrift::Result<()> {
        Err(Error::execution("numeric routine diverged"))
    }

    fn transform(&self, _data: &[Value]) -> apidrift::Result<Value> {
        Ok(Value::Null)
    }
}

#[test]
fn test_identical_structures_cluster_together() -> Result<()> {
    let structure = io::load(&fixture("client_v1.json"))?;
    let registry = AlgorithmRegistry::builtin();
    let algorithms = vec!["dbscan".to_string()];

    let results = compare_structures(
        &[structure.clone(), structure],
        Some(&algorithms),
        &ParamSet::new(),
        &registry,
        None,
    )?;

    let report = results["dbscan"].value().expect("dbscan succeeded");
    let mapping = report["detailed_mapping"].as_object().unwrap();
    assert_eq!(mapping.len(), 2);
    for (element, label) in mapping["struct_1"].as_object().unwrap() {
        assert_ne!(label, &json!(NOISE), "{} is noise", element);
        assert_eq!(label, &mapping["struct_2"][element]);
    }
    // modules are containers only, their members still count
    assert!(mapping["struct_1"].get("httpkit.sessions").is_none());
    assert!(mapping["struct_1"].get("httpkit.sessions.Session").is_some());
    Ok(())
}

#[test]
fn test_changed_member_is_tracked_per_structure() -> Result<()> {
    let structures = load_versions()?;
    let registry = AlgorithmRegistry::builtin();
    let algorithms = vec!["dbscan".to_string()];

    let results = compare_structures(
        &structures,
        Some(&algorithms),
        &ParamSet::new(),
        &registry,
        Some(1),
    )?;
    let report = results["dbscan"].value().unwrap();

    assert_eq!(report["labels"].as_array().unwrap().len(), 11);
    assert!(report["detailed_mapping"]["struct_2"]
        .get("httpkit.Client.stream")
        .is_some());
    assert_eq!(
        report["detailed_mapping"]["struct_1"]["httpkit.request"],
        report["detailed_mapping"]["struct_2"]["httpkit.request"]
    );
    Ok(())
}

#[test]
fn test_one_failing_algorithm_does_not_cancel_others() -> Result<()> {
    let structures = load_versions()?;
    let mut registry = AlgorithmRegistry::builtin();
    registry.register(AlgorithmDescriptor::new(
        "AlwaysFails",
        AlgorithmCategory::Clustering,
        &[],
        |_| Ok(Box::new(AlwaysFails) as Box<dyn Algorithm>),
    ))?;
    let algorithms = vec!["tfidf".to_string(), "AlwaysFails".to_string()];

    let results = compare_structures(
        &structures,
        Some(&algorithms),
        &ParamSet::new(),
        &registry,
        Some(2),
    )?;

    assert_eq!(results.len(), 2);
    assert!(results["tfidf"].is_success());
    assert_eq!(
        results["alwaysfails"],
        AlgorithmOutcome::Failed {
            error: "Algorithm execution error: numeric routine diverged".to_string()
        }
    );

    let document = serde_json::to_value(&results)?;
    assert_eq!(
        document["alwaysfails"],
        json!({"error": "Algorithm execution error: numeric routine diverged"})
    );
    assert!(document["tfidf"]["feature_names"].is_array());
    Ok(())
}

#[test]
fn test_tfidf_similarity_reflects_drift() -> Result<()> {
    let structures = load_versions()?;
    let registry = AlgorithmRegistry::builtin();
    let algorithms = vec!["tfidf".to_string()];

    let results = compare_structures(
        &structures,
        Some(&algorithms),
        &ParamSet::new(),
        &registry,
        None,
    )?;
    let similarity: Vec<Vec<f64>> =
        serde_json::from_value(results["tfidf"].value().unwrap()["cosine_similarity"].clone())?;

    assert!((similarity[0][0] - 1.0).abs() < 1e-9);
    assert!(similarity[0][1] > 0.5 && similarity[0][1] < 1.0);
    assert!((similarity[0][1] - similarity[1][0]).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_params_reach_the_algorithm() -> Result<()> {
    let structures = load_versions()?;
    let registry = AlgorithmRegistry::builtin();
    let algorithms = vec!["tfidf".to_string()];
    let mut params = ParamSet::new();
    params.apply_assignment("TFIDF.max_features=3")?;

    let results = compare_structures(&structures, Some(&algorithms), &params, &registry, None)?;
    let names = results["tfidf"].value().unwrap()["feature_names"].clone();
    assert_eq!(names.as_array().unwrap().len(), 3);
    Ok(())
}
