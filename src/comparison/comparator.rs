use crate::algorithms::{Algorithm, AlgorithmRegistry};
use crate::config::ParamSet;
use crate::document::ensure_comparable;
use crate::errors::{Error, Result};
use crate::observability::guard_panics;
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Result of one algorithm in an independent comparison.
///
/// Serialized untagged: a failure is `{"error": "<message>"}`, a success is the
/// algorithm's output document as is. Reading back treats only an object whose
/// sole key is a string `error` as a failure, so a successful output of exactly
/// that shape cannot be told apart from a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AlgorithmOutcome {
    Failed { error: String },
    Success(Value),
}

impl<'de> Deserialize<'de> for AlgorithmOutcome {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl AlgorithmOutcome {
    /// Classify a persisted result document.
    pub fn from_value(value: Value) -> Self {
        if let Value::Object(map) = &value {
            if map.len() == 1 {
                if let Some(Value::String(error)) = map.get("error") {
                    return Self::Failed {
                        error: error.clone(),
                    };
                }
            }
        }
        Self::Success(value)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            Self::Success(_) => None,
        }
    }
}

/// Algorithm name to outcome.
pub type ComparisonResults = BTreeMap<String, AlgorithmOutcome>;

/// Run each algorithm independently over `structures`.
///
/// `algorithms` defaults to every registered algorithm. `jobs` bounds the
/// worker pool; `None` uses one worker per CPU. Unknown names and bad
/// parameters fail the whole call before anything runs; failures while running
/// are recorded per algorithm.
pub fn compare_structures(
    structures: &[Value],
    algorithms: Option<&[String]>,
    params: &ParamSet,
    registry: &AlgorithmRegistry,
    jobs: Option<usize>,
) -> Result<ComparisonResults> {
    ensure_comparable(structures)?;

    let names: Vec<String> = match algorithms {
        Some(requested) if requested.is_empty() => {
            return Err(Error::usage("no algorithms requested"));
        }
        Some(requested) => requested.to_vec(),
        None => registry.names().into_iter().map(str::to_string).collect(),
    };

    let mut instances: Vec<(String, Box<dyn Algorithm>)> = Vec::with_capacity(names.len());
    for name in &names {
        let descriptor = registry.resolve(name)?;
        let algorithm = descriptor.instantiate(&params.for_algorithm(descriptor.name()))?;
        instances.push((descriptor.name().to_string(), algorithm));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()
        .map_err(|e| Error::execution(format!("failed to start worker pool: {}", e)))?;

    tracing::info!(
        "Comparing {} structures with {} algorithms",
        structures.len(),
        instances.len()
    );

    let results = pool.install(|| {
        instances
            .into_par_iter()
            .map(|(name, mut algorithm)| {
                let outcome = match guard_panics(&name, || algorithm.fit_transform(structures)) {
                    Ok(value) => {
                        tracing::debug!("{} completed", name);
                        AlgorithmOutcome::Success(value)
                    }
                    Err(e) => {
                        tracing::warn!("{} failed [{}]: {}", name, e.category(), e);
                        AlgorithmOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                (name, outcome)
            })
            .collect::<ComparisonResults>()
    });

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structures() -> Vec<Value> {
        vec![
            json!({"pkg.load": {"type": "function", "signature": "(path)"}}),
            json!({"pkg.load": {"type": "function", "signature": "(path, mode)"}}),
        ]
    }

    #[test]
    fn test_runs_requested_algorithms() {
        let registry = AlgorithmRegistry::builtin();
        let requested = vec!["DBSCAN".to_string(), "tfidf".to_string()];
        let results = compare_structures(
            &structures(),
            Some(&requested),
            &ParamSet::new(),
            &registry,
            Some(2),
        )
        .unwrap();

        assert_eq!(results.keys().collect::<Vec<_>>(), vec!["dbscan", "tfidf"]);
        assert!(results.values().all(AlgorithmOutcome::is_success));
        assert_eq!(
            results["dbscan"].value().unwrap()["algorithm_used"],
            json!("dbscan")
        );
    }

    #[test]
    fn test_failure_is_recorded_not_fatal() {
        let registry = AlgorithmRegistry::builtin();
        let requested = vec!["minmaxscaler".to_string(), "tfidf".to_string()];
        // no numeric leaves anywhere, so the scaler fails
        let results = compare_structures(
            &structures(),
            Some(&requested),
            &ParamSet::new(),
            &registry,
            None,
        )
        .unwrap();

        assert!(results["tfidf"].is_success());
        assert!(results["minmaxscaler"]
            .error()
            .unwrap()
            .contains("no numeric values"));
        assert_eq!(
            serde_json::to_value(&results["minmaxscaler"]).unwrap()["error"],
            json!(results["minmaxscaler"].error().unwrap())
        );
    }

    #[test]
    fn test_outcome_reads_back_only_exact_failures() {
        let failed: AlgorithmOutcome = serde_json::from_value(json!({"error": "diverged"})).unwrap();
        assert_eq!(
            failed,
            AlgorithmOutcome::Failed {
                error: "diverged".to_string()
            }
        );

        for document in [
            json!({"error": "diverged", "labels": [0, 1]}),
            json!({"error": 3}),
            json!({"feature_names": ["a"]}),
            json!([1, 2]),
        ] {
            let outcome: AlgorithmOutcome = serde_json::from_value(document.clone()).unwrap();
            assert_eq!(outcome, AlgorithmOutcome::Success(document));
        }

        let results: ComparisonResults = serde_json::from_value(json!({
            "dbscan": {"labels": [0, 0], "error": "none"},
            "tfidf": {"error": "empty vocabulary"}
        }))
        .unwrap();
        assert!(results["dbscan"].is_success());
        assert_eq!(results["tfidf"].error(), Some("empty vocabulary"));
    }

    #[test]
    fn test_defaults_to_every_algorithm() {
        let registry = AlgorithmRegistry::builtin();
        let results =
            compare_structures(&structures(), None, &ParamSet::new(), &registry, Some(1)).unwrap();
        assert_eq!(results.len(), registry.len());
    }

    #[test]
    fn test_configuration_errors_fail_fast() {
        let registry = AlgorithmRegistry::builtin();
        let unknown = vec!["tfidf".to_string(), "NoSuchAlgo".to_string()];
        let err = compare_structures(&structures(), Some(&unknown), &ParamSet::new(), &registry, None)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownAlgorithm { .. }));

        let mut params = ParamSet::new();
        params.set("tfidf", "max_features", json!(0));
        let err = compare_structures(&structures(), None, &params, &registry, None).unwrap_err();
        assert!(err.is_configuration());

        let err = compare_structures(&structures()[..1], None, &ParamSet::new(), &registry, None)
            .unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }
}
