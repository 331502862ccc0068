//! Density-based clustering of API members across structures.
//!
//! Every comparable member of every input structure becomes one point. Points
//! are compared by normalized edit distance over `name signature docstring`, or
//! by Euclidean distance when both are numeric vectors of the same width (rows
//! of a TF-IDF feature matrix, for example). Clustering then runs over the
//! precomputed distance matrix.

use super::options::{OptionKind, OptionReader, OptionSpec};
use super::registry::AlgorithmDescriptor;
use super::{Algorithm, AlgorithmCategory};
use crate::config::AlgorithmParams;
use crate::document::{
    as_api_structure, as_numeric_vector, comparable_elements, structure_to_text, FEATURES_KEY,
};
use crate::errors::{Error, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, VecDeque};

const NAME: &str = "dbscan";

/// Label of a point that belongs to no cluster.
pub const NOISE: i64 = -1;

pub const DEFAULT_EPS: f64 = 0.5;
pub const DEFAULT_MIN_SAMPLES: usize = 2;

pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec::new(
        "eps",
        OptionKind::Float,
        "0.5",
        "Maximum distance between two points of the same neighbourhood",
    ),
    OptionSpec::new(
        "min_samples",
        OptionKind::Integer,
        "2",
        "Neighbours (including the point itself) needed to form a core point",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DbscanParams {
    pub eps: f64,
    pub min_samples: usize,
}

impl Default for DbscanParams {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPS,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }
}

impl DbscanParams {
    pub fn from_params(params: &AlgorithmParams) -> Result<Self> {
        let reader = OptionReader::new(NAME, OPTIONS, params)?;
        let eps = reader.float("eps", DEFAULT_EPS)?;
        if eps <= 0.0 {
            return Err(Error::configuration(format!(
                "{}: eps must be positive, got {}",
                NAME, eps
            )));
        }
        let min_samples = reader.integer("min_samples", DEFAULT_MIN_SAMPLES as i64)?;
        if min_samples < 1 {
            return Err(Error::configuration(format!(
                "{}: min_samples must be at least 1, got {}",
                NAME, min_samples
            )));
        }
        Ok(Self {
            eps,
            min_samples: min_samples as usize,
        })
    }
}

/// What a point is compared by.
#[derive(Debug, Clone, PartialEq)]
pub enum Point {
    Vector(Vec<f64>),
    Text(String),
}

impl Point {
    fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Vector(values) => Cow::Owned(
                values
                    .iter()
                    .map(f64::to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }
}

/// One clustered point and where it came from.
#[derive(Debug, Clone, PartialEq)]
struct Element {
    structure: usize,
    name: String,
    point: Point,
}

fn structure_label(index: usize) -> String {
    format!("struct_{}", index + 1)
}

fn extract_elements(data: &[Value]) -> Vec<Element> {
    let mut elements = Vec::new();
    for (structure, value) in data.iter().enumerate() {
        if let Some(api) = as_api_structure(value) {
            elements.extend(comparable_elements(&api).into_iter().map(|e| Element {
                structure,
                point: Point::Text(e.comparison_text()),
                name: e.qualified_name,
            }));
        } else if let Some(rows) = feature_rows(value) {
            elements.extend(rows.into_iter().enumerate().map(|(i, row)| Element {
                structure,
                name: format!("row_{}", i + 1),
                point: Point::Vector(row),
            }));
        } else if let Some(vector) = as_numeric_vector(value) {
            elements.push(Element {
                structure,
                name: "vector".to_string(),
                point: Point::Vector(vector),
            });
        } else {
            elements.push(Element {
                structure,
                name: "document".to_string(),
                point: Point::Text(structure_to_text(value)),
            });
        }
    }
    elements
}

fn feature_rows(value: &Value) -> Option<Vec<Vec<f64>>> {
    match value.get(FEATURES_KEY)? {
        Value::Array(rows) if !rows.is_empty() => rows.iter().map(as_numeric_vector).collect(),
        _ => None,
    }
}

/// Character edit distance between two strings.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Edit distance scaled by the longer length, in `[0, 1]`.
pub fn normalized_levenshtein(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    levenshtein(a, b) as f64 / longest as f64
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

pub fn distance(a: &Point, b: &Point) -> f64 {
    match (a, b) {
        (Point::Vector(x), Point::Vector(y)) if x.len() == y.len() => euclidean(x, y),
        _ => normalized_levenshtein(&a.text(), &b.text()),
    }
}

/// Pairwise distances, one row per point, rows computed in parallel.
pub fn distance_matrix(points: &[Point]) -> Vec<Vec<f64>> {
    points
        .par_iter()
        .enumerate()
        .map(|(i, a)| {
            points
                .iter()
                .enumerate()
                .map(|(j, b)| if i == j { 0.0 } else { distance(a, b) })
                .collect()
        })
        .collect()
}

/// Cluster labels over a precomputed distance matrix.
///
/// A point's neighbourhood is every point within `eps`, itself included. Core
/// points have at least `min_samples` neighbours; clusters grow outward from
/// core points and claim reachable border points. Unreached points are
/// [`NOISE`]. Labels are numbered in order of first core point.
pub fn dbscan_labels(distances: &[Vec<f64>], eps: f64, min_samples: usize) -> Vec<i64> {
    let neighbours: Vec<Vec<usize>> = distances
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, d)| **d <= eps)
                .map(|(j, _)| j)
                .collect()
        })
        .collect();
    let is_core: Vec<bool> = neighbours.iter().map(|n| n.len() >= min_samples).collect();

    let mut labels = vec![NOISE; distances.len()];
    let mut next_cluster = 0;
    for start in 0..distances.len() {
        if labels[start] != NOISE || !is_core[start] {
            continue;
        }
        labels[start] = next_cluster;
        let mut queue = VecDeque::from([start]);
        while let Some(point) = queue.pop_front() {
            if !is_core[point] {
                continue;
            }
            for &neighbour in &neighbours[point] {
                if labels[neighbour] == NOISE {
                    labels[neighbour] = next_cluster;
                    queue.push_back(neighbour);
                }
            }
        }
        next_cluster += 1;
    }
    labels
}

/// Output document of a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusteringReport {
    pub algorithm_used: &'static str,
    pub labels: Vec<i64>,
    pub cluster_count: usize,
    pub noise_count: usize,
    /// `struct_<n>` to element name to label
    pub detailed_mapping: BTreeMap<String, BTreeMap<String, i64>>,
    /// Label to the `{struct_<n>: element}` pairs it groups
    pub cluster_mapping: BTreeMap<i64, Vec<BTreeMap<String, String>>>,
    pub parameters: DbscanParams,
}

#[derive(Debug, Clone, Default)]
pub struct Dbscan {
    params: DbscanParams,
    labels: Option<Vec<i64>>,
}

impl Dbscan {
    pub fn new(params: DbscanParams) -> Self {
        Self {
            params,
            labels: None,
        }
    }

    pub fn configure(params: &AlgorithmParams) -> Result<Self> {
        DbscanParams::from_params(params).map(Self::new)
    }

    pub fn params(&self) -> DbscanParams {
        self.params
    }

    fn report(&self, labels: &[i64], elements: Vec<Element>) -> ClusteringReport {
        let mut detailed_mapping: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
        let mut cluster_mapping: BTreeMap<i64, Vec<BTreeMap<String, String>>> = BTreeMap::new();

        for (element, &label) in elements.into_iter().zip(labels) {
            let structure = structure_label(element.structure);
            detailed_mapping
                .entry(structure.clone())
                .or_default()
                .insert(element.name.clone(), label);
            cluster_mapping
                .entry(label)
                .or_default()
                .push(BTreeMap::from([(structure, element.name)]));
        }

        ClusteringReport {
            algorithm_used: NAME,
            labels: labels.to_vec(),
            cluster_count: cluster_mapping.keys().filter(|l| **l != NOISE).count(),
            noise_count: labels.iter().filter(|l| **l == NOISE).count(),
            detailed_mapping,
            cluster_mapping,
            parameters: self.params,
        }
    }
}

impl Algorithm for Dbscan {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fit(&mut self, data: &[Value]) -> Result<()> {
        let elements = extract_elements(data);
        if elements.is_empty() {
            return Err(Error::data_integrity(
                "No elements found in the structures for comparison.",
            ));
        }
        tracing::debug!("Clustering {} elements from {} structures", elements.len(), data.len());

        let points: Vec<Point> = elements.into_iter().map(|e| e.point).collect();
        let distances = distance_matrix(&points);
        if distances.iter().flatten().any(|d| !d.is_finite()) {
            return Err(Error::data_integrity(
                "Distance matrix contains NaN or infinity values.",
            ));
        }

        self.labels = Some(dbscan_labels(
            &distances,
            self.params.eps,
            self.params.min_samples,
        ));
        Ok(())
    }

    fn transform(&self, data: &[Value]) -> Result<Value> {
        let labels = self.labels.as_ref().ok_or_else(|| Error::not_fitted(NAME))?;
        let elements = extract_elements(data);
        if labels.len() != elements.len() {
            return Err(Error::data_integrity(format!(
                "Mismatch between labels and elements: {} labels for {} elements",
                labels.len(),
                elements.len()
            )));
        }
        Ok(serde_json::to_value(self.report(labels, elements))?)
    }
}

pub fn descriptor() -> AlgorithmDescriptor {
    AlgorithmDescriptor::new("DBSCAN", AlgorithmCategory::Clustering, OPTIONS, |params| {
        Ok(Box::new(Dbscan::configure(params)?) as Box<dyn Algorithm>)
    })
    .with_summary("Density clustering of API members by edit distance")
}
