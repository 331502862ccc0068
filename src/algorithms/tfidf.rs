//! TF-IDF feature extraction over the text of each structure.
//!
//! Each input structure is rendered as one text document (its scalar leaves
//! joined by spaces). The fitted vocabulary holds at most `max_features` terms,
//! chosen by corpus frequency and listed alphabetically. Rows use raw term
//! counts weighted by smooth inverse document frequency and are L2-normalized,
//! so the pairwise `cosine_similarity` is a plain dot product.

use super::options::{OptionKind, OptionReader, OptionSpec};
use super::registry::AlgorithmDescriptor;
use super::stop_words;
use super::{Algorithm, AlgorithmCategory};
use crate::config::AlgorithmParams;
use crate::document::structure_to_text;
use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};

const NAME: &str = "tfidf";

pub const DEFAULT_MAX_FEATURES: usize = 500;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec::new(
        "max_features",
        OptionKind::Integer,
        "500",
        "Maximum vocabulary size, keeping the most frequent terms",
    ),
    OptionSpec::new(
        "stop_words",
        OptionKind::TextList,
        "english",
        "'english', 'none', or a list of words to ignore",
    ),
];

/// Words removed before counting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StopWords {
    #[default]
    English,
    None,
    Custom(BTreeSet<String>),
}

impl StopWords {
    fn from_words(words: Vec<String>) -> Self {
        match words.as_slice() {
            [single] if single.eq_ignore_ascii_case("english") => Self::English,
            [single] if single.eq_ignore_ascii_case("none") => Self::None,
            [] => Self::None,
            _ => Self::Custom(words.into_iter().map(|w| w.to_lowercase()).collect()),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        match self {
            Self::English => stop_words::ENGLISH.binary_search(&word).is_ok(),
            Self::None => false,
            Self::Custom(words) => words.contains(word),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TfidfParams {
    pub max_features: usize,
    pub stop_words: StopWords,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            stop_words: StopWords::English,
        }
    }
}

impl TfidfParams {
    pub fn from_params(params: &AlgorithmParams) -> Result<Self> {
        let reader = OptionReader::new(NAME, OPTIONS, params)?;
        let max_features = reader.integer("max_features", DEFAULT_MAX_FEATURES as i64)?;
        if max_features < 1 {
            return Err(Error::configuration(format!(
                "{}: max_features must be at least 1, got {}",
                NAME, max_features
            )));
        }
        Ok(Self {
            max_features: max_features as usize,
            stop_words: StopWords::from_words(reader.text_list("stop_words", &["english"])?),
        })
    }
}

fn tokenize<'a>(text: &'a str, stop_words: &'a StopWords) -> impl Iterator<Item = &'a str> + 'a {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(move |token| !stop_words.contains(token))
}

/// The learned vocabulary, in column order.
#[derive(Debug, Clone, PartialEq)]
struct Vocabulary {
    terms: Vec<String>,
    columns: HashMap<String, usize>,
    idf: Vec<f64>,
}

/// Output document of a TF-IDF run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    /// One row per input structure, one column per vocabulary term
    pub tfidf_features: Vec<Vec<f64>>,
    pub feature_names: Vec<String>,
    pub cosine_similarity: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Default)]
pub struct Tfidf {
    params: TfidfParams,
    vocabulary: Option<Vocabulary>,
}

impl Tfidf {
    pub fn new(params: TfidfParams) -> Self {
        Self {
            params,
            vocabulary: None,
        }
    }

    pub fn configure(params: &AlgorithmParams) -> Result<Self> {
        TfidfParams::from_params(params).map(Self::new)
    }

    /// Terms of the fitted vocabulary, alphabetically.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.vocabulary.as_ref().map(|v| v.terms.as_slice())
    }

    fn documents(data: &[Value]) -> Vec<String> {
        data.iter()
            .map(|structure| structure_to_text(structure).to_lowercase())
            .collect()
    }

    fn vectorize(&self, vocabulary: &Vocabulary, document: &str) -> Vec<f64> {
        let mut row = vec![0.0; vocabulary.terms.len()];
        for token in tokenize(document, &self.params.stop_words) {
            if let Some(&column) = vocabulary.columns.get(token) {
                row[column] += 1.0;
            }
        }
        for (value, idf) in row.iter_mut().zip(&vocabulary.idf) {
            *value *= idf;
        }
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            row.iter_mut().for_each(|v| *v /= norm);
        }
        row
    }
}

fn cosine_similarity(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|a| {
            rows.iter()
                .map(|b| a.iter().zip(b).map(|(x, y)| x * y).sum())
                .collect()
        })
        .collect()
}

impl Algorithm for Tfidf {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fit(&mut self, data: &[Value]) -> Result<()> {
        let documents = Self::documents(data);
        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        let mut document_frequency: HashMap<&str, usize> = HashMap::new();

        for document in &documents {
            let mut seen = HashSet::new();
            for token in tokenize(document, &self.params.stop_words) {
                *term_counts.entry(token).or_default() += 1;
                if seen.insert(token) {
                    *document_frequency.entry(token).or_default() += 1;
                }
            }
        }

        if term_counts.is_empty() {
            return Err(Error::data_integrity(
                "empty vocabulary; perhaps the documents only contain stop words",
            ));
        }

        let mut ranked: Vec<(&str, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked.truncate(self.params.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        terms.sort();

        let n = documents.len() as f64;
        let idf = terms
            .iter()
            .map(|t| {
                let df = document_frequency.get(t.as_str()).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        let columns = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        tracing::debug!(
            "Fitted vocabulary of {} terms over {} documents",
            terms.len(),
            documents.len()
        );
        self.vocabulary = Some(Vocabulary {
            terms,
            columns,
            idf,
        });
        Ok(())
    }

    fn transform(&self, data: &[Value]) -> Result<Value> {
        let vocabulary = self.vocabulary.as_ref().ok_or_else(|| Error::not_fitted(NAME))?;
        let rows: Vec<Vec<f64>> = Self::documents(data)
            .iter()
            .map(|document| self.vectorize(vocabulary, document))
            .collect();

        Ok(serde_json::to_value(FeatureMatrix {
            cosine_similarity: cosine_similarity(&rows),
            tfidf_features: rows,
            feature_names: vocabulary.terms.clone(),
        })?)
    }
}

pub fn descriptor() -> AlgorithmDescriptor {
    AlgorithmDescriptor::new(
        "TFIDF",
        AlgorithmCategory::FeatureExtraction,
        OPTIONS,
        |params| Ok(Box::new(Tfidf::configure(params)?) as Box<dyn Algorithm>),
    )
    .with_summary("Term-frequency / inverse-document-frequency text features")
}
