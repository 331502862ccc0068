//! Name-to-algorithm registry built once at startup.
//!
//! Algorithms register through an explicit descriptor table rather than by
//! scanning for plugins. Each descriptor is validated on registration; an
//! invalid one is skipped with a warning and recorded in
//! [`AlgorithmRegistry::skipped`], and the rest of the registry still builds.
//! After construction the registry is read-only and shared by reference.

use super::options::OptionSpec;
use super::{Algorithm, AlgorithmCategory};
use crate::config::AlgorithmParams;
use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

static ALGORITHM_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").expect("valid regex"));

/// Builds a configured algorithm instance from its parameter mapping.
pub type AlgorithmFactory =
    Arc<dyn Fn(&AlgorithmParams) -> Result<Box<dyn Algorithm>> + Send + Sync>;

/// Registry entry describing one pluggable algorithm.
#[derive(Clone)]
pub struct AlgorithmDescriptor {
    name: String,
    display_name: String,
    category: AlgorithmCategory,
    summary: String,
    options: &'static [OptionSpec],
    factory: AlgorithmFactory,
}

impl AlgorithmDescriptor {
    pub fn new<F>(
        display_name: impl Into<String>,
        category: AlgorithmCategory,
        options: &'static [OptionSpec],
        factory: F,
    ) -> Self
    where
        F: Fn(&AlgorithmParams) -> Result<Box<dyn Algorithm>> + Send + Sync + 'static,
    {
        let display_name = display_name.into();
        Self {
            name: display_name.to_lowercase(),
            display_name,
            category,
            summary: String::new(),
            options,
            factory: Arc::new(factory),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Case-folded name used for lookup and parameter namespacing.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn category(&self) -> AlgorithmCategory {
        self.category
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn options(&self) -> &'static [OptionSpec] {
        self.options
    }

    /// Construct a fresh, configured instance.
    pub fn instantiate(&self, params: &AlgorithmParams) -> Result<Box<dyn Algorithm>> {
        (self.factory)(params)
    }
}

impl fmt::Debug for AlgorithmDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmDescriptor")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("options", &self.options.iter().map(|o| o.key).collect::<Vec<_>>())
            .finish()
    }
}

/// A descriptor rejected during registry construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAlgorithm {
    pub name: String,
    pub reason: String,
}

/// Read-only mapping from case-folded algorithm name to descriptor.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: BTreeMap<String, AlgorithmDescriptor>,
    skipped: Vec<SkippedAlgorithm>,
}

impl AlgorithmRegistry {
    /// A registry with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding every algorithm shipped with the crate.
    pub fn builtin() -> Self {
        Self::discover(super::builtin_descriptors())
    }

    /// Register every valid descriptor, skipping the invalid ones.
    pub fn discover<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = AlgorithmDescriptor>,
    {
        let mut registry = Self::empty();
        for descriptor in descriptors {
            let name = descriptor.display_name().to_string();
            if let Err(e) = registry.register(descriptor) {
                tracing::warn!("Skipping algorithm '{}': {}", name, e);
                registry.skipped.push(SkippedAlgorithm {
                    name,
                    reason: e.to_string(),
                });
            }
        }
        tracing::debug!(
            "Finished loading algorithms. Total algorithms loaded: {}",
            registry.len()
        );
        registry
    }

    /// Validate and add one descriptor. A name already present is replaced.
    pub fn register(&mut self, descriptor: AlgorithmDescriptor) -> Result<()> {
        validate(&descriptor)?;
        let name = descriptor.name().to_string();
        if self.algorithms.contains_key(&name) {
            tracing::warn!(
                "Algorithm '{}' registered twice; the later registration wins",
                name
            );
        }
        tracing::debug!(
            "Algorithm {} loaded successfully with category: {}",
            name,
            descriptor.category()
        );
        self.algorithms.insert(name, descriptor);
        Ok(())
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&AlgorithmDescriptor> {
        self.algorithms.get(&name.to_lowercase())
    }

    /// Case-insensitive lookup that reports every known name on failure.
    pub fn resolve(&self, name: &str) -> Result<&AlgorithmDescriptor> {
        self.get(name)
            .ok_or_else(|| Error::unknown_algorithm(name, self.names()))
    }

    /// Known names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.algorithms.keys().map(String::as_str).collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &AlgorithmDescriptor> {
        self.algorithms.values()
    }

    pub fn skipped(&self) -> &[SkippedAlgorithm] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

fn validate(descriptor: &AlgorithmDescriptor) -> Result<()> {
    if !ALGORITHM_NAME.is_match(descriptor.name()) {
        return Err(Error::configuration(format!(
            "algorithm name '{}' must consist of word characters only",
            descriptor.display_name()
        )));
    }
    // Defaults must configure cleanly, otherwise the algorithm is unusable without params
    descriptor
        .instantiate(&AlgorithmParams::new())
        .map(|_| ())
        .map_err(|e| {
            Error::configuration(format!(
                "algorithm '{}' cannot be configured with its defaults: {}",
                descriptor.display_name(),
                e
            ))
        })
}
