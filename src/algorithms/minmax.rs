//! Min-max scaling of the numeric leaves of nested documents.

use super::options::{OptionKind, OptionReader, OptionSpec};
use super::registry::AlgorithmDescriptor;
use super::{Algorithm, AlgorithmCategory};
use crate::config::AlgorithmParams;
use crate::document::{map_numeric_leaves, numeric_leaves};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NAME: &str = "minmaxscaler";

pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec::new(
        "feature_range",
        OptionKind::FloatPair,
        "(0, 1)",
        "Target range (lo, hi) of the scaled values",
    ),
    OptionSpec::new(
        "per_structure",
        OptionKind::Boolean,
        "true",
        "Scale each structure by its own range instead of the fitted global range",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxParams {
    pub feature_range: (f64, f64),
    pub per_structure: bool,
}

impl Default for MinMaxParams {
    fn default() -> Self {
        Self {
            feature_range: (0.0, 1.0),
            per_structure: true,
        }
    }
}

impl MinMaxParams {
    pub fn from_params(params: &AlgorithmParams) -> Result<Self> {
        let defaults = Self::default();
        let reader = OptionReader::new(NAME, OPTIONS, params)?;
        let (lo, hi) = reader.float_pair("feature_range", defaults.feature_range)?;
        if !(lo.is_finite() && hi.is_finite()) {
            return Err(Error::configuration(format!(
                "{}: feature_range bounds must be finite, got ({}, {})",
                NAME, lo, hi
            )));
        }
        if lo >= hi {
            return Err(Error::configuration(format!(
                "{}: feature_range lower bound must be below the upper bound, got ({}, {})",
                NAME, lo, hi
            )));
        }
        Ok(Self {
            feature_range: (lo, hi),
            per_structure: reader.boolean("per_structure", defaults.per_structure)?,
        })
    }
}

/// Observed value range, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn of(values: &[f64]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        Some(rest.iter().fold(
            Self {
                min: *first,
                max: *first,
            },
            |r, &v| Self {
                min: r.min.min(v),
                max: r.max.max(v),
            },
        ))
    }
}

/// Map `x` from `source` into `[lo, hi]`.
///
/// A zero-width source range maps every value to the midpoint of the target.
/// Offsets are taken on halved values so ranges wider than `f64::MAX` stay finite.
fn scale(x: f64, source: Range, (lo, hi): (f64, f64)) -> f64 {
    let half_width = source.max / 2.0 - source.min / 2.0;
    if half_width == 0.0 {
        return lo / 2.0 + hi / 2.0;
    }
    let t = (x / 2.0 - source.min / 2.0) / half_width;
    let scaled = lo * (1.0 - t) + hi * t;
    if (source.min..=source.max).contains(&x) {
        scaled.clamp(lo, hi)
    } else {
        scaled
    }
}

#[derive(Debug, Clone, Default)]
pub struct MinMaxScaler {
    params: MinMaxParams,
    fitted: Option<Range>,
}

impl MinMaxScaler {
    pub fn new(params: MinMaxParams) -> Self {
        Self {
            params,
            fitted: None,
        }
    }

    pub fn configure(params: &AlgorithmParams) -> Result<Self> {
        MinMaxParams::from_params(params).map(Self::new)
    }

    /// Global `(min, max)` learned by the last `fit`.
    pub fn data_range(&self) -> Option<(f64, f64)> {
        self.fitted.map(|r| (r.min, r.max))
    }

    fn scale_structure(&self, structure: &Value, global: Range) -> Value {
        let source = if self.params.per_structure {
            match Range::of(&numeric_leaves(structure)) {
                Some(local) => local,
                None => return structure.clone(),
            }
        } else {
            global
        };
        if source.min == source.max {
            tracing::debug!(
                "Zero-width range {} in structure; mapping to the midpoint",
                source.min
            );
        }
        let target = self.params.feature_range;
        map_numeric_leaves(structure, &|x| scale(x, source, target))
    }
}

impl Algorithm for MinMaxScaler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fit(&mut self, data: &[Value]) -> Result<()> {
        let values: Vec<f64> = data.iter().flat_map(numeric_leaves).collect();
        let range = Range::of(&values).ok_or_else(|| {
            Error::data_integrity("The structure contains no numeric values to scale.")
        })?;
        tracing::debug!(
            "Fitted range [{}, {}] over {} values",
            range.min,
            range.max,
            values.len()
        );
        self.fitted = Some(range);
        Ok(())
    }

    fn transform(&self, data: &[Value]) -> Result<Value> {
        let global = self.fitted.ok_or_else(|| Error::not_fitted(NAME))?;
        Ok(Value::Array(
            data.iter()
                .map(|structure| self.scale_structure(structure, global))
                .collect(),
        ))
    }
}

pub fn descriptor() -> AlgorithmDescriptor {
    AlgorithmDescriptor::new(
        "MinMaxScaler",
        AlgorithmCategory::Normalization,
        OPTIONS,
        |params| Ok(Box::new(MinMaxScaler::configure(params)?) as Box<dyn Algorithm>),
    )
    .with_summary("Rescale numeric leaves into a target range")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn params(value: Value) -> AlgorithmParams {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_scales_leaves_to_unit_range() {
        let mut scaler = MinMaxScaler::default();
        let output = scaler
            .fit_transform(&[json!({"a": 10, "b": {"c": 20}})])
            .unwrap();
        assert_eq!(output, json!([{"a": 0.0, "b": {"c": 1.0}}]));
        assert_eq!(scaler.data_range(), Some((10.0, 20.0)));
    }

    #[test]
    fn test_each_structure_uses_its_own_range() {
        let mut scaler = MinMaxScaler::configure(&params(json!({"feature_range": [-1, 1]}))).unwrap();
        let output = scaler
            .fit_transform(&[json!([0, 5, 10]), json!({"x": 100, "y": [200, "label", true]})])
            .unwrap();
        assert_eq!(
            output,
            json!([[-1.0, 0.0, 1.0], {"x": -1.0, "y": [1.0, "label", true]}])
        );
    }

    #[test]
    fn test_global_range_when_not_per_structure() {
        let mut scaler =
            MinMaxScaler::configure(&params(json!({"per_structure": false}))).unwrap();
        let output = scaler.fit_transform(&[json!([0, 5]), json!([10])]).unwrap();
        assert_eq!(output, json!([[0.0, 0.5], [1.0]]));
    }

    #[test]
    fn test_zero_width_range_maps_to_midpoint() {
        let mut scaler = MinMaxScaler::default();
        let output = scaler
            .fit_transform(&[json!({"a": 7, "b": 7}), json!({"a": 1, "b": 3})])
            .unwrap();
        assert_eq!(output, json!([{"a": 0.5, "b": 0.5}, {"a": 0.0, "b": 1.0}]));
    }

    #[test]
    fn test_structures_without_numbers_pass_through() {
        let mut scaler = MinMaxScaler::default();
        let output = scaler
            .fit_transform(&[json!({"name": "x"}), json!([1, 2])])
            .unwrap();
        assert_eq!(output, json!([{"name": "x"}, [0.0, 1.0]]));
    }

    #[test]
    fn test_no_numeric_values_is_integrity_error() {
        let mut scaler = MinMaxScaler::default();
        let err = scaler
            .fit(&[json!({"flag": true, "name": "n"})])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Data integrity error: The structure contains no numeric values to scale."
        );
    }

    #[test]
    fn test_transform_before_fit() {
        let scaler = MinMaxScaler::default();
        assert!(matches!(
            scaler.transform(&[json!([1])]).unwrap_err(),
            Error::NotFitted { .. }
        ));
    }

    #[test]
    fn test_invalid_feature_range() {
        assert!(MinMaxScaler::configure(&params(json!({"feature_range": [1, 1]}))).is_err());
        assert!(MinMaxScaler::configure(&params(json!({"feature_range": "(2, 0)"}))).is_err());
        for range in ["(nan, 1)", "(0, inf)"] {
            let err = MinMaxScaler::configure(&params(json!({ "feature_range": range })))
                .unwrap_err();
            assert!(err.is_configuration(), "{} gave {:?}", range, err);
        }
    }

    #[test]
    fn test_range_wider_than_f64_max_keeps_every_leaf() {
        let mut scaler = MinMaxScaler::default();
        let output = scaler
            .fit_transform(&[
                json!({"a": -1e308, "b": 1e308}),
                json!({"a": 1, "b": 2}),
            ])
            .unwrap();
        assert_eq!(output, json!([{"a": 0.0, "b": 1.0}, {"a": 0.0, "b": 1.0}]));

        let mut scaler = MinMaxScaler::default();
        let output = scaler
            .fit_transform(&[json!([-f64::MAX, 0.0, f64::MAX])])
            .unwrap();
        assert_eq!(output, json!([[0.0, 0.5, 1.0]]));
    }
}
