//! Scoring of candidate patterns against observed values
//!
//! Everything here is a pure function of the pattern and the value
//! slices it is evaluated against. Weights and thresholds are public so
//! hosts can reproduce or tune the trade-offs.

use serde::{Deserialize, Serialize};

use crate::pattern::Pattern;

/// Divisor normalizing raw pattern cost into `[0, 1]` complexity.
pub const COMPLEXITY_NORMALIZER: f64 = 50.0;

/// Default weight of the coverage term in [`score`].
pub const DEFAULT_COVERAGE_WEIGHT: f64 = 2.0;

/// Default weight of the precision term in [`score`].
pub const DEFAULT_PRECISION_WEIGHT: f64 = 1.5;

/// Default weight of the complexity term in [`score`].
pub const DEFAULT_COMPLEXITY_WEIGHT: f64 = 1.0;

/// Default weight of the interpretability term in [`score`].
pub const DEFAULT_INTERPRETABILITY_WEIGHT: f64 = 0.5;

/// Weights for the combined pattern [`score`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    /// Weight of `1 - coverage`
    pub coverage: f64,
    /// Weight of `1 - precision`
    pub precision: f64,
    /// Weight of `complexity`
    pub complexity: f64,
    /// Weight of `1 - interpretability`
    pub interpretability: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            coverage: DEFAULT_COVERAGE_WEIGHT,
            precision: DEFAULT_PRECISION_WEIGHT,
            complexity: DEFAULT_COMPLEXITY_WEIGHT,
            interpretability: DEFAULT_INTERPRETABILITY_WEIGHT,
        }
    }
}

/// Fraction of `values` fully matched by the compiled pattern.
///
/// An empty slice yields `0.0`; a pattern that fails to compile matches
/// nothing.
pub fn coverage(pattern: &Pattern, values: &[String]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    match pattern.compile() {
        Ok(regex) => {
            let matched = values.iter().filter(|v| regex.is_match(v)).count();
            matched as f64 / values.len() as f64
        }
        Err(err) => {
            tracing::warn!("failed to compile pattern regex: {}", err);
            0.0
        }
    }
}

/// Blend of intrinsic specificity and discrimination between valid and
/// invalid samples.
///
/// With no invalid samples (or no matches on either side) this falls
/// back to the pattern's specificity alone.
pub fn precision(pattern: &Pattern, valid: &[String], invalid: &[String]) -> f64 {
    let specificity = pattern.specificity();
    if invalid.is_empty() {
        return specificity;
    }

    let regex = match pattern.compile() {
        Ok(regex) => regex,
        Err(err) => {
            tracing::warn!("failed to compile pattern regex: {}", err);
            return specificity;
        }
    };

    let v = valid.iter().filter(|s| regex.is_match(s)).count();
    let i = invalid.iter().filter(|s| regex.is_match(s)).count();
    if v + i == 0 {
        return specificity;
    }

    (specificity + v as f64 / (v + i) as f64) / 2.0
}

/// Pattern cost normalized into `[0, 1]`.
pub fn complexity(pattern: &Pattern) -> f64 {
    (pattern.cost() / COMPLEXITY_NORMALIZER).min(1.0)
}

/// How easy the pattern is for a human to read, as a step function of
/// sequence length and the largest enum alternative count.
pub fn interpretability(pattern: &Pattern) -> f64 {
    let len = pattern.seq_length();
    let enum_size = pattern.max_enum_size();

    if len <= 3 && enum_size <= 5 {
        1.0
    } else if len <= 5 && enum_size <= 10 {
        0.8
    } else if len <= 8 && enum_size <= 20 {
        0.6
    } else if len <= 12 {
        0.5
    } else {
        0.3
    }
}

/// Weighted badness of a pattern for a value set; lower is better.
pub fn score(pattern: &Pattern, values: &[String], weights: &ScoreWeights) -> f64 {
    weights.coverage * (1.0 - coverage(pattern, values))
        + weights.precision * (1.0 - precision(pattern, values, &[]))
        + weights.complexity * complexity(pattern)
        + weights.interpretability * (1.0 - interpretability(pattern))
}

/// Suggest an enum threshold for a value set from its repetition
/// profile: categorical data enumerates generously, high-cardinality
/// data barely at all.
pub fn suggest_enum_threshold(values: &[String]) -> usize {
    let total = values.len();
    let distinct = {
        let set: std::collections::BTreeSet<&str> = values.iter().map(|v| v.as_str()).collect();
        set.len()
    };
    if distinct == 0 {
        return 5;
    }

    let repetition = total as f64 / distinct as f64;
    if distinct <= 10 && repetition >= 3.0 {
        distinct + 5
    } else if distinct <= 30 && repetition >= 2.0 {
        10
    } else if distinct <= 100 {
        5
    } else {
        3
    }
}
