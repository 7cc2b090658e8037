//! Profile assembly: the top-level orchestration of the pipeline
//!
//! A profile is constructed once per call and immutable thereafter.
//! Each surviving pattern carries its own lazily compiled regex so that
//! repeated validation does not recompile.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cluster::cluster_strings;
use crate::config::ProfileOptions;
use crate::error::{ProfileError, ValidateError};
use crate::pattern::Pattern;
use crate::synthesis::synthesize_best;

/// A surviving pattern with its bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInfo {
    /// The synthesized pattern
    pub pattern: Pattern,
    /// Unanchored regex lowering of `pattern`
    pub regex_string: String,
    /// Fraction of the profiled input matched, in `[0, 1]`
    pub coverage: f64,
    /// Number of input values matched
    pub matched_count: usize,
    /// The cluster members this pattern was synthesized from
    pub members: Vec<String>,
    /// Heuristic cost of the pattern
    pub cost: f64,
    /// Specificity of the pattern, in `[0, 1]`
    pub specificity: f64,
    /// Anchored regex, compiled on first use
    #[serde(skip)]
    compiled: OnceCell<Option<Regex>>,
}

impl PatternInfo {
    fn new(pattern: Pattern, coverage: f64, matched_count: usize, members: Vec<String>) -> Self {
        let regex_string = pattern.to_regex();
        let cost = pattern.cost();
        let specificity = pattern.specificity();
        Self {
            pattern,
            regex_string,
            coverage,
            matched_count,
            members,
            cost,
            specificity,
            compiled: OnceCell::new(),
        }
    }

    /// The compiled, anchored regex for this pattern. Compilation
    /// happens once; a failure is logged and remembered as "matches
    /// nothing".
    fn compiled(&self) -> Option<&Regex> {
        self.compiled
            .get_or_init(|| match self.pattern.compile() {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracing::warn!(
                        "failed to compile profile regex '{}': {}",
                        self.regex_string,
                        err
                    );
                    None
                }
            })
            .as_ref()
    }

    /// Whether this pattern fully matches the value.
    pub fn is_match(&self, value: &str) -> bool {
        self.compiled().is_some_and(|regex| regex.is_match(value))
    }
}

/// Aggregate statistics of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    /// Number of profiled values (multiset size)
    pub total_values: usize,
    /// Number of distinct profiled values
    pub distinct_values: usize,
    /// Number of surviving patterns
    pub pattern_count: usize,
    /// Sum of pattern coverages, capped at 1.0
    pub total_coverage: f64,
    /// Number of distinct anomalous values
    pub anomaly_count: usize,
}

/// The result of profiling a column of values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Surviving patterns, ordered by strictly descending coverage
    pub patterns: Vec<PatternInfo>,
    /// Distinct values matched by none of the patterns, first-seen order
    pub anomalies: Vec<String>,
    /// Aggregate statistics
    pub stats: ProfileStats,
    /// The options the profile was built with
    pub options: ProfileOptions,
}

impl Profile {
    /// Check a value against the profile.
    ///
    /// A value is valid iff at least one pattern's compiled regex
    /// matches it fully.
    pub fn validate(&self, value: &str) -> Result<(), ValidateError> {
        if self.patterns.iter().any(|p| p.is_match(value)) {
            Ok(())
        } else {
            Err(ValidateError::NoMatch)
        }
    }
}

/// Pattern discovery engine
///
/// Profiling is a pure function of the input values and options: equal
/// inputs produce bit-for-bit equal profiles.
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    options: ProfileOptions,
}

impl Profiler {
    /// Create a profiler with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profiler with custom options
    pub fn with_options(options: ProfileOptions) -> Self {
        Self { options }
    }

    /// The options this profiler runs with
    pub fn options(&self) -> &ProfileOptions {
        &self.options
    }

    /// Profile a column of values.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::EmptyInput`] when `values` is empty. No
    /// partial profile is constructed on failure.
    pub fn profile(&self, values: &[String]) -> Result<Profile, ProfileError> {
        if values.is_empty() {
            return Err(ProfileError::EmptyInput);
        }

        let distinct: Vec<String> = {
            let set: BTreeSet<&str> = values.iter().map(|v| v.as_str()).collect();
            set.into_iter().map(|v| v.to_string()).collect()
        };

        // A low-cardinality column is exactly its value set.
        if distinct.len() <= self.options.enum_threshold {
            return Ok(self.enumerated_profile(values, distinct));
        }

        let total = values.len();
        let clusters = cluster_strings(values, &self.options);

        let mut patterns: Vec<PatternInfo> = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            let pattern = synthesize_best(&cluster.members);
            let matched_count = match pattern.compile() {
                Ok(regex) => values.iter().filter(|v| regex.is_match(v)).count(),
                Err(err) => {
                    tracing::warn!("failed to compile cluster regex: {}", err);
                    0
                }
            };
            let coverage = matched_count as f64 / total as f64;
            if coverage < self.options.min_coverage {
                continue;
            }
            patterns.push(PatternInfo::new(
                pattern,
                coverage,
                matched_count,
                cluster.members,
            ));
        }

        // Stable sort keeps cluster discovery order among ties.
        patterns.sort_by(|a, b| {
            b.coverage
                .partial_cmp(&a.coverage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let anomalies = if self.options.detect_anomalies {
            let mut seen: HashSet<&str> = HashSet::new();
            values
                .iter()
                .filter(|v| seen.insert(v.as_str()))
                .filter(|v| !patterns.iter().any(|p| p.is_match(v)))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        let matched_total: usize = patterns.iter().map(|p| p.matched_count).sum();
        let stats = ProfileStats {
            total_values: total,
            distinct_values: distinct.len(),
            pattern_count: patterns.len(),
            total_coverage: (matched_total as f64 / total as f64).min(1.0),
            anomaly_count: anomalies.len(),
        };

        Ok(Profile {
            patterns,
            anomalies,
            stats,
            options: self.options.clone(),
        })
    }

    /// Profile a dynamic JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotAList`] unless the value is an array
    /// and [`ProfileError::NonStringValues`] unless every element is a
    /// string, in addition to the errors of [`profile`](Self::profile).
    pub fn profile_json(&self, value: &Value) -> Result<Profile, ProfileError> {
        let items = value.as_array().ok_or(ProfileError::NotAList)?;
        let values: Vec<String> = items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.to_string())
                    .ok_or(ProfileError::NonStringValues)
            })
            .collect::<Result<_, _>>()?;
        self.profile(&values)
    }

    fn enumerated_profile(&self, values: &[String], distinct: Vec<String>) -> Profile {
        let total = values.len();
        let distinct_count = distinct.len();
        let pattern = Pattern::enumeration(distinct);
        let info = PatternInfo::new(pattern, 1.0, total, values.to_vec());

        Profile {
            patterns: vec![info],
            anomalies: Vec::new(),
            stats: ProfileStats {
                total_values: total,
                distinct_values: distinct_count,
                pattern_count: 1,
                total_coverage: 1.0,
                anomaly_count: 0,
            },
            options: self.options.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_profile_empty_input() {
        let profiler = Profiler::new();
        assert!(matches!(
            profiler.profile(&[]),
            Err(ProfileError::EmptyInput)
        ));
    }

    #[test]
    fn test_profile_low_cardinality_enumerates() {
        let values: Vec<String> = (0..100)
            .map(|i| ["active", "pending", "closed"][i % 3].to_string())
            .collect();
        let profile = Profiler::new().profile(&values).expect("profile");

        assert_eq!(profile.patterns.len(), 1);
        assert_eq!(
            profile.patterns[0].regex_string,
            "(active|closed|pending)"
        );
        assert_eq!(profile.patterns[0].coverage, 1.0);
        assert_eq!(profile.patterns[0].matched_count, 100);
        assert!(profile.anomalies.is_empty());
        assert_eq!(profile.stats.total_values, 100);
        assert_eq!(profile.stats.distinct_values, 3);
        assert_eq!(profile.stats.total_coverage, 1.0);
    }

    #[test]
    fn test_profile_synthesizes_structured_column() {
        let values: Vec<String> = (0..50).map(|i| format!("SKU-{:06}", i)).collect();
        let profile = Profiler::new().profile(&values).expect("profile");

        assert_eq!(profile.patterns.len(), 1);
        assert_eq!(profile.patterns[0].regex_string, r"SKU\-\d{6}");
        assert_eq!(profile.stats.pattern_count, 1);
        assert!(profile.anomalies.is_empty());
    }

    #[test]
    fn test_profile_orders_patterns_by_coverage() {
        let mut values: Vec<String> = (0..60).map(|i| format!("AA-{:04}", i)).collect();
        values.extend((0..20).map(|i| format!("b.{:04}x", i)));
        let profile = Profiler::new().profile(&values).expect("profile");

        assert!(profile.patterns.len() >= 2);
        for pair in profile.patterns.windows(2) {
            assert!(pair[0].coverage >= pair[1].coverage);
        }
        assert_eq!(profile.patterns[0].regex_string, r"AA\-\d{4}");
    }

    #[test]
    fn test_profile_detects_anomalies() {
        let mut values: Vec<String> = (0..95).map(|i| format!("ID-{:04}", i)).collect();
        values.push("???".to_string());
        values.push("123".to_string());
        let options = ProfileOptions::builder().min_coverage(0.05).build();
        let profile = Profiler::with_options(options).profile(&values).expect("profile");

        assert_eq!(profile.anomalies, strings(&["???", "123"]));
        assert_eq!(profile.stats.anomaly_count, 2);
        assert!(profile.validate("ID-0042").is_ok());
        assert_eq!(profile.validate("???"), Err(ValidateError::NoMatch));
    }

    #[test]
    fn test_profile_anomalies_deduplicated() {
        let mut values: Vec<String> = (0..95).map(|i| format!("ID-{:04}", i)).collect();
        values.push("???".to_string());
        values.push("???".to_string());
        let options = ProfileOptions::builder().min_coverage(0.05).build();
        let profile = Profiler::with_options(options).profile(&values).expect("profile");

        assert_eq!(profile.anomalies, strings(&["???"]));
    }

    #[test]
    fn test_profile_anomaly_detection_disabled() {
        let mut values: Vec<String> = (0..95).map(|i| format!("ID-{:04}", i)).collect();
        values.push("???".to_string());
        let options = ProfileOptions::builder()
            .min_coverage(0.05)
            .detect_anomalies(false)
            .build();
        let profile = Profiler::with_options(options).profile(&values).expect("profile");

        assert!(profile.anomalies.is_empty());
        assert_eq!(profile.stats.anomaly_count, 0);
    }

    #[test]
    fn test_profile_min_coverage_drops_patterns() {
        let mut values: Vec<String> = (0..98).map(|i| format!("ID-{:04}", i)).collect();
        values.push("a b".to_string());
        values.push("c d".to_string());
        let options = ProfileOptions::builder().min_coverage(0.05).build();
        let profile = Profiler::with_options(options).profile(&values).expect("profile");

        assert_eq!(profile.patterns.len(), 1);
        assert_eq!(profile.stats.pattern_count, 1);
        assert_eq!(profile.anomalies, strings(&["a b", "c d"]));
    }

    #[test]
    fn test_validate_empty_profile_rejects() {
        // Every cluster pattern dropped by an aggressive floor.
        let values: Vec<String> = (0..20)
            .flat_map(|i| {
                vec![
                    format!("a-{:03}", i),
                    format!("b.{:03}", i),
                    format!("c_{:03}", i),
                ]
            })
            .collect();
        let options = ProfileOptions::builder().min_coverage(0.9).build();
        let profile = Profiler::with_options(options).profile(&values).expect("profile");
        assert!(profile.patterns.is_empty());
        assert_eq!(profile.validate("a-001"), Err(ValidateError::NoMatch));
    }

    #[test]
    fn test_profile_json_adapter() {
        let profiler = Profiler::new();

        let ok = profiler.profile_json(&json!(["a", "b", "a"]));
        assert!(ok.is_ok());

        let not_a_list = profiler.profile_json(&json!({"values": ["a"]}));
        assert!(matches!(not_a_list, Err(ProfileError::NotAList)));

        let non_string = profiler.profile_json(&json!(["a", 42]));
        assert!(matches!(non_string, Err(ProfileError::NonStringValues)));

        let empty = profiler.profile_json(&json!([]));
        assert!(matches!(empty, Err(ProfileError::EmptyInput)));
    }

    #[test]
    fn test_profile_is_deterministic() {
        let values: Vec<String> = (0..200)
            .map(|i| match i % 3 {
                0 => format!("ORD-{:05}", i),
                1 => format!("{}@mail.test", i),
                _ => format!("20{:02}-Q{}", i % 25, i % 4 + 1),
            })
            .collect();
        let profiler = Profiler::new();
        let a = profiler.profile(&values).expect("profile");
        let b = profiler.profile(&values).expect("profile");

        let a_json = serde_json::to_string(&a).expect("serialize");
        let b_json = serde_json::to_string(&b).expect("serialize");
        assert_eq!(a_json, b_json);
    }

    #[test]
    fn test_pattern_info_regex_cache() {
        let values: Vec<String> = (0..50).map(|i| format!("SKU-{:06}", i)).collect();
        let profile = Profiler::new().profile(&values).expect("profile");
        let info = &profile.patterns[0];

        assert!(info.is_match("SKU-000001"));
        assert!(!info.is_match("SKU-1"));
        // Second call goes through the cached regex.
        assert!(info.is_match("SKU-999999"));
    }
}
