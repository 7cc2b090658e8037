//! Configuration for pattern profiling

use serde::{Deserialize, Serialize};

/// Default upper bound on surviving clusters.
pub const DEFAULT_MAX_CLUSTERS: usize = 5;

/// Default minimum coverage below which a discovered pattern is dropped.
pub const DEFAULT_MIN_COVERAGE: f64 = 0.01;

/// Default maximum number of distinct values before a position is
/// generalized into a character class.
pub const DEFAULT_ENUM_THRESHOLD: usize = 10;

/// Default ceiling on normalized skeleton distance for merging clusters.
pub const DEFAULT_MERGE_THRESHOLD: f64 = 0.3;

/// Default minimum cluster size; smaller clusters are dropped.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 1;

/// Default length tolerance. Accepted for API compatibility; the current
/// synthesis algorithm does not read it.
pub const DEFAULT_LENGTH_TOLERANCE: f64 = 0.2;

/// Configuration for pattern profiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOptions {
    /// Upper bound on surviving clusters
    pub max_clusters: usize,

    /// Patterns whose coverage falls below this fraction are dropped
    pub min_coverage: f64,

    /// Maximum distinct values at a position before generalizing
    pub enum_threshold: usize,

    /// Whether to populate the anomaly list
    pub detect_anomalies: bool,

    /// Reserved; accepted and ignored by the current synthesis algorithm
    pub length_tolerance: f64,

    /// Skeleton-distance ceiling for merging clusters (0.0 - 1.0)
    pub merge_threshold: f64,

    /// Clusters smaller than this are dropped
    pub min_cluster_size: usize,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            max_clusters: DEFAULT_MAX_CLUSTERS,
            min_coverage: DEFAULT_MIN_COVERAGE,
            enum_threshold: DEFAULT_ENUM_THRESHOLD,
            detect_anomalies: true,
            length_tolerance: DEFAULT_LENGTH_TOLERANCE,
            merge_threshold: DEFAULT_MERGE_THRESHOLD,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
        }
    }
}

impl ProfileOptions {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ProfileOptionsBuilder {
        ProfileOptionsBuilder::default()
    }
}

/// Builder for ProfileOptions
#[derive(Debug, Default)]
pub struct ProfileOptionsBuilder {
    options: ProfileOptions,
}

impl ProfileOptionsBuilder {
    /// Set the upper bound on surviving clusters (at least 1)
    pub fn max_clusters(mut self, max: usize) -> Self {
        self.options.max_clusters = max.max(1);
        self
    }

    /// Set the minimum coverage for surviving patterns
    pub fn min_coverage(mut self, coverage: f64) -> Self {
        self.options.min_coverage = coverage.clamp(0.0, 1.0);
        self
    }

    /// Set the maximum distinct values before generalizing a position
    pub fn enum_threshold(mut self, threshold: usize) -> Self {
        self.options.enum_threshold = threshold;
        self
    }

    /// Enable or disable anomaly detection
    pub fn detect_anomalies(mut self, detect: bool) -> Self {
        self.options.detect_anomalies = detect;
        self
    }

    /// Set the length tolerance (accepted for compatibility, unused)
    pub fn length_tolerance(mut self, tolerance: f64) -> Self {
        self.options.length_tolerance = tolerance.clamp(0.0, 1.0);
        self
    }

    /// Set the skeleton-distance ceiling for merging clusters
    pub fn merge_threshold(mut self, threshold: f64) -> Self {
        self.options.merge_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the minimum cluster size (at least 1)
    pub fn min_cluster_size(mut self, size: usize) -> Self {
        self.options.min_cluster_size = size.max(1);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ProfileOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ProfileOptions::default();
        assert_eq!(options.max_clusters, 5);
        assert_eq!(options.min_coverage, 0.01);
        assert_eq!(options.enum_threshold, 10);
        assert!(options.detect_anomalies);
        assert_eq!(options.merge_threshold, 0.3);
        assert_eq!(options.min_cluster_size, 1);
    }

    #[test]
    fn test_builder() {
        let options = ProfileOptions::builder()
            .max_clusters(8)
            .min_coverage(0.05)
            .enum_threshold(20)
            .detect_anomalies(false)
            .build();

        assert_eq!(options.max_clusters, 8);
        assert_eq!(options.min_coverage, 0.05);
        assert_eq!(options.enum_threshold, 20);
        assert!(!options.detect_anomalies);
    }

    #[test]
    fn test_builder_clamping() {
        let options = ProfileOptions::builder()
            .max_clusters(0)
            .min_coverage(1.5)
            .merge_threshold(-0.2)
            .min_cluster_size(0)
            .build();

        assert_eq!(options.max_clusters, 1);
        assert_eq!(options.min_coverage, 1.0);
        assert_eq!(options.merge_threshold, 0.0);
        assert_eq!(options.min_cluster_size, 1);
    }
}
