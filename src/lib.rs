//! Pattern Profiler - Automatic regex-pattern discovery for columns of text values
//!
//! Given a bag of strings (e.g. a database column), the profiler
//! produces a small set of regular expressions that collectively
//! describe the structural format of the data, plus the outlier values
//! that fit none of them.
//!
//! ## Pipeline
//!
//! - **Tokenization** - Split each value into typed character runs
//! - **Clustering** - Group values by delimiter-skeleton similarity
//! - **Synthesis** - Align tokens column-wise and pick the best pattern
//!   element at every position, under a cost model
//! - **Assembly** - Score candidates, compute coverage, detect anomalies
//!
//! ## Example
//!
//! ```rust
//! use pattern_profiler::Profiler;
//!
//! let values: Vec<String> = (0..100).map(|i| format!("ORD-{:05}", i)).collect();
//!
//! let profile = Profiler::new().profile(&values)?;
//! assert_eq!(profile.patterns[0].regex_string, r"ORD\-\d{5}");
//! assert!(profile.validate("ORD-00042").is_ok());
//! # Ok::<(), pattern_profiler::ProfileError>(())
//! ```
//!
//! Profiling is deterministic: equal inputs and options produce
//! bit-for-bit equal profiles. Emitted regexes are PCRE-compatible and
//! unanchored; the matcher applies `^...$` itself.

pub mod cluster;
pub mod config;
pub mod cost;
pub mod error;
pub mod export;
pub mod merge;
pub mod pattern;
pub mod profile;
pub mod synthesis;
pub mod token;

// Re-export the core surface
pub use cluster::{cluster_strings, skeleton, Cluster};
pub use config::{ProfileOptions, ProfileOptionsBuilder, DEFAULT_ENUM_THRESHOLD};
pub use cost::{suggest_enum_threshold, ScoreWeights};
pub use error::{ProfileError, ValidateError};
pub use export::export;
pub use merge::{merge, merge_strict};
pub use pattern::{Bound, ClassKind, Pattern};
pub use profile::{PatternInfo, Profile, ProfileStats, Profiler};
pub use synthesis::{infer_pattern, infer_regex};
pub use token::{compact_signature, signature, tokenize, tokenize_merged, Token, TokenKind};
