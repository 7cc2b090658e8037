//! Merging of profiles
//!
//! Two profiles are merged by re-profiling the union of the values
//! their patterns were synthesized from, under the first profile's
//! options. Only the members recorded in each pattern flow into the
//! union; prior anomalies are forgotten. [`merge_strict`] is the
//! variant that feeds both anomaly lists back in.

use std::collections::HashSet;

use crate::error::ProfileError;
use crate::profile::{Profile, Profiler};

/// Merge two profiles by re-profiling the deduplicated union of their
/// recorded pattern members under `first`'s options.
///
/// # Errors
///
/// Returns [`ProfileError::EmptyInput`] when neither profile recorded
/// any members.
pub fn merge(first: &Profile, second: &Profile) -> Result<Profile, ProfileError> {
    let values = union_values(first, second, false);
    Profiler::with_options(first.options.clone()).profile(&values)
}

/// Like [`merge`], but the union also carries both profiles' anomalies,
/// so prior outliers stay visible in the merged profile.
pub fn merge_strict(first: &Profile, second: &Profile) -> Result<Profile, ProfileError> {
    let values = union_values(first, second, true);
    Profiler::with_options(first.options.clone()).profile(&values)
}

fn union_values(first: &Profile, second: &Profile, include_anomalies: bool) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut values = Vec::new();

    let member_lists = first
        .patterns
        .iter()
        .chain(second.patterns.iter())
        .map(|p| p.members.as_slice());
    for members in member_lists {
        for value in members {
            if seen.insert(value.as_str()) {
                values.push(value.clone());
            }
        }
    }

    if include_anomalies {
        for value in first.anomalies.iter().chain(second.anomalies.iter()) {
            if seen.insert(value.as_str()) {
                values.push(value.clone());
            }
        }
    }

    values
}
