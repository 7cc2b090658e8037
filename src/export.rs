//! Serialization-ready export of a profile

use serde_json::{json, Value};

use crate::profile::Profile;

/// Convert a profile to a plain, serialization-ready record.
///
/// The record carries one entry per pattern (`regex`, `pretty`,
/// `coverage`, `matchedCount`, `specificity`) plus the profile stats.
pub fn export(profile: &Profile) -> Value {
    let patterns: Vec<Value> = profile
        .patterns
        .iter()
        .map(|info| {
            json!({
                "regex": info.regex_string,
                "pretty": info.pattern.describe(),
                "coverage": info.coverage,
                "matchedCount": info.matched_count,
                "specificity": info.specificity,
            })
        })
        .collect();

    json!({
        "patterns": patterns,
        "stats": profile.stats,
    })
}
