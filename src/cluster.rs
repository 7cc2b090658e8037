//! Structural clustering of values by delimiter skeleton
//!
//! Values are reduced to a skeleton that keeps delimiters and
//! whitespace markers but collapses every character-class run to `X`.
//! Skeleton groups are then greedily merged under a normalized edit
//! distance, capped at the configured maximum cluster count.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ProfileOptions;
use crate::token::{compact_signature, signature, tokenize, TokenKind};

/// A group of values that can plausibly share a single synthesized
/// pattern. Clusters are transient: only their member lists survive
/// into the assembled profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Index of the cluster in discovery order
    pub id: usize,
    /// Member values; never empty
    pub members: Vec<String>,
    /// Full signature of the representative
    pub signature: String,
    /// Compact signature of the representative
    pub compact_signature: String,
    /// The member whose length is closest to the median member length
    pub representative: String,
}

/// Delimiter skeleton of a value: `_` for whitespace tokens, the raw
/// value for delimiter tokens, `X` for every other token.
///
/// # Examples
///
/// ```
/// use pattern_profiler::cluster::skeleton;
///
/// assert_eq!(skeleton("ACC-00123"), "X-X");
/// assert_eq!(skeleton("a b.c"), "X_X.X");
/// ```
pub fn skeleton(value: &str) -> String {
    let mut out = String::new();
    for token in tokenize(value) {
        match token.kind {
            TokenKind::Whitespace => out.push('_'),
            TokenKind::Delimiter => out.push_str(&token.value),
            _ => out.push('X'),
        }
    }
    out
}

/// Levenshtein edit distance, two-row dynamic programming over code
/// points. Inputs are short (tens of characters), so quadratic time is
/// fine.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

fn collapse_runs(skeleton: &str) -> String {
    let mut out = String::with_capacity(skeleton.len());
    let mut previous = None;
    for c in skeleton.chars() {
        if c == 'X' && previous == Some('X') {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

/// Normalized distance between two skeletons in `[0, 1]`.
///
/// Runs of `X` are collapsed first, so `X-X` and `XX-X` compare equal.
pub fn skeleton_distance(a: &str, b: &str) -> f64 {
    let a = collapse_runs(a);
    let b = collapse_runs(b);
    if a == b {
        return 0.0;
    }
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 0.0;
    }
    levenshtein(&a, &b) as f64 / longer as f64
}

struct SkeletonGroup {
    skeleton: String,
    members: Vec<String>,
}

/// Cluster values by delimiter-skeleton similarity.
///
/// Produces at most `options.max_clusters` clusters; overflow groups
/// are folded into a single tail cluster. Empty input yields no
/// clusters. With `min_cluster_size` at its default of 1, every input
/// value lands in exactly one cluster.
pub fn cluster_strings(values: &[String], options: &ProfileOptions) -> Vec<Cluster> {
    if values.is_empty() {
        return Vec::new();
    }

    // Stage 1: group by skeleton, first-seen order.
    let mut groups: Vec<SkeletonGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for value in values {
        let sk = skeleton(value);
        match index.get(&sk) {
            Some(&i) => groups[i].members.push(value.clone()),
            None => {
                index.insert(sk.clone(), groups.len());
                groups.push(SkeletonGroup {
                    skeleton: sk,
                    members: vec![value.clone()],
                });
            }
        }
    }

    // Stage 2: greedy similarity merging, largest groups first.
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by(|&a, &b| groups[b].members.len().cmp(&groups[a].members.len()));

    let mut absorbed = vec![false; groups.len()];
    let mut merged: Vec<SkeletonGroup> = Vec::new();
    for (pos, &i) in order.iter().enumerate() {
        if absorbed[i] {
            continue;
        }
        absorbed[i] = true;
        let mut group = SkeletonGroup {
            skeleton: groups[i].skeleton.clone(),
            members: groups[i].members.clone(),
        };
        for &j in &order[pos + 1..] {
            if absorbed[j] {
                continue;
            }
            let distance = skeleton_distance(&group.skeleton, &groups[j].skeleton);
            if distance <= options.merge_threshold {
                absorbed[j] = true;
                group.members.extend(groups[j].members.iter().cloned());
            }
        }
        merged.push(group);
    }

    // Stage 3: size and count enforcement.
    merged.retain(|g| g.members.len() >= options.min_cluster_size);

    if merged.len() > options.max_clusters {
        merged.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
        let tail: Vec<SkeletonGroup> = merged.split_off(options.max_clusters.saturating_sub(1));
        let folded: Vec<String> = tail.into_iter().flat_map(|g| g.members).collect();
        tracing::debug!(
            "folding {} overflow values into a tail cluster",
            folded.len()
        );
        merged.push(SkeletonGroup {
            skeleton: String::new(),
            members: folded,
        });
    }

    // Stage 4: finalization.
    merged
        .into_iter()
        .enumerate()
        .map(|(id, group)| {
            let representative = pick_representative(&group.members);
            Cluster {
                id,
                signature: signature(&representative),
                compact_signature: compact_signature(&representative),
                representative,
                members: group.members,
            }
        })
        .collect()
}

/// The member whose code-point length is closest to the median member
/// length; ties broken by first-seen order.
fn pick_representative(members: &[String]) -> String {
    let mut lengths: Vec<usize> = members.iter().map(|m| m.chars().count()).collect();
    lengths.sort_unstable();

    let mid = lengths.len() / 2;
    let median = if lengths.len() % 2 == 1 {
        lengths[mid] as f64
    } else {
        (lengths[mid - 1] + lengths[mid]) as f64 / 2.0
    };

    let mut best: Option<(&String, f64)> = None;
    for member in members {
        let delta = (member.chars().count() as f64 - median).abs();
        match best {
            Some((_, best_delta)) if delta >= best_delta => {}
            _ => best = Some((member, delta)),
        }
    }

    best.map(|(m, _)| m.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_skeleton() {
        assert_eq!(skeleton("ACC-00123"), "X-X");
        assert_eq!(skeleton("2024-01-15"), "X-X-X");
        assert_eq!(skeleton("a b"), "X_X");
        assert_eq!(skeleton("???"), "???");
        assert_eq!(skeleton(""), "");
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "ab"), 2);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("X-X", "X_X"), 1);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_skeleton_distance() {
        // Identical after collapsing X runs.
        assert_eq!(skeleton_distance("X-X", "XX-X"), 0.0);
        assert!((skeleton_distance("X-X", "X_X") - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(skeleton_distance("", ""), 0.0);
    }

    #[test]
    fn test_cluster_empty_input() {
        let clusters = cluster_strings(&[], &ProfileOptions::default());
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_cluster_partitions_input() {
        let values = strings(&["A-1", "B-2", "x y", "p q", "A-3"]);
        let clusters = cluster_strings(&values, &ProfileOptions::default());

        let total: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, values.len());

        let mut all: Vec<String> = clusters.iter().flat_map(|c| c.members.clone()).collect();
        all.sort();
        let mut expected = values.clone();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_cluster_groups_by_skeleton() {
        let values = strings(&["A-1", "BB-22", "x.y", "c.d"]);
        let clusters = cluster_strings(&values, &ProfileOptions::default());
        assert_eq!(clusters.len(), 2);

        // Largest-first ordering puts the dash group ahead.
        assert_eq!(clusters[0].members, strings(&["A-1", "BB-22"]));
        assert_eq!(clusters[1].members, strings(&["x.y", "c.d"]));
    }

    #[test]
    fn test_cluster_max_clusters_folds_tail() {
        let values = strings(&["a-b", "c.d", "e_f", "g@h", "i:j", "k;l"]);
        let options = ProfileOptions::builder()
            .max_clusters(3)
            .merge_threshold(0.0)
            .build();
        let clusters = cluster_strings(&values, &options);

        assert_eq!(clusters.len(), 3);
        let total: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, values.len());
        // The tail cluster holds everything beyond the top two groups.
        assert_eq!(clusters[2].members.len(), 4);
    }

    #[test]
    fn test_cluster_min_size_drops_small_groups() {
        let values = strings(&["A-1", "B-2", "lonely value"]);
        let options = ProfileOptions::builder()
            .min_cluster_size(2)
            .build();
        let clusters = cluster_strings(&values, &options);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, strings(&["A-1", "B-2"]));
    }

    #[test]
    fn test_cluster_merges_similar_skeletons() {
        // X-X-X vs X-X is within distance 1/5 = 0.2 < 0.3 after collapse?
        // "X-X-X" vs "X-X": levenshtein 2, longer 5 -> 0.4; keep apart.
        // "X-X!" vs "X-X": levenshtein 1, longer 4 -> 0.25; merged.
        let values = strings(&["A-1!", "B-2!", "C-3!", "D-4"]);
        let clusters = cluster_strings(&values, &ProfileOptions::default());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members.len(), 4);
    }

    #[test]
    fn test_representative_median_length() {
        let values = strings(&["ab-cd", "a-b", "abcdef-ghi"]);
        let clusters = cluster_strings(&values, &ProfileOptions::default());
        assert_eq!(clusters.len(), 1);
        // Lengths 5, 3, 10; median 5.
        assert_eq!(clusters[0].representative, "ab-cd");
    }

    #[test]
    fn test_representative_tie_first_seen() {
        let values = strings(&["aa-b", "b-aa"]);
        let clusters = cluster_strings(&values, &ProfileOptions::default());
        assert_eq!(clusters[0].representative, "aa-b");
    }

    #[test]
    fn test_cluster_signatures_from_representative() {
        let values = strings(&["ACC-00123"]);
        let clusters = cluster_strings(&values, &ProfileOptions::default());
        assert_eq!(clusters[0].signature, "UUU-DDDDD");
        assert_eq!(clusters[0].compact_signature, "U-D");
    }
}
