//! Per-cluster pattern synthesis
//!
//! Members of a cluster are tokenized and aligned column-wise; each
//! column bag is synthesized into the best pattern element for the
//! tokens it holds, and the assembled sequence is optimized in a single
//! bottom-up pass. Candidate selection runs the synthesis at several
//! enum thresholds and keeps the cheapest candidate that still covers
//! the cluster.

use std::collections::BTreeSet;

use crate::config::DEFAULT_ENUM_THRESHOLD;
use crate::pattern::{Bound, ClassKind, Pattern};
use crate::token::{tokenize, Token, TokenKind};

/// Enum thresholds tried by [`synthesize_best`].
pub const CANDIDATE_ENUM_THRESHOLDS: [usize; 4] = [5, 10, 20, 50];

/// Minimum fraction of cluster members a candidate must match to stay
/// in the tournament.
pub const CANDIDATE_COVERAGE_FLOOR: f64 = 0.95;

/// Synthesize a pattern for a set of values with a fixed enum threshold.
///
/// This is the single-run surface behind [`infer_pattern`]; profile
/// assembly goes through [`synthesize_best`] instead.
pub fn synthesize(members: &[String], enum_threshold: usize) -> Pattern {
    let streams: Vec<Vec<Token>> = members.iter().map(|m| tokenize(m)).collect();
    let width = streams.iter().map(|s| s.len()).max().unwrap_or(0);
    if width == 0 {
        return Pattern::Literal(String::new());
    }

    let mut columns = Vec::with_capacity(width);
    for c in 0..width {
        let bag: Vec<&Token> = streams.iter().filter_map(|s| s.get(c)).collect();
        columns.push(synthesize_column(&bag, enum_threshold));
    }

    optimize(Pattern::seq(columns))
}

/// Synthesize with the tournament: run [`synthesize`] at each candidate
/// enum threshold, discard candidates matching fewer than
/// [`CANDIDATE_COVERAGE_FLOOR`] of the members, and keep the cheapest
/// survivor. Falls back to the first candidate when none clears the
/// floor.
pub fn synthesize_best(members: &[String]) -> Pattern {
    let mut candidates: Vec<Pattern> = CANDIDATE_ENUM_THRESHOLDS
        .iter()
        .map(|&t| synthesize(members, t))
        .collect();

    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let coverage = member_coverage(candidate, members);
        if coverage < CANDIDATE_COVERAGE_FLOOR {
            continue;
        }
        let cost = candidate.cost();
        match best {
            Some((_, best_cost)) if cost >= best_cost => {}
            _ => best = Some((i, cost)),
        }
    }

    let chosen = match best {
        Some((i, _)) => i,
        None => {
            tracing::debug!(
                "no synthesis candidate reached coverage {}; falling back to the first",
                CANDIDATE_COVERAGE_FLOOR
            );
            0
        }
    };
    candidates.swap_remove(chosen)
}

/// Infer a raw pattern for a set of values with a single synthesizer
/// run (no candidate tournament).
pub fn infer_pattern(values: &[String], enum_threshold: Option<usize>) -> Pattern {
    synthesize(values, enum_threshold.unwrap_or(DEFAULT_ENUM_THRESHOLD))
}

/// Infer a regex string for a set of values.
///
/// # Examples
///
/// ```
/// use pattern_profiler::synthesis::infer_regex;
///
/// let values: Vec<String> = ["A-1", "B-2", "C-3"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(infer_regex(&values, None), r"(A|B|C)\-(1|2|3)");
/// ```
pub fn infer_regex(values: &[String], enum_threshold: Option<usize>) -> String {
    infer_pattern(values, enum_threshold).to_regex()
}

fn member_coverage(pattern: &Pattern, members: &[String]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    match pattern.compile() {
        Ok(regex) => {
            let matched = members.iter().filter(|m| regex.is_match(m)).count();
            matched as f64 / members.len() as f64
        }
        Err(err) => {
            tracing::warn!("failed to compile candidate regex: {}", err);
            0.0
        }
    }
}

/// Enumerate when the distinct count is tiny, refuse when it exceeds
/// the threshold, and otherwise require high repetition.
fn should_enumerate(distinct: usize, total: usize, threshold: usize) -> bool {
    if distinct <= 5 {
        return true;
    }
    if distinct > threshold {
        return false;
    }
    distinct as f64 <= 0.3 * total as f64
}

fn distinct_values(bag: &[&Token]) -> Vec<String> {
    let set: BTreeSet<&str> = bag.iter().map(|t| t.value.as_str()).collect();
    set.into_iter().map(|v| v.to_string()).collect()
}

fn length_bounds(bag: &[&Token]) -> (u32, Bound) {
    let min = bag.iter().map(|t| t.length).min().unwrap_or(0) as u32;
    let max = bag.iter().map(|t| t.length).max().unwrap_or(0) as u32;
    (min, Bound::Finite(max))
}

fn class_for(kind: TokenKind) -> ClassKind {
    match kind {
        TokenKind::Digits => ClassKind::Digit,
        TokenKind::Upper => ClassKind::Upper,
        TokenKind::Lower => ClassKind::Lower,
        TokenKind::Alpha => ClassKind::Alpha,
        TokenKind::Alnum => ClassKind::Alnum,
        _ => ClassKind::Any,
    }
}

fn synthesize_column(bag: &[&Token], enum_threshold: usize) -> Pattern {
    let kinds: BTreeSet<TokenKind> = bag.iter().map(|t| t.kind).collect();
    let mut values = distinct_values(bag);
    let (min_len, max_len) = length_bounds(bag);

    if kinds.len() == 1 {
        // The bag is never empty: a column exists only because at least
        // one member has a token at its index.
        let kind = bag[0].kind;
        return match kind {
            TokenKind::Delimiter => {
                if values.len() == 1 {
                    Pattern::Literal(values.remove(0))
                } else {
                    Pattern::enumeration(values)
                }
            }
            TokenKind::Whitespace => {
                if min_len == u32_from(max_len) {
                    Pattern::Literal(" ".repeat(min_len as usize))
                } else {
                    Pattern::any(min_len, max_len)
                }
            }
            TokenKind::Literal => {
                if values.len() <= enum_threshold {
                    Pattern::enumeration(values)
                } else {
                    Pattern::any(min_len, max_len)
                }
            }
            kind => {
                if should_enumerate(values.len(), bag.len(), enum_threshold) {
                    Pattern::enumeration(values)
                } else {
                    Pattern::class(class_for(kind), min_len, max_len)
                }
            }
        };
    }

    // Mixed upper/lower columns widen into a single alphabetic bag.
    let only_letters = kinds.iter().all(|k| {
        matches!(k, TokenKind::Upper | TokenKind::Lower | TokenKind::Alpha)
    });
    if only_letters {
        return if should_enumerate(values.len(), bag.len(), enum_threshold) {
            Pattern::enumeration(values)
        } else {
            Pattern::class(ClassKind::Alpha, min_len, max_len)
        };
    }

    if values.len() <= enum_threshold {
        Pattern::enumeration(values)
    } else {
        Pattern::class(ClassKind::Alnum, min_len, max_len)
    }
}

fn u32_from(bound: Bound) -> u32 {
    match bound {
        Bound::Finite(m) => m,
        Bound::Inf => u32::MAX,
    }
}

/// Single bottom-up optimization pass: merge adjacent literals, merge
/// adjacent same-kind character classes by summing their bounds, and
/// unwrap a sequence that collapsed to one element.
pub fn optimize(pattern: Pattern) -> Pattern {
    let Pattern::Seq(children) = pattern else {
        return pattern;
    };

    let mut merged: Vec<Pattern> = Vec::with_capacity(children.len());
    for child in children.into_iter().map(optimize) {
        if let Some(last) = merged.last_mut() {
            if let Some(combined) = merge_adjacent(last, &child) {
                *last = combined;
                continue;
            }
        }
        merged.push(child);
    }

    Pattern::seq(merged)
}

fn merge_adjacent(left: &Pattern, right: &Pattern) -> Option<Pattern> {
    match (left, right) {
        (Pattern::Literal(a), Pattern::Literal(b)) => {
            Some(Pattern::Literal(format!("{}{}", a, b)))
        }
        (
            Pattern::CharClass { kind: k1, min: min1, max: max1 },
            Pattern::CharClass { kind: k2, min: min2, max: max2 },
        ) if k1 == k2 => Some(Pattern::CharClass {
            kind: *k1,
            min: min1 + min2,
            max: max1.add(*max2),
        }),
        _ => None,
    }
}
