//! Algebraic representation of discovered patterns
//!
//! Patterns are built by the synthesizer, lowered to a regex string for
//! matching, and scored by the cost model. The representation keeps an
//! explicit canonical form: `Enum` values are sorted and deduplicated at
//! construction, `Seq` only exists at arity two or more, and quantifier
//! upper bounds use a distinguished [`Bound::Inf`] sentinel.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Character class of a [`Pattern::CharClass`] element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassKind {
    /// `\d`
    Digit,
    /// `[A-Z]`
    Upper,
    /// `[a-z]`
    Lower,
    /// `[a-zA-Z]`
    Alpha,
    /// `[a-zA-Z0-9]`
    Alnum,
    /// `\w`
    Word,
    /// `.`
    Any,
}

/// Upper bound of a quantifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bound {
    /// A finite bound
    Finite(u32),
    /// Unbounded
    Inf,
}

impl Bound {
    /// Saturating addition; `Inf` absorbs any addend.
    pub fn add(self, other: Bound) -> Bound {
        match (self, other) {
            (Bound::Finite(a), Bound::Finite(b)) => Bound::Finite(a.saturating_add(b)),
            _ => Bound::Inf,
        }
    }
}

/// A regex-like pattern over text values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pattern {
    /// An exact string
    Literal(String),
    /// A character-class run with length bounds
    CharClass {
        kind: ClassKind,
        min: u32,
        max: Bound,
    },
    /// An ordered, duplicate-free set of literal alternatives
    Enum(Vec<String>),
    /// Concatenation; arity is always at least two
    Seq(Vec<Pattern>),
    /// Zero-or-one occurrence of the inner pattern
    Optional(Box<Pattern>),
    /// A wildcard run with length bounds
    Any { min: u32, max: Bound },
}

impl Pattern {
    /// Construct a canonical `Enum`: values sorted ascending, deduplicated.
    pub fn enumeration<I, S>(values: I) -> Pattern
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        values.sort();
        values.dedup();
        Pattern::Enum(values)
    }

    /// Construct a character class with normalized bounds (`max >= min`).
    pub fn class(kind: ClassKind, min: u32, max: Bound) -> Pattern {
        let max = match max {
            Bound::Finite(m) => Bound::Finite(m.max(min)),
            Bound::Inf => Bound::Inf,
        };
        Pattern::CharClass { kind, min, max }
    }

    /// Construct a wildcard run with normalized bounds.
    pub fn any(min: u32, max: Bound) -> Pattern {
        let max = match max {
            Bound::Finite(m) => Bound::Finite(m.max(min)),
            Bound::Inf => Bound::Inf,
        };
        Pattern::Any { min, max }
    }

    /// Construct a sequence. A single child yields that child; an empty
    /// child list yields the empty literal.
    pub fn seq(mut children: Vec<Pattern>) -> Pattern {
        match children.len() {
            0 => Pattern::Literal(String::new()),
            1 => children.remove(0),
            _ => Pattern::Seq(children),
        }
    }

    /// Construct an optional pattern.
    pub fn optional(inner: Pattern) -> Pattern {
        Pattern::Optional(Box::new(inner))
    }

    /// Lower the pattern to an unanchored regex string.
    pub fn to_regex(&self) -> String {
        match self {
            Pattern::Literal(value) => escape_regex(value),
            Pattern::CharClass { kind, min, max } => {
                format!("{}{}", class_text(*kind), quantifier(*min, *max))
            }
            Pattern::Enum(values) => match values.len() {
                0 => String::new(),
                1 => escape_regex(&values[0]),
                _ => {
                    let alternatives: Vec<String> =
                        values.iter().map(|v| escape_regex(v)).collect();
                    format!("({})", alternatives.join("|"))
                }
            },
            Pattern::Seq(children) => children.iter().map(|c| c.to_regex()).collect(),
            Pattern::Optional(inner) => {
                let lowered = inner.to_regex();
                match inner.as_ref() {
                    // A sequence needs a group to bind the quantifier; a
                    // multi-value enum is already grouped by its lowering.
                    Pattern::Seq(_) => format!("({})?", lowered),
                    _ => format!("{}?", lowered),
                }
            }
            Pattern::Any { min, max } => format!(".{}", quantifier(*min, *max)),
        }
    }

    /// Compile the anchored form of this pattern.
    ///
    /// Anchoring (`^...$`) is applied here, by the matcher, not embedded
    /// in [`to_regex`](Pattern::to_regex) output.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        Regex::new(&format!("^{}$", self.to_regex()))
    }

    /// Whether the pattern matches the full value.
    ///
    /// A regex compilation failure is logged and reported as a non-match;
    /// it never propagates to the caller.
    pub fn matches(&self, value: &str) -> bool {
        match self.compile() {
            Ok(regex) => regex.is_match(value),
            Err(err) => {
                tracing::warn!("failed to compile pattern regex: {}", err);
                false
            }
        }
    }

    /// Heuristic cost of the pattern. Non-negative, additive across
    /// sequences; lower is better.
    pub fn cost(&self) -> f64 {
        match self {
            Pattern::Literal(value) => {
                let len = value.chars().count() as f64;
                (1.0 + 0.1 * len).min(5.0)
            }
            Pattern::CharClass { kind, min, max } => {
                let base = match kind {
                    ClassKind::Digit => 1.0,
                    ClassKind::Upper | ClassKind::Lower => 1.5,
                    ClassKind::Alpha => 2.0,
                    ClassKind::Alnum => 2.5,
                    ClassKind::Word => 3.0,
                    ClassKind::Any => 5.0,
                };
                base + range_cost(*min, *max)
            }
            Pattern::Enum(values) => enum_cost(values.len()),
            Pattern::Seq(children) => children.iter().map(|c| c.cost()).sum(),
            Pattern::Optional(inner) => inner.cost() + 0.5,
            Pattern::Any { .. } => 10.0,
        }
    }

    /// Specificity in `[0, 1]`: how tightly the pattern constrains its
    /// accepted language. Literals are fully specific; wildcards barely.
    pub fn specificity(&self) -> f64 {
        match self {
            Pattern::Literal(_) => 1.0,
            Pattern::CharClass { kind, min, max } => {
                if *max == Bound::Finite(*min) {
                    match kind {
                        ClassKind::Digit => 0.9,
                        ClassKind::Upper | ClassKind::Lower => 0.85,
                        ClassKind::Alpha => 0.7,
                        ClassKind::Alnum => 0.6,
                        _ => 0.5,
                    }
                } else {
                    0.5
                }
            }
            Pattern::Enum(values) => match values.len() {
                0 | 1 => 1.0,
                n if n <= 5 => 0.9,
                n if n <= 10 => 0.7,
                n if n <= 20 => 0.5,
                _ => 0.3,
            },
            Pattern::Seq(children) => {
                let sum: f64 = children.iter().map(|c| c.specificity()).sum();
                sum / children.len() as f64
            }
            Pattern::Optional(inner) => 0.8 * inner.specificity(),
            Pattern::Any { .. } => 0.1,
        }
    }

    /// Number of top-level sequence elements (1 for non-sequences).
    pub fn seq_length(&self) -> usize {
        match self {
            Pattern::Seq(children) => children.len(),
            _ => 1,
        }
    }

    /// Largest `Enum` alternative count anywhere in the pattern.
    pub fn max_enum_size(&self) -> usize {
        match self {
            Pattern::Enum(values) => values.len(),
            Pattern::Seq(children) => children
                .iter()
                .map(|c| c.max_enum_size())
                .max()
                .unwrap_or(0),
            Pattern::Optional(inner) => inner.max_enum_size(),
            _ => 0,
        }
    }

    /// Minimal human-readable rendering of the pattern.
    pub fn describe(&self) -> String {
        match self {
            Pattern::Literal(value) if value.is_empty() => "empty".to_string(),
            Pattern::Literal(value) => format!("\"{}\"", value),
            Pattern::CharClass { kind, min, max } => {
                let noun = match kind {
                    ClassKind::Digit => "digits",
                    ClassKind::Upper => "uppercase letters",
                    ClassKind::Lower => "lowercase letters",
                    ClassKind::Alpha => "letters",
                    ClassKind::Alnum => "letters or digits",
                    ClassKind::Word => "word characters",
                    ClassKind::Any => "characters",
                };
                format!("{} {}", describe_range(*min, *max), noun)
            }
            Pattern::Enum(values) => format!("one of [{}]", values.join(", ")),
            Pattern::Seq(children) => children
                .iter()
                .map(|c| c.describe())
                .collect::<Vec<_>>()
                .join(" + "),
            Pattern::Optional(inner) => format!("optionally {}", inner.describe()),
            Pattern::Any { min, max } => {
                format!("{} arbitrary characters", describe_range(*min, *max))
            }
        }
    }
}

fn describe_range(min: u32, max: Bound) -> String {
    match max {
        Bound::Finite(m) if m == min => format!("{}", min),
        Bound::Finite(m) => format!("{}-{}", min, m),
        Bound::Inf => format!("{}+", min),
    }
}

fn enum_cost(n: usize) -> f64 {
    let count = n as f64;
    match n {
        0 | 1 => 1.0,
        2..=5 => 1.0 + 0.2 * count,
        6..=10 => 2.0 + 0.3 * count,
        11..=20 => 4.0 + 0.4 * count,
        _ => 10.0 + 0.5 * count,
    }
}

fn range_cost(min: u32, max: Bound) -> f64 {
    match max {
        Bound::Finite(m) if m == min => 0.0,
        Bound::Finite(m) => 0.5 + 0.1 * f64::from(m - min),
        Bound::Inf => 1.0,
    }
}

fn class_text(kind: ClassKind) -> &'static str {
    match kind {
        ClassKind::Digit => r"\d",
        ClassKind::Upper => "[A-Z]",
        ClassKind::Lower => "[a-z]",
        ClassKind::Alpha => "[a-zA-Z]",
        ClassKind::Alnum => "[a-zA-Z0-9]",
        ClassKind::Word => r"\w",
        ClassKind::Any => ".",
    }
}

fn quantifier(min: u32, max: Bound) -> String {
    match (min, max) {
        (1, Bound::Finite(1)) => String::new(),
        (0, Bound::Finite(1)) => "?".to_string(),
        (0, Bound::Inf) => "*".to_string(),
        (1, Bound::Inf) => "+".to_string(),
        (n, Bound::Finite(m)) if n == m => format!("{{{}}}", n),
        (n, Bound::Inf) => format!("{{{},}}", n),
        (n, Bound::Finite(m)) => format!("{{{},{}}}", n, m),
    }
}

/// Characters escaped by [`escape_regex`]. The PCRE metacharacter set
/// plus `- & ~ #`, matching the emitter this engine is compatible with.
const ESCAPED: &str = r"\^$.|?*+()[]{}-&~#";

/// Escape a literal string for embedding in a regex.
///
/// Implemented locally rather than via the host regex crate so that the
/// emitted strings are stable across regex engines. Tab, newline and
/// carriage return are lowered to `\t`, `\n` and `\r`.
pub fn escape_regex(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\t' => out.push_str(r"\t"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            c if ESCAPED.contains(c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
