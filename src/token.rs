//! Tokenization of text values into typed character runs
//!
//! A value is split into maximal runs of a single lexical class; the
//! token stream tiles the source exactly. Signatures derived from the
//! stream drive structural clustering.

use serde::{Deserialize, Serialize};

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    /// ASCII digits `0-9`
    Digits,
    /// ASCII uppercase letters `A-Z`
    Upper,
    /// ASCII lowercase letters `a-z`
    Lower,
    /// Merged letter run; produced only when merging is requested
    Alpha,
    /// Merged letter/digit run; produced only when merging is requested
    Alnum,
    /// Space, tab, newline or carriage return
    Whitespace,
    /// A single punctuation character from the fixed delimiter set
    Delimiter,
    /// Anything else, including all non-ASCII characters
    Literal,
}

/// A run of characters of a single lexical class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Lexical class of the run
    pub kind: TokenKind,
    /// The exact substring
    pub value: String,
    /// Number of code points in `value`
    pub length: usize,
    /// Starting code-point offset in the source string
    pub position: usize,
}

/// The fixed ASCII delimiter set. Delimiter tokens never extend; each
/// delimiter character produces its own token.
pub const DELIMITERS: &str = "-_./\\@#$%^&*()+=[]{}|;:'\",<>?!`~";

fn classify(c: char) -> TokenKind {
    match c {
        '0'..='9' => TokenKind::Digits,
        'A'..='Z' => TokenKind::Upper,
        'a'..='z' => TokenKind::Lower,
        ' ' | '\t' | '\n' | '\r' => TokenKind::Whitespace,
        c if DELIMITERS.contains(c) => TokenKind::Delimiter,
        _ => TokenKind::Literal,
    }
}

/// Split a value into a sequence of typed tokens.
///
/// Walks the string code point by code point, extending the current run
/// while the class matches. Tokenization is total: the empty string
/// yields the empty token sequence, and concatenating the token values
/// in order reproduces the input.
///
/// # Examples
///
/// ```
/// use pattern_profiler::token::{tokenize, TokenKind};
///
/// let tokens = tokenize("ACC-00123");
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[0].kind, TokenKind::Upper);
/// assert_eq!(tokens[1].kind, TokenKind::Delimiter);
/// assert_eq!(tokens[2].value, "00123");
/// ```
pub fn tokenize(s: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current: Option<Token> = None;

    for (position, c) in s.chars().enumerate() {
        let kind = classify(c);

        // Delimiters never extend; everything else extends a same-class run.
        let extends =
            matches!(&current, Some(token) if token.kind == kind && kind != TokenKind::Delimiter);

        if extends {
            if let Some(token) = current.as_mut() {
                token.value.push(c);
                token.length += 1;
            }
        } else {
            if let Some(token) = current.take() {
                tokens.push(token);
            }
            current = Some(Token {
                kind,
                value: c.to_string(),
                length: 1,
                position,
            });
        }
    }

    if let Some(token) = current {
        tokens.push(token);
    }

    tokens
}

/// Tokenize with adjacent letter runs collapsed.
///
/// After base tokenization, any adjacent `Upper`/`Lower`/`Alpha` tokens
/// are merged into a single `Alpha` token whose value is their
/// concatenation.
pub fn tokenize_merged(s: &str) -> Vec<Token> {
    fn is_letter(kind: TokenKind) -> bool {
        matches!(kind, TokenKind::Upper | TokenKind::Lower | TokenKind::Alpha)
    }

    let mut merged: Vec<Token> = Vec::new();

    for token in tokenize(s) {
        let extends_letters = is_letter(token.kind)
            && matches!(merged.last(), Some(last) if is_letter(last.kind));

        if extends_letters {
            if let Some(last) = merged.last_mut() {
                last.kind = TokenKind::Alpha;
                last.value.push_str(&token.value);
                last.length += token.length;
            }
        } else {
            merged.push(token);
        }
    }

    merged
}

// Delimiter and Literal tokens contribute their raw value instead of a
// class letter; callers branch on the kind before reaching here.
fn class_letter(kind: TokenKind) -> char {
    match kind {
        TokenKind::Digits => 'D',
        TokenKind::Upper => 'U',
        TokenKind::Lower => 'L',
        TokenKind::Alpha => 'A',
        TokenKind::Alnum => 'X',
        _ => '_',
    }
}

/// Full structural signature of a value.
///
/// Each character-class token contributes `length` copies of its class
/// letter (`D`/`U`/`L`/`A`/`X`/`_`); delimiter and literal tokens
/// contribute their raw value.
///
/// # Examples
///
/// ```
/// use pattern_profiler::token::signature;
///
/// assert_eq!(signature("ACC-00123"), "UUU-DDDDD");
/// ```
pub fn signature(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for token in tokenize(s) {
        match token.kind {
            TokenKind::Delimiter | TokenKind::Literal => out.push_str(&token.value),
            kind => {
                let letter = class_letter(kind);
                for _ in 0..token.length {
                    out.push(letter);
                }
            }
        }
    }
    out
}

/// Compact structural signature: one class letter per token.
///
/// # Examples
///
/// ```
/// use pattern_profiler::token::compact_signature;
///
/// assert_eq!(compact_signature("ACC-00123"), "U-D");
/// ```
pub fn compact_signature(s: &str) -> String {
    let mut out = String::new();
    for token in tokenize(s) {
        match token.kind {
            TokenKind::Delimiter | TokenKind::Literal => out.push_str(&token.value),
            kind => out.push(class_letter(kind)),
        }
    }
    out
}
