//! Content reducer: bound a document to a character budget while keeping a
//! representative sample of it.
//!
//! Long documents are sampled by sentence position: the opening 40%, the
//! 40th to 60th percentile slice, and the closing 20% from the 80th percentile.
//! Lengths are measured in Unicode scalar values.

use std::sync::OnceLock;

use regex::Regex;

/// Appended when the sampled excerpt still exceeds the budget.
pub const TRUNCATION_MARKER: &str = "...";

/// Below this many sentences, positional sampling is meaningless.
const MIN_SENTENCES_FOR_SAMPLING: usize = 10;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn disallowed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s.,!?;:\-()]").expect("static regex"))
}

fn sentence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^.!?]+[.!?]*").expect("static regex"))
}

/// Collapse whitespace runs, trim, then drop characters outside word
/// characters, whitespace and `. , ! ? ; : - ( )`.
pub fn normalize(text: &str) -> String {
    let collapsed = whitespace_re().replace_all(text, " ");
    disallowed_re()
        .replace_all(collapsed.trim(), "")
        .into_owned()
}

/// Split normalized text into trimmed, non-empty sentences that keep their
/// terminators.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_re()
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Reduce `text` to at most `max_chars` characters (plus the truncation
/// marker). Deterministic.
pub fn reduce(text: &str, max_chars: usize) -> String {
    let normalized = normalize(text);
    let length = normalized.chars().count();
    if length <= max_chars {
        return normalized;
    }

    let sentences = split_sentences(&normalized);
    if sentences.len() <= MIN_SENTENCES_FOR_SAMPLING {
        return take_chars(&normalized, max_chars).to_string();
    }

    let n = sentences.len();
    let first_end = n * 40 / 100;
    let middle_end = n * 60 / 100;
    let last_start = n * 80 / 100;

    let sampled = [
        &sentences[..first_end],
        &sentences[first_end..middle_end],
        &sentences[last_start..],
    ]
    .iter()
    .map(|zone| zone.join(" "))
    .filter(|zone| !zone.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    tracing::debug!(
        input_chars = length,
        sentences = n,
        sampled_chars = sampled.chars().count(),
        max_chars,
        "Document reduced by positional sampling"
    );

    if sampled.chars().count() > max_chars {
        format!("{}{TRUNCATION_MARKER}", take_chars(&sampled, max_chars))
    } else {
        sampled
    }
}

/// Prefix of at most `n` characters, cut on a char boundary.
fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
