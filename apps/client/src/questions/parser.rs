//! Question-block parser.
//!
//! The upstream generator returns questions as one unstructured text blob, frequently
//! with quoting noise and trailing commas left over from whatever the model was asked
//! to emit. This module extracts the repeating `Q<n>: ... T<n>: ...` blocks from that
//! blob. It is pure (no I/O, no state) and it never fails: malformed input degrades to
//! fewer entries or an empty list, and the caller decides what an empty list means.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::InterviewQuestion;

/// One block: `Q<digits> : <question>` optionally followed by a comma, then
/// `T<digits> : <time token>`. The question span is ungreedy so it stops at the first
/// `T<n>:` marker; the time token is restricted to digits plus m/h/s ("4m30s"). The
/// digits in `Q<n>` and `T<n>` are not matched against each other and their numeric
/// order carries no meaning; output order is source order.
static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Q\d+\s*:\s*(.*?)(?:\s*,\s*)?\s*T\d+\s*:\s*([0-9mhs]+)")
        .expect("block regex is valid")
});

static TRAILING_COMMA_BRACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*\}").expect("trailing-comma regex is valid"));
static TRAILING_COMMA_BRACKET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*\]").expect("trailing-comma regex is valid"));

/// Best-effort cleanup of quoting/punctuation noise the generator commonly introduces:
/// single quotes become double quotes and trailing commas before `}` or `]` are
/// stripped. This is textual cleanup, not JSON repair; no structural parsing happens
/// here or anywhere else in the parser. Idempotent on already-clean input.
fn normalize(raw: &str) -> String {
    let cleaned = raw.replace('\'', "\"");
    let cleaned = TRAILING_COMMA_BRACE_RE.replace_all(&cleaned, "}");
    let cleaned = TRAILING_COMMA_BRACKET_RE.replace_all(&cleaned, "]");
    cleaned.trim().to_string()
}

/// Extracts `(question, time)` pairs from the generator's raw output, in source order.
///
/// Empty or whitespace-only input, and input with no matching blocks, both give an
/// empty vec; surfacing that as "no questions were generated" is the caller's job.
/// A block whose question span trims to nothing keeps its slot with the literal
/// `"N/A"` sentinel so one mangled block never aborts the parse. A `Q<n>` with no
/// following `T<n>` matches nothing and is dropped.
pub fn parse_question_blocks(raw: &str) -> Vec<InterviewQuestion> {
    if raw.trim().is_empty() {
        warn!("question text is empty or whitespace-only");
        return Vec::new();
    }

    let cleaned = normalize(raw);
    debug!(len = cleaned.len(), "normalized question text");

    let questions: Vec<InterviewQuestion> = BLOCK_RE
        .captures_iter(&cleaned)
        .map(|caps| {
            let question = sentinel_or(caps.get(1).map_or("", |m| m.as_str()));
            let time = sentinel_or(caps.get(2).map_or("", |m| m.as_str()));
            InterviewQuestion::new(question, time)
        })
        .collect();

    debug!(count = questions.len(), "parsed question blocks");
    questions
}

/// Trimmed text, or the `"N/A"` sentinel when nothing is left after trimming.
fn sentinel_or(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        warn!("empty field in question block, substituting sentinel");
        "N/A".to_string()
    } else {
        trimmed.to_string()
    }
}
