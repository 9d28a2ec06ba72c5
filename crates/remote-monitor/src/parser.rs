//! Log line classification.
//!
//! Mouse-sharing tools log hand-offs as free text, and the wording varies
//! between versions ("switching to laptop", "leaving screen ... to laptop",
//! "-> laptop"). Matching is keyword first, then name extraction.

use std::sync::OnceLock;
use std::time::Instant;

use cursorhome_model::{CursorTransition, TransitionKind, UNKNOWN_REMOTE};
use regex::Regex;

const LEAVING_KEYWORDS: &[&str] = &["leaving", "switch to", "switching to"];
const ENTERING_KEYWORDS: &[&str] = &["entering", "switch from", "switching from"];

const LEAVING_NAME_PATTERNS: &[&str] = &[
    r"(?i)switching to ([\w\-.]+)",
    r"(?i)switch to ([\w\-.]+)",
    r"(?i)leaving .*?to ([\w\-.]+)",
    r"-> ([\w\-.]+)",
];

const ENTERING_NAME_PATTERNS: &[&str] = &[
    r"(?i)switching from ([\w\-.]+)",
    r"(?i)switch from ([\w\-.]+)",
    r"(?i)entering .*?from ([\w\-.]+)",
    r"<- ([\w\-.]+)",
];

struct NamePatterns {
    leaving: Vec<Regex>,
    entering: Vec<Regex>,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(pattern, error = %e, "Invalid transition pattern");
                None
            }
        })
        .collect()
}

fn patterns() -> &'static NamePatterns {
    static PATTERNS: OnceLock<NamePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| NamePatterns {
        leaving: compile(LEAVING_NAME_PATTERNS),
        entering: compile(ENTERING_NAME_PATTERNS),
    })
}

fn extract_name(line: &str, candidates: &[Regex]) -> String {
    candidates
        .iter()
        .find_map(|re| re.captures(line).and_then(|c| c.get(1)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_REMOTE.to_string())
}

/// Classify a line, stamping the result with the current instant.
pub fn parse(line: &str) -> Option<CursorTransition> {
    parse_at(line, Instant::now())
}

/// Classify a line observed at `at`.
///
/// Leaving keywords are checked first, so a line mentioning both families
/// is a departure.
pub fn parse_at(line: &str, at: Instant) -> Option<CursorTransition> {
    let lower = line.to_lowercase();
    let patterns = patterns();

    let kind = if LEAVING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        TransitionKind::Left
    } else if ENTERING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        TransitionKind::Returned
    } else {
        return None;
    };

    let remote_name = match kind {
        TransitionKind::Left => extract_name(line, &patterns.leaving),
        TransitionKind::Returned => extract_name(line, &patterns.entering),
    };

    Some(CursorTransition {
        kind,
        remote_name,
        timestamp: at,
    })
}

/// Classify a batch of lines from one tailer read, preserving order.
pub fn parse_batch<S: AsRef<str>>(lines: &[S], at: Instant) -> Vec<CursorTransition> {
    lines
        .iter()
        .filter_map(|line| parse_at(line.as_ref(), at))
        .collect()
}
