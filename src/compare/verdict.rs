//! Outcome of a comparison.

use std::fmt;

use super::EdgeCurrent;

/// Result of comparing a subject's output with the reference answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Every entry matched
    Pass,
    /// The sequences have different lengths; no entries were compared
    LengthMismatch { result: usize, answer: usize },
    /// First entry that did not match
    ContentMismatch {
        index: usize,
        result: EdgeCurrent,
        answer: EdgeCurrent,
    },
}

impl Verdict {
    /// Whether the comparison passed.
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Human-readable description of the failure; empty on pass.
    pub fn diagnostic(&self) -> String {
        match self {
            Verdict::Pass => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "OK"),
            Verdict::LengthMismatch { result, answer } => write!(
                f,
                "length mismatch: result has {} edges, answer has {}",
                result, answer
            ),
            Verdict::ContentMismatch {
                index,
                result,
                answer,
            } => write!(
                f,
                "content mismatch at edge {} ({} -- {}): got \"{}\", expected \"{}\"",
                index + 1,
                answer.from,
                answer.to,
                result,
                answer
            ),
        }
    }
}
