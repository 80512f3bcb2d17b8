//! Positional comparison of edge-current measurements.
//!
//! A subject's output and the oracle's answer are both reduced to ordered
//! sequences of [`EdgeCurrent`]s. They are compared position by position:
//! node labels must match exactly and currents must agree within
//! [`Tolerances`]. The first disagreement ends the comparison.

mod tolerance;
mod verdict;

pub use tolerance::{is_close, Tolerances, DEFAULT_ABSOLUTE_TOLERANCE, DEFAULT_RELATIVE_TOLERANCE};
pub use verdict::Verdict;

use std::fmt;

use log::debug;

/// One measured branch current, as written in an answer file.
///
/// Node fields hold the labels exactly as they appear in text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCurrent {
    /// Label of the tail node
    pub from: usize,
    /// Label of the head node
    pub to: usize,
    /// Current in amperes, positive from `from` to `to`
    pub current: f64,
}

impl EdgeCurrent {
    /// Create a new measurement.
    pub fn new(from: usize, to: usize, current: f64) -> Self {
        Self { from, to, current }
    }

    /// Whether two measurements describe the same edge with close currents.
    pub fn matches(&self, other: &EdgeCurrent, tolerances: &Tolerances) -> bool {
        self.from == other.from
            && self.to == other.to
            && is_close(self.current, other.current, tolerances.relative, tolerances.absolute)
    }
}

impl fmt::Display for EdgeCurrent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}: {} A", self.from, self.to, self.current)
    }
}

/// Compare a subject's result against the reference answer.
///
/// Lengths are checked first; on a length mismatch no entries are compared.
/// Otherwise entries are compared in order and the first mismatch is
/// returned.
pub fn compare(result: &[EdgeCurrent], answer: &[EdgeCurrent], tolerances: &Tolerances) -> Verdict {
    if result.len() != answer.len() {
        return Verdict::LengthMismatch {
            result: result.len(),
            answer: answer.len(),
        };
    }

    for (index, (r, a)) in result.iter().zip(answer).enumerate() {
        if !r.matches(a, tolerances) {
            debug!("mismatch at edge {}: got {}, expected {}", index, r, a);
            return Verdict::ContentMismatch {
                index,
                result: *r,
                answer: *a,
            };
        }
    }

    Verdict::Pass
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_within_tolerance() {
        let result = [EdgeCurrent::new(1, 2, 5.0)];
        let answer = [EdgeCurrent::new(1, 2, 5.0000001)];
        let verdict = compare(&result, &answer, &Tolerances::default());
        assert!(verdict.passed());
        assert!(verdict.diagnostic().is_empty());
    }

    #[test]
    fn test_content_mismatch() {
        let result = [EdgeCurrent::new(1, 2, 5.0)];
        let answer = [EdgeCurrent::new(1, 2, 5.1)];
        let verdict = compare(&result, &answer, &Tolerances::default());
        assert!(!verdict.passed());
        match verdict {
            Verdict::ContentMismatch { index, result, answer } => {
                assert_eq!(index, 0);
                assert_eq!((result.from, result.to), (1, 2));
                assert_eq!(answer.current, 5.1);
            }
            other => panic!("expected content mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_length_mismatch_reports_counts() {
        let result = [EdgeCurrent::new(1, 2, 5.0), EdgeCurrent::new(2, 3, 1.0)];
        let answer = [EdgeCurrent::new(1, 2, 5.0)];
        let verdict = compare(&result, &answer, &Tolerances::default());
        assert_eq!(verdict, Verdict::LengthMismatch { result: 2, answer: 1 });
        assert!(verdict.diagnostic().contains("2"));
        assert!(verdict.diagnostic().contains("1"));
    }

    #[test]
    fn test_node_labels_must_match() {
        let result = [EdgeCurrent::new(2, 1, 5.0)];
        let answer = [EdgeCurrent::new(1, 2, 5.0)];
        assert!(!compare(&result, &answer, &Tolerances::default()).passed());
    }

    #[test]
    fn test_reordered_output_fails() {
        let result = [EdgeCurrent::new(2, 3, 1.0), EdgeCurrent::new(1, 2, 5.0)];
        let answer = [EdgeCurrent::new(1, 2, 5.0), EdgeCurrent::new(2, 3, 1.0)];
        let verdict = compare(&result, &answer, &Tolerances::default());
        assert!(matches!(verdict, Verdict::ContentMismatch { index: 0, .. }));
    }

    #[test]
    fn test_first_mismatch_short_circuits() {
        let result = [
            EdgeCurrent::new(1, 2, 1.0),
            EdgeCurrent::new(2, 3, 9.0),
            EdgeCurrent::new(3, 4, 9.0),
        ];
        let answer = [
            EdgeCurrent::new(1, 2, 1.0),
            EdgeCurrent::new(2, 3, 2.0),
            EdgeCurrent::new(3, 4, 3.0),
        ];
        let verdict = compare(&result, &answer, &Tolerances::default());
        assert!(matches!(verdict, Verdict::ContentMismatch { index: 1, .. }));
    }

    #[test]
    fn test_empty_sequences_pass() {
        assert!(compare(&[], &[], &Tolerances::default()).passed());
    }

    #[test]
    fn test_display_matches_answer_format() {
        assert_eq!(EdgeCurrent::new(1, 3, -0.25).to_string(), "1 -- 3: -0.25 A");
    }
}
