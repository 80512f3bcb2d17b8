//! Text formats exchanged with the subject program.
//!
//! Both formats are line-oriented, one edge per line, in edge order. Node
//! labels are one-based.
//!
//! # Test case
//!
//! ```text
//! <from> -- <to>, <resistance>; [<emf>V]
//! ```
//!
//! The EMF clause is present only for edges that carry a source.
//!
//! # Answer / result
//!
//! ```text
//! <from> -- <to>: <current> A
//! ```
//!
//! # Numbers
//!
//! Lines are read by scanning for numeric tokens and ignoring everything
//! else:
//!
//! ```text
//! number   = [sign] (digits ['.' digits] | '.' digits) [exponent]
//! exponent = ('e' | 'E') [sign] digits
//! sign     = '+' | '-'      (only when not preceded by another sign)
//! ```
//!
//! A line with the wrong number of tokens is an error, never a partial
//! record. Whitespace-only lines are skipped.
//!
//! # Example
//!
//! ```text
//! 1 -- 2, 4.7; -12V
//! 2 -- 3, 10;
//! 3 -- 1, 22;
//! ```

mod answer;
mod case;
mod lexer;

pub use answer::{format_answer_line, parse_answer, parse_answer_line, write_answer};
pub use case::{format_case_line, parse_case, parse_case_line, write_case};
pub use lexer::{scan_numbers, Lexer, Token, TokenKind};

use crate::error::{OracleError, Result};

/// Read a test case file into a network.
#[cfg(feature = "cli")]
pub fn parse_case_file(path: &std::path::Path) -> Result<crate::network::Network> {
    parse_case(&read_file(path)?)
}

/// Read an answer or result file.
#[cfg(feature = "cli")]
pub fn parse_answer_file(path: &std::path::Path) -> Result<Vec<crate::compare::EdgeCurrent>> {
    parse_answer(&read_file(path)?)
}

/// Read a whole file, attaching the path to any error.
#[cfg(feature = "cli")]
pub fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| OracleError::FileRead {
        path: path.display().to_string(),
        source: e,
    })
}

/// Write a whole file, attaching the path to any error.
#[cfg(feature = "cli")]
pub fn write_file(path: &std::path::Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| OracleError::FileWrite {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse a token as a node label.
///
/// Labels are unsigned integers without fraction or exponent.
fn node_label(token: &Token, line: usize) -> Result<usize> {
    if token.kind != TokenKind::Integer || token.text.starts_with(['+', '-']) {
        return Err(OracleError::parse(
            line,
            format!(
                "node label at column {} must be an unsigned integer, got '{}'",
                token.column, token.text
            ),
        ));
    }
    token.text.parse::<usize>().map_err(|e| {
        OracleError::parse(
            line,
            format!("node label '{}' at column {}: {}", token.text, token.column, e),
        )
    })
}

/// Parse a token as a real value.
fn real_value(token: &Token, line: usize) -> Result<f64> {
    token.value().ok_or_else(|| {
        OracleError::parse(
            line,
            format!("invalid number '{}' at column {}", token.text, token.column),
        )
    })
}
