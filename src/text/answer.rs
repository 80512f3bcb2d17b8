//! Answer and result lines: `<from> -- <to>: <current> A`.

use super::lexer::scan_numbers;
use super::{node_label, real_value};
use crate::compare::EdgeCurrent;
use crate::error::{OracleError, Result};

/// Parse one answer line (1-indexed `line` for error messages).
pub fn parse_answer_line(text: &str, line: usize) -> Result<EdgeCurrent> {
    let tokens = scan_numbers(text);
    if tokens.len() != 3 {
        return Err(OracleError::parse(
            line,
            format!(
                "expected '<from> -- <to>: <current> A' (3 numbers), found {} numbers",
                tokens.len()
            ),
        ));
    }

    Ok(EdgeCurrent::new(
        node_label(&tokens[0], line)?,
        node_label(&tokens[1], line)?,
        real_value(&tokens[2], line)?,
    ))
}

/// Parse a whole answer or result text. Whitespace-only lines are skipped.
pub fn parse_answer(input: &str) -> Result<Vec<EdgeCurrent>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(idx, text)| parse_answer_line(text, idx + 1))
        .collect()
}

/// Format one measurement as an answer line (without newline).
pub fn format_answer_line(measurement: &EdgeCurrent) -> String {
    measurement.to_string()
}

/// Format measurements as answer text, one line per edge.
pub fn write_answer(measurements: &[EdgeCurrent]) -> String {
    let mut out = String::new();
    for m in measurements {
        out.push_str(&format_answer_line(m));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let m = parse_answer_line("1 -- 2: -0.0125 A", 1).unwrap();
        assert_eq!(m, EdgeCurrent::new(1, 2, -0.0125));
    }

    #[test]
    fn test_parse_exponent_current() {
        let m = parse_answer_line("4 -- 1: 3.5e-05 A", 1).unwrap();
        assert_eq!(m.current, 3.5e-5);
    }

    #[test]
    fn test_zero_labels_are_kept_for_comparison() {
        let m = parse_answer_line("0 -- 1: 2 A", 1).unwrap();
        assert_eq!((m.from, m.to), (0, 1));
    }

    #[test]
    fn test_wrong_token_count() {
        assert!(matches!(
            parse_answer_line("1 -- 2: A", 4),
            Err(OracleError::Parse { line: 4, .. })
        ));
        assert!(parse_answer_line("1 -- 2: 3 A 4", 1).is_err());
    }

    #[test]
    fn test_parse_answer_text() {
        let text = "1 -- 2: 5 A\n2 -- 3: -1.25 A\n\n";
        let parsed = parse_answer(text).unwrap();
        assert_eq!(
            parsed,
            vec![EdgeCurrent::new(1, 2, 5.0), EdgeCurrent::new(2, 3, -1.25)]
        );
    }

    #[test]
    fn test_empty_output_is_empty_result() {
        assert!(parse_answer("").unwrap().is_empty());
    }

    #[test]
    fn test_write_then_parse() {
        let measurements = vec![
            EdgeCurrent::new(1, 2, 0.1 + 0.2),
            EdgeCurrent::new(2, 3, -1e-12),
        ];
        let text = write_answer(&measurements);
        assert!(text.starts_with("1 -- 2: 0.30000000000000004 A\n"));
        assert_eq!(parse_answer(&text).unwrap(), measurements);
    }
}
