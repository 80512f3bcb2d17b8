//! Test-case lines: `<from> -- <to>, <resistance>; [<emf>V]`.

use std::fmt::Write;

use super::lexer::scan_numbers;
use super::{node_label, real_value};
use crate::error::{OracleError, Result};
use crate::network::{Edge, Network, NodeId};

/// Parse one test-case line (1-indexed `line` for error messages).
pub fn parse_case_line(text: &str, line: usize) -> Result<Edge> {
    let tokens = scan_numbers(text);
    if !(3..=4).contains(&tokens.len()) {
        return Err(OracleError::parse(
            line,
            format!(
                "expected '<from> -- <to>, <resistance>; [<emf>V]' (3 or 4 numbers), found {} numbers",
                tokens.len()
            ),
        ));
    }

    let from = node_id(&tokens[0], line)?;
    let to = node_id(&tokens[1], line)?;
    let resistance = real_value(&tokens[2], line)?;
    let emf = match tokens.get(3) {
        Some(token) => real_value(token, line)?,
        None => 0.0,
    };

    Ok(Edge::new(from, to, resistance, emf))
}

fn node_id(token: &super::Token, line: usize) -> Result<NodeId> {
    let label = node_label(token, line)?;
    NodeId::from_label(label).ok_or_else(|| {
        OracleError::parse(
            line,
            format!("node labels start at 1, got 0 at column {}", token.column),
        )
    })
}

/// Parse a whole test case into a network.
///
/// Whitespace-only lines are skipped. The node count is one past the
/// largest node referenced.
pub fn parse_case(input: &str) -> Result<Network> {
    let edges = input
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(idx, text)| parse_case_line(text, idx + 1))
        .collect::<Result<Vec<_>>>()?;
    Network::new(edges)
}

/// Format one edge as a test-case line (without newline).
pub fn format_case_line(edge: &Edge) -> String {
    let mut line = format!("{} -- {}, {};", edge.from, edge.to, edge.resistance);
    if edge.has_emf() {
        // Writing to a String cannot fail
        let _ = write!(line, " {}V", edge.emf);
    }
    line
}

/// Format a whole network as a test case, one line per edge.
pub fn write_case(network: &Network) -> String {
    let mut out = String::new();
    for edge in network.edges() {
        out.push_str(&format_case_line(edge));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_with_emf() {
        let edge = parse_case_line("1 -- 2, 4.7; -12V", 1).unwrap();
        assert_eq!(edge.from, NodeId(0));
        assert_eq!(edge.to, NodeId(1));
        assert_eq!(edge.resistance, 4.7);
        assert_eq!(edge.emf, -12.0);
    }

    #[test]
    fn test_parse_line_without_emf() {
        let edge = parse_case_line("3 -- 1, 22; ", 1).unwrap();
        assert_eq!(edge.from, NodeId(2));
        assert_eq!(edge.to, NodeId(0));
        assert_eq!(edge.emf, 0.0);
    }

    #[test]
    fn test_too_few_numbers() {
        let err = parse_case_line("1 -- 2", 7).unwrap_err();
        assert!(matches!(err, OracleError::Parse { line: 7, .. }));
    }

    #[test]
    fn test_too_many_numbers() {
        assert!(parse_case_line("1 -- 2, 3; 4V 5", 1).is_err());
    }

    #[test]
    fn test_rejects_float_and_zero_labels() {
        assert!(parse_case_line("1.5 -- 2, 3;", 1).is_err());
        assert!(parse_case_line("0 -- 2, 3;", 1).is_err());
        assert!(parse_case_line("1 -- -2, 3;", 1).is_err());
    }

    #[test]
    fn test_parse_case_skips_blank_lines_and_reports_line() {
        let net = parse_case("1 -- 2, 10; 5V\n\n2 -- 3, 20;\n   \n3 -- 1, 30;\n").unwrap();
        assert_eq!(net.edge_count(), 3);
        assert_eq!(net.node_count(), 3);

        let err = parse_case("1 -- 2, 10;\n\nbroken\n").unwrap_err();
        assert!(matches!(err, OracleError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_parse_case_rejects_self_loop() {
        assert!(matches!(
            parse_case("2 -- 2, 10;\n"),
            Err(OracleError::SelfLoop { edge: 0, node: 1 })
        ));
    }

    #[test]
    fn test_format_omits_small_emf() {
        let plain = Edge::new(NodeId(0), NodeId(1), 12.5, 5e-7);
        assert_eq!(format_case_line(&plain), "1 -- 2, 12.5;");

        let sourced = Edge::new(NodeId(1), NodeId(3), 100.0, -7.25);
        assert_eq!(format_case_line(&sourced), "2 -- 4, 100; -7.25V");
    }

    #[test]
    fn test_written_case_parses_back() {
        let net = Network::new(vec![
            Edge::new(NodeId(0), NodeId(1), 123.456, 0.0),
            Edge::new(NodeId(1), NodeId(2), 0.001, -999.5),
            Edge::new(NodeId(2), NodeId(0), 1e-7, 1e6),
        ])
        .unwrap();
        assert_eq!(parse_case(&write_case(&net)).unwrap(), net);
    }
}
