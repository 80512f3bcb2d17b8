//! Network validation.

use crate::error::{OracleError, Result};

use super::Edge;

/// Validate an edge sequence against a node count.
///
/// Checks:
/// - No edge connects a node to itself
/// - Both endpoints lie below `node_count`
/// - Resistance is finite and non-negative
/// - EMF is finite
pub fn validate_edges(edges: &[Edge], node_count: usize) -> Result<()> {
    for (idx, edge) in edges.iter().enumerate() {
        if edge.from == edge.to {
            return Err(OracleError::SelfLoop {
                edge: idx,
                node: edge.from.0,
            });
        }

        for node in [edge.from, edge.to] {
            if node.0 >= node_count {
                return Err(OracleError::NodeOutOfRange {
                    edge: idx,
                    node: node.0,
                    node_count,
                });
            }
        }

        if !edge.resistance.is_finite() || edge.resistance < 0.0 {
            return Err(OracleError::InvalidResistance {
                edge: idx,
                value: edge.resistance,
            });
        }

        if !edge.emf.is_finite() {
            return Err(OracleError::InvalidEmf {
                edge: idx,
                value: edge.emf,
            });
        }
    }

    Ok(())
}
