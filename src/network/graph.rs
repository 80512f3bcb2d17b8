//! Network graph structure.

use std::collections::BTreeSet;

use super::types::NodeId;
use super::validate::validate_edges;
use crate::error::Result;

/// EMF magnitudes at or below this are treated as "no source on the branch".
pub const EMF_EPSILON: f64 = 1e-6;

/// One circuit branch: a resistor in series with an optional ideal EMF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Tail node; positive current flows from here
    pub from: NodeId,
    /// Head node
    pub to: NodeId,
    /// Resistance in ohms
    pub resistance: f64,
    /// EMF in volts, oriented from `from` to `to`
    pub emf: f64,
}

impl Edge {
    /// Create a new edge.
    pub fn new(from: NodeId, to: NodeId, resistance: f64, emf: f64) -> Self {
        Self {
            from,
            to,
            resistance,
            emf,
        }
    }

    /// Create a source-free resistor edge.
    pub fn resistor(from: NodeId, to: NodeId, resistance: f64) -> Self {
        Self::new(from, to, resistance, 0.0)
    }

    /// The same physical branch described in the opposite direction.
    ///
    /// Its current is the negation of this edge's current.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            resistance: self.resistance,
            emf: -self.emf,
        }
    }

    /// Whether the branch carries a source.
    ///
    /// Uses an absolute threshold of [`EMF_EPSILON`]. A purely relative
    /// closeness test against zero would only accept an exact zero, so tiny
    /// residual EMFs would be written out as sources.
    pub fn has_emf(&self) -> bool {
        self.emf.abs() > EMF_EPSILON
    }
}

/// An immutable, validated resistive network.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    edges: Vec<Edge>,
    node_count: usize,
}

impl Network {
    /// Build a network whose node count is one past the largest node id
    /// referenced by any edge.
    pub fn new(edges: Vec<Edge>) -> Result<Self> {
        let node_count = edges
            .iter()
            .map(|e| e.from.0.max(e.to.0) + 1)
            .max()
            .unwrap_or(0);
        Self::with_node_count(node_count, edges)
    }

    /// Build a network with an explicit node count.
    ///
    /// Nodes that no edge touches are still part of the network; they leave
    /// the Kirchhoff system singular.
    pub fn with_node_count(node_count: usize, edges: Vec<Edge>) -> Result<Self> {
        validate_edges(&edges, node_count)?;
        Ok(Self { edges, node_count })
    }

    /// Edges in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of edges (E).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of nodes (N).
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// The node whose potential is pinned to zero: the highest-indexed node.
    pub fn reference_node(&self) -> Option<NodeId> {
        self.node_count.checked_sub(1).map(NodeId)
    }

    /// Get the size of the Kirchhoff system (N + E).
    pub fn system_size(&self) -> usize {
        self.node_count + self.edges.len()
    }

    /// Iterate over all node ids.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.node_count).map(NodeId)
    }

    /// Whether some node has no incident edge.
    ///
    /// Such a node has an all-zero KCL row (or, as the reference node,
    /// grounds nothing), so the system is singular. A lone node with no
    /// edges is the whole network and does not count. Only distinct
    /// endpoints are collected, so huge labels cost nothing.
    pub fn has_isolated_node(&self) -> bool {
        if self.node_count <= 1 {
            return false;
        }
        let touched: BTreeSet<usize> = self.edges.iter().flat_map(|e| [e.from.0, e.to.0]).collect();
        touched.len() < self.node_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;

    #[test]
    fn test_node_count_from_edges() {
        let net = Network::new(vec![
            Edge::resistor(NodeId(0), NodeId(3), 10.0),
            Edge::resistor(NodeId(2), NodeId(1), 10.0),
        ])
        .unwrap();
        assert_eq!(net.node_count(), 4);
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.system_size(), 6);
        assert_eq!(net.reference_node(), Some(NodeId(3)));
    }

    #[test]
    fn test_empty_network() {
        let net = Network::new(Vec::new()).unwrap();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.reference_node(), None);
    }

    #[test]
    fn test_explicit_node_count_rejects_out_of_range() {
        let result = Network::with_node_count(2, vec![Edge::resistor(NodeId(0), NodeId(2), 1.0)]);
        assert!(matches!(
            result,
            Err(OracleError::NodeOutOfRange {
                edge: 0,
                node: 2,
                node_count: 2
            })
        ));
    }

    #[test]
    fn test_reversed_edge() {
        let e = Edge::new(NodeId(0), NodeId(1), 5.0, 12.0);
        let r = e.reversed();
        assert_eq!(r.from, NodeId(1));
        assert_eq!(r.to, NodeId(0));
        assert_eq!(r.resistance, 5.0);
        assert_eq!(r.emf, -12.0);
        assert_eq!(r.reversed(), e);
    }

    #[test]
    fn test_isolated_node_detection() {
        let connected = Network::new(vec![
            Edge::resistor(NodeId(0), NodeId(1), 1.0),
            Edge::resistor(NodeId(1), NodeId(2), 1.0),
        ])
        .unwrap();
        assert!(!connected.has_isolated_node());

        let gap = Network::new(vec![Edge::resistor(NodeId(0), NodeId(2), 1.0)]).unwrap();
        assert!(gap.has_isolated_node());

        let spare_top = Network::with_node_count(3, vec![Edge::resistor(NodeId(0), NodeId(1), 1.0)]).unwrap();
        assert!(spare_top.has_isolated_node());

        assert!(!Network::with_node_count(1, Vec::new()).unwrap().has_isolated_node());
        assert!(!Network::new(Vec::new()).unwrap().has_isolated_node());
    }

    #[test]
    fn test_has_emf_threshold() {
        assert!(!Edge::new(NodeId(0), NodeId(1), 1.0, 1e-7).has_emf());
        assert!(Edge::new(NodeId(0), NodeId(1), 1.0, -0.5).has_emf());
    }
}
