//! Core identifiers for network representation.

use std::fmt;

/// A zero-based node identifier.
///
/// Text files use one-based labels; see [`NodeId::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The one-based label used in test-case and answer files.
    pub fn label(&self) -> usize {
        self.0 + 1
    }

    /// Convert a one-based label back into a node id.
    ///
    /// Returns `None` for label 0.
    pub fn from_label(label: usize) -> Option<NodeId> {
        label.checked_sub(1).map(NodeId)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Index of an edge within its network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Unknown in the Kirchhoff system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unknown {
    /// Branch current of an edge
    Current(EdgeId),
    /// Electrical potential of a node
    Potential(NodeId),
}

impl Unknown {
    /// Get the column of this unknown in the system matrix.
    /// Branch currents come first (one per edge), then node potentials.
    pub fn column(&self, edge_count: usize) -> usize {
        match self {
            Unknown::Current(EdgeId(e)) => *e,
            Unknown::Potential(NodeId(n)) => edge_count + n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_one_based() {
        assert_eq!(NodeId(0).label(), 1);
        assert_eq!(NodeId::from_label(3), Some(NodeId(2)));
        assert_eq!(NodeId::from_label(0), None);
        assert_eq!(NodeId(4).to_string(), "5");
    }

    #[test]
    fn test_unknown_columns() {
        assert_eq!(Unknown::Current(EdgeId(2)).column(5), 2);
        assert_eq!(Unknown::Potential(NodeId(0)).column(5), 5);
        assert_eq!(Unknown::Potential(NodeId(3)).column(5), 8);
    }
}
