//! Random test-network generation.
//!
//! Every unordered node pair `i < j` is visited once, in order; each pair
//! gets an edge `i -> j` with probability [`GeneratorConfig::edge_probability`],
//! and that edge gets a source with probability
//! [`GeneratorConfig::emf_probability`].

use std::ops::Range;

use log::debug;
use rand::Rng;

use crate::error::{OracleError, Result};
use crate::network::{Edge, Network, NodeId};

/// Configuration for random network generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of candidate nodes; the network may end up with fewer when
    /// the highest ones receive no edge.
    pub node_count: usize,
    /// Probability that a node pair is joined by an edge.
    pub edge_probability: f64,
    /// Probability that an edge carries an EMF.
    pub emf_probability: f64,
    /// Resistance range (ohms).
    pub resistance: Range<f64>,
    /// EMF range (volts).
    pub emf: Range<f64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            node_count: 5,
            edge_probability: 0.5,
            emf_probability: 0.3,
            resistance: 10.0..1000.0,
            emf: -1000.0..1000.0,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of nodes.
    pub fn with_node_count(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    /// Set the edge probability.
    pub fn with_edge_probability(mut self, p: f64) -> Self {
        self.edge_probability = p;
        self
    }

    /// Set the EMF probability.
    pub fn with_emf_probability(mut self, p: f64) -> Self {
        self.emf_probability = p;
        self
    }

    /// Set the resistance range (ohms).
    pub fn with_resistance(mut self, range: Range<f64>) -> Self {
        self.resistance = range;
        self
    }

    /// Set the EMF range (volts).
    pub fn with_emf(mut self, range: Range<f64>) -> Self {
        self.emf = range;
        self
    }

    /// Check that probabilities and ranges are usable.
    pub fn validate(&self) -> Result<()> {
        for (name, p) in [
            ("edge probability", self.edge_probability),
            ("EMF probability", self.emf_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(OracleError::invalid_parameter(format!(
                    "{} must be in [0, 1], got {}",
                    name, p
                )));
            }
        }

        let r = &self.resistance;
        if !(r.start.is_finite() && r.end.is_finite() && r.start >= 0.0 && r.start < r.end) {
            return Err(OracleError::invalid_parameter(format!(
                "resistance range {:?} must be a non-empty, non-negative finite range",
                r
            )));
        }

        let e = &self.emf;
        if !(e.start.is_finite() && e.end.is_finite() && e.start < e.end) {
            return Err(OracleError::invalid_parameter(format!(
                "EMF range {:?} must be a non-empty finite range",
                e
            )));
        }

        Ok(())
    }
}

/// Generate a random network.
///
/// The node count follows from the edges, as it does for a parsed case
/// file, so high nodes that received no edge are dropped rather than left
/// isolated.
pub fn generate_network<R: Rng + ?Sized>(rng: &mut R, config: &GeneratorConfig) -> Result<Network> {
    config.validate()?;

    let n = config.node_count;
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if !rng.gen_bool(config.edge_probability) {
                continue;
            }
            let resistance = rng.gen_range(config.resistance.clone());
            let emf = if rng.gen_bool(config.emf_probability) {
                rng.gen_range(config.emf.clone())
            } else {
                0.0
            };
            edges.push(Edge::new(NodeId(i), NodeId(j), resistance, emf));
        }
    }

    let network = Network::new(edges)?;
    debug!(
        "generated {} edges over {} of {} nodes",
        network.edge_count(),
        network.node_count(),
        n
    );
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_same_seed_same_network() {
        let config = GeneratorConfig::new().with_node_count(8);
        let a = generate_network(&mut ChaCha8Rng::seed_from_u64(7), &config).unwrap();
        let b = generate_network(&mut ChaCha8Rng::seed_from_u64(7), &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_edges_respect_config() {
        let config = GeneratorConfig::new().with_node_count(12);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..20 {
            let net = generate_network(&mut rng, &config).unwrap();
            assert!(net.node_count() <= 12);
            for edge in net.edges() {
                assert!(edge.from < edge.to);
                assert!((10.0..1000.0).contains(&edge.resistance));
                assert!((-1000.0..1000.0).contains(&edge.emf));
            }
        }
    }

    #[test]
    fn test_full_graph_when_probability_is_one() {
        let config = GeneratorConfig::new()
            .with_node_count(6)
            .with_edge_probability(1.0)
            .with_emf_probability(0.0);
        let net = generate_network(&mut ChaCha8Rng::seed_from_u64(1), &config).unwrap();
        assert_eq!(net.edge_count(), 15);
        assert!(net.edges().iter().all(|e| e.emf == 0.0));

        // Lexicographic pair order
        assert_eq!((net.edges()[0].from, net.edges()[0].to), (NodeId(0), NodeId(1)));
        assert_eq!((net.edges()[5].from, net.edges()[5].to), (NodeId(1), NodeId(2)));
    }

    #[test]
    fn test_unused_top_node_is_dropped() {
        use crate::solver::Solver;
        use crate::text::{parse_case, write_case};

        let config = GeneratorConfig::new().with_node_count(4);
        let net = (0..500)
            .map(|seed| generate_network(&mut ChaCha8Rng::seed_from_u64(seed), &config).unwrap())
            .find(|net| net.node_count() == 3 && !net.has_isolated_node())
            .expect("some seed leaves node 4 without edges");

        let reparsed = parse_case(&write_case(&net)).unwrap();
        assert_eq!(reparsed.node_count(), net.node_count());
        assert!(Solver::new().solve(&net).is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let bad_p = GeneratorConfig::new().with_edge_probability(1.5);
        assert!(generate_network(&mut rng, &bad_p).is_err());

        let bad_r = GeneratorConfig::new().with_resistance(-5.0..5.0);
        assert!(generate_network(&mut rng, &bad_r).is_err());

        let empty_emf = GeneratorConfig::new().with_emf(1.0..1.0);
        assert!(empty_emf.validate().is_err());
    }
}
