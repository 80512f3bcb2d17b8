//! Kirchhoff system assembly and current extraction.

use log::debug;

use crate::compare::EdgeCurrent;
use crate::error::{OracleError, Result};
use crate::network::{EdgeId, Network, NodeId, Unknown};

use super::system::LinearSystem;
use super::DEFAULT_PIVOT_TOLERANCE;

/// Configuration for the solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Pivot tolerance, relative to the equilibrated matrix, below which the
    /// system counts as singular.
    pub pivot_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative pivot tolerance.
    ///
    /// After each row and column is scaled to a largest entry of one, a
    /// pivot smaller than this marks the network as having no unique
    /// solution.
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: f64) -> Result<Self> {
        if !pivot_tolerance.is_finite() || pivot_tolerance < 0.0 {
            return Err(OracleError::invalid_parameter(format!(
                "pivot tolerance must be finite and non-negative, got {}",
                pivot_tolerance
            )));
        }
        self.pivot_tolerance = pivot_tolerance;
        Ok(self)
    }
}

/// Solved branch currents and node potentials of a network.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    currents: Vec<f64>,
    potentials: Vec<f64>,
}

impl Solution {
    /// Branch currents, one per edge in input order.
    pub fn currents(&self) -> &[f64] {
        &self.currents
    }

    /// Current through one edge.
    pub fn current(&self, edge: EdgeId) -> f64 {
        self.currents[edge.0]
    }

    /// Potential of a node relative to the reference node.
    pub fn potential(&self, node: NodeId) -> f64 {
        self.potentials[node.0]
    }

    /// Net current leaving `node`. Zero up to rounding for any solution.
    pub fn kcl_residual(&self, network: &Network, node: NodeId) -> f64 {
        network
            .edges()
            .iter()
            .zip(&self.currents)
            .map(|(edge, &i)| {
                if edge.from == node {
                    i
                } else if edge.to == node {
                    -i
                } else {
                    0.0
                }
            })
            .sum()
    }

    /// Pair each current with its edge's node labels, ready for writing
    /// or comparison.
    pub fn measurements(&self, network: &Network) -> Vec<EdgeCurrent> {
        network
            .edges()
            .iter()
            .zip(&self.currents)
            .map(|(edge, &current)| EdgeCurrent::new(edge.from.label(), edge.to.label(), current))
            .collect()
    }
}

/// Assemble the Kirchhoff system for a network.
pub fn assemble(network: &Network) -> Result<LinearSystem> {
    let mut system = LinearSystem::new(network.system_size())?;
    stamp_kcl_rows(network, &mut system);
    stamp_reference_row(network, &mut system);
    stamp_ohm_rows(network, &mut system);
    Ok(system)
}

/// One row per node: +1 for each edge leaving it, -1 for each edge entering.
fn stamp_kcl_rows(network: &Network, system: &mut LinearSystem) {
    let e = network.edge_count();
    for (i, edge) in network.edges().iter().enumerate() {
        let col = Unknown::Current(EdgeId(i)).column(e);
        system.add(edge.from.0, col, 1.0);
        system.add(edge.to.0, col, -1.0);
    }
}

/// Replace the reference node's KCL row with φ[ref] = 0.
fn stamp_reference_row(network: &Network, system: &mut LinearSystem) {
    if let Some(reference) = network.reference_node() {
        let row = reference.0;
        system.clear_row(row);
        system.set(row, Unknown::Potential(reference).column(network.edge_count()), 1.0);
    }
}

/// One row per edge: r * I + φ[from] - φ[to] = emf.
fn stamp_ohm_rows(network: &Network, system: &mut LinearSystem) {
    let n = network.node_count();
    let e = network.edge_count();
    for (i, edge) in network.edges().iter().enumerate() {
        let row = n + i;
        system.set(row, Unknown::Current(EdgeId(i)).column(e), edge.resistance);
        system.add(row, Unknown::Potential(edge.from).column(e), 1.0);
        system.add(row, Unknown::Potential(edge.to).column(e), -1.0);
        system.set_source(row, edge.emf);
    }
}

/// Dense solver for Kirchhoff systems.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Create a solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solve a network for its branch currents.
    ///
    /// Returns [`OracleError::NoUniqueSolution`] when the system is singular.
    /// A node without incident edges is reported before anything is
    /// allocated.
    pub fn solve(&self, network: &Network) -> Result<Solution> {
        if network.has_isolated_node() {
            debug!("{} nodes, some without edges", network.node_count());
            return Err(OracleError::NoUniqueSolution);
        }

        let mut system = assemble(network)?;
        debug!(
            "solving {} nodes, {} edges ({}x{} system, largest coefficient {:.3e})",
            network.node_count(),
            network.edge_count(),
            system.size,
            system.size,
            system.scale()
        );

        system.factor(self.config.pivot_tolerance)?;
        system.solve()?;

        let e = network.edge_count();
        let x = system.solution();
        Ok(Solution {
            currents: x[..e].to_vec(),
            potentials: x[e..].to_vec(),
        })
    }
}
