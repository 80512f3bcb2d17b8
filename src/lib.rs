//! # Kirchhoff Oracle
//!
//! A reference oracle for DC resistive-network solvers.
//!
//! This library provides:
//! - A network model of resistor/EMF branches over numbered nodes
//! - A dense Kirchhoff solver yielding the branch current of every edge
//! - A positional, tolerance-aware comparator for edge-current listings
//! - Random test-case generation and an end-to-end runner (CLI only)
//!
//! ## Architecture
//!
//! - [`network`] - Edges, nodes, and validation
//! - [`solver`] - KCL + Ohm's-law system assembly and LU solving
//! - [`compare`] - Result comparison under relative/absolute tolerance
//! - [`text`] - Test-case and answer line formats
//! - [`generate`] - Random networks
//! - [`runner`] - Drives a subject program against oracle answers (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! kirchhoff generate --nodes 6 --output case.txt --answer
//! ./my_solver < case.txt > result.txt
//! kirchhoff compare result.txt case.txt.ans
//!
//! kirchhoff run --tests 100 --nodes 8 -- ./my_solver
//! ```
//!
//! ### Library
//!
//! ```
//! use kirchhoff_oracle::{text, Solver};
//!
//! let network = text::parse_case("1 -- 2, 10; 12V\n2 -- 1, 20;\n").unwrap();
//! let solution = Solver::new().solve(&network).unwrap();
//! assert!((solution.currents()[0] - 0.4).abs() < 1e-12);
//! ```
//!
//! ## Method
//!
//! For E edges over N nodes the oracle solves one (N + E)-square system
//! whose unknowns are the E branch currents followed by the N node
//! potentials. N - 1 rows state Kirchhoff's current law, one row pins the
//! reference node's potential, and E rows state Ohm's law with the branch
//! EMF. A singular system means the network has no unique solution.

pub mod compare;
pub mod error;
pub mod generate;
pub mod network;
pub mod solver;
pub mod text;

#[cfg(feature = "cli")]
pub mod runner;

// Re-export main types for convenience
pub use compare::{compare, EdgeCurrent, Tolerances, Verdict};
pub use error::{OracleError, Result};
pub use network::{Edge, Network, NodeId};
pub use solver::{Solution, Solver};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmOracle;

/// Solve a network with the default solver configuration.
pub fn solve(network: &Network) -> Result<Solution> {
    Solver::new().solve(network)
}

/// Solve test-case text and render the answer text.
pub fn answer_for(case: &str) -> Result<String> {
    let network = text::parse_case(case)?;
    let solution = solve(&network)?;
    Ok(text::write_answer(&solution.measurements(&network)))
}
