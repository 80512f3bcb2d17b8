//! Kirchhoff system solver.
//!
//! This module turns a [`Network`](crate::network::Network) into branch
//! currents by solving one dense linear system.
//!
//! ## System layout
//!
//! For E edges over N nodes the system has N + E unknowns:
//!
//! ```text
//!            currents I[0..E)     potentials φ[0..N)
//! rows 0..N-1    KCL: Σ(+1 out, -1 in)      0          = 0
//! row  N-1       0                          φ[N-1] = 1 = 0
//! rows N..N+E    r_i at I_i             +1 at φ[from], -1 at φ[to] = emf_i
//! ```
//!
//! - KCL rows state that the net current leaving each node is zero. The
//!   reference node's KCL row is redundant and is replaced by a row pinning
//!   its potential to zero.
//! - Ohm rows state `r * I + φ[from] - φ[to] = emf` for each edge.
//!
//! A singular system means the network has no unique solution (a part of it
//! has no path to the reference node, or it contains a loop of
//! zero-resistance edges). Rows and columns are equilibrated before
//! factoring, so the pivot test does not depend on resistance magnitude.

mod kirchhoff;
mod system;

pub use kirchhoff::{assemble, Solution, Solver, SolverConfig};
pub use system::LinearSystem;

/// Default pivot tolerance for singularity detection, relative to the
/// equilibrated matrix.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-9;
