//! Network model: nodes, edges, and their validation.
//!
//! A [`Network`] is an ordered sequence of [`Edge`]s over implicitly numbered
//! nodes. Edge order is part of the public contract: it fixes the column of
//! each branch current in the Kirchhoff system and the order in which
//! results are written and compared.

mod graph;
mod types;
mod validate;

pub use graph::{Edge, Network, EMF_EPSILON};
pub use types::*;
pub use validate::validate_edges;
