//! Error types for the Kirchhoff oracle.
//!
//! This module provides a unified error type [`OracleError`] that covers
//! all error conditions that can occur while parsing network text, building
//! a network, solving it, and driving a subject program.

use thiserror::Error;

/// Result type alias using [`OracleError`].
pub type Result<T> = std::result::Result<T, OracleError>;

/// Unified error type for all oracle operations.
#[derive(Error, Debug)]
pub enum OracleError {
    // ============ Text Parsing Errors ============
    /// A line did not yield the numeric tokens its format requires
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    // ============ Network Errors ============
    /// Edge connects a node to itself
    #[error("Edge {edge} connects node {node} to itself")]
    SelfLoop { edge: usize, node: usize },

    /// Edge references a node outside the network
    #[error("Edge {edge} references node {node}, but the network has {node_count} nodes")]
    NodeOutOfRange {
        edge: usize,
        node: usize,
        node_count: usize,
    },

    /// Negative or non-finite resistance
    #[error("Edge {edge} has invalid resistance {value}")]
    InvalidResistance { edge: usize, value: f64 },

    /// Non-finite EMF
    #[error("Edge {edge} has invalid EMF {value}")]
    InvalidEmf { edge: usize, value: f64 },

    // ============ Solver Errors ============
    /// The Kirchhoff system is singular
    #[error("Network has no unique solution - it is disconnected or contains a zero-resistance loop")]
    NoUniqueSolution,

    /// Invalid configuration value
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    // ============ I/O Errors ============
    /// Error reading an input file
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing an output file
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ Subject Errors ============
    /// The subject program could not be started
    #[error("Failed to start subject '{program}': {source}")]
    SubjectSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Feeding or collecting the subject's streams failed
    #[error("Subject I/O error: {message}")]
    SubjectIo { message: String },

    /// The subject did not terminate in time
    #[error("Subject did not finish within {seconds} s")]
    SubjectTimeout { seconds: u64 },
}

impl OracleError {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a subject I/O error
    pub fn subject_io(message: impl Into<String>) -> Self {
        Self::SubjectIo {
            message: message.into(),
        }
    }

    /// Whether this error means "no ground truth" rather than a real failure.
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::NoUniqueSolution)
    }
}
