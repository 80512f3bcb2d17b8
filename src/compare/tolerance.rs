//! Tolerance configuration for current comparison.

use crate::error::{OracleError, Result};

/// Default relative tolerance.
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-4;

/// Default absolute tolerance (A).
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-8;

/// Tolerances for comparing two currents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Relative tolerance (fraction of the larger magnitude).
    pub relative: f64,
    /// Absolute tolerance (A).
    pub absolute: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            relative: DEFAULT_RELATIVE_TOLERANCE,
            absolute: DEFAULT_ABSOLUTE_TOLERANCE,
        }
    }
}

impl Tolerances {
    /// Create tolerances, rejecting negative or non-finite values.
    pub fn new(relative: f64, absolute: f64) -> Result<Self> {
        Self::default().with_relative(relative)?.with_absolute(absolute)
    }

    /// Set the relative tolerance.
    pub fn with_relative(mut self, relative: f64) -> Result<Self> {
        check_tolerance("relative", relative)?;
        self.relative = relative;
        Ok(self)
    }

    /// Set the absolute tolerance (A).
    pub fn with_absolute(mut self, absolute: f64) -> Result<Self> {
        check_tolerance("absolute", absolute)?;
        self.absolute = absolute;
        Ok(self)
    }
}

fn check_tolerance(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(OracleError::invalid_parameter(format!(
            "{} tolerance must be finite and non-negative, got {}",
            name, value
        )))
    }
}

/// Check whether two values are close.
///
/// Pass condition: `|a - b| <= max(rel_tol * max(|a|, |b|), abs_tol)`.
/// Equal values (including equal infinities) are always close; NaN never is.
pub fn is_close(a: f64, b: f64, rel_tol: f64, abs_tol: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    let diff = (a - b).abs();
    diff <= (rel_tol * a.abs().max(b.abs())).max(abs_tol)
}
