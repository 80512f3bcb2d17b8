//! Dense linear system assembly and LU solving.

use log::trace;

use crate::error::{OracleError, Result};

/// Dense square linear system Ax = z.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    /// Coefficient matrix A (row-major)
    pub a: Vec<f64>,
    /// Right-hand side z
    pub z: Vec<f64>,
    /// Solution vector x
    pub x: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of A
    lu: Vec<f64>,
    /// Row permutation applied during pivoting
    pivots: Vec<usize>,
    /// Number of row swaps performed (sign of the permutation)
    swaps: usize,
    /// Row equilibration factors applied before factoring
    row_scale: Vec<f64>,
    /// Column equilibration factors applied before factoring
    col_scale: Vec<f64>,
    /// Whether `lu` holds a valid factorisation of `a`
    factored: bool,
}

impl LinearSystem {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Result<Self> {
        let entries = size.checked_mul(size).ok_or_else(|| {
            OracleError::invalid_parameter(format!("system of dimension {} is too large", size))
        })?;
        Ok(Self {
            a: vec![0.0; entries],
            z: vec![0.0; size],
            x: vec![0.0; size],
            size,
            lu: vec![0.0; entries],
            pivots: (0..size).collect(),
            swaps: 0,
            row_scale: vec![1.0; size],
            col_scale: vec![1.0; size],
            factored: false,
        })
    }

    /// Set matrix element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] = value;
        self.factored = false;
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.a[row * self.size + col] += value;
        self.factored = false;
    }

    /// Zero an entire row of A and its right-hand side entry.
    pub fn clear_row(&mut self, row: usize) {
        let start = row * self.size;
        self.a[start..start + self.size].fill(0.0);
        self.z[row] = 0.0;
        self.factored = false;
    }

    /// Set a right-hand side element.
    pub fn set_source(&mut self, row: usize, value: f64) {
        self.z[row] = value;
    }

    /// Get a row of A.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.a[row * self.size..(row + 1) * self.size]
    }

    /// Largest absolute entry of A.
    pub fn scale(&self) -> f64 {
        max_abs(&self.a)
    }

    /// Compute row then column scaling factors that bring the largest
    /// entry of every row and column of A to one, and store R·A·C in `lu`.
    ///
    /// Rows and columns without a nonzero entry keep a factor of one.
    fn equilibrate(&mut self) {
        let n = self.size;
        for i in 0..n {
            let m = max_abs(&self.a[i * n..(i + 1) * n]);
            self.row_scale[i] = if m > 0.0 { 1.0 / m } else { 1.0 };
        }
        for j in 0..n {
            let m = (0..n).fold(0.0_f64, |m, i| m.max((self.a[i * n + j] * self.row_scale[i]).abs()));
            self.col_scale[j] = if m > 0.0 { 1.0 / m } else { 1.0 };
        }
        for i in 0..n {
            for j in 0..n {
                self.lu[i * n + j] = self.a[i * n + j] * self.row_scale[i] * self.col_scale[j];
            }
        }
    }

    /// Perform LU decomposition with partial pivoting on the equilibrated
    /// matrix.
    ///
    /// The system is singular when a pivot column has no entry larger than
    /// `pivot_tolerance` times the largest equilibrated entry. Equilibration
    /// keeps this test independent of the units of the rows, so networks of
    /// very large or very small resistances are judged alike.
    pub fn factor(&mut self, pivot_tolerance: f64) -> Result<()> {
        let n = self.size;
        self.factored = false;
        self.swaps = 0;

        for (i, p) in self.pivots.iter_mut().enumerate() {
            *p = i;
        }

        self.equilibrate();
        let threshold = pivot_tolerance * max_abs(&self.lu);

        for k in 0..n {
            // Find pivot
            let mut max_val = self.lu[k * n + k].abs();
            let mut max_row = k;

            for i in (k + 1)..n {
                let val = self.lu[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val <= threshold {
                trace!("pivot {} is {:.3e}, threshold {:.3e}", k, max_val, threshold);
                return Err(OracleError::NoUniqueSolution);
            }

            // Swap rows if needed
            if max_row != k {
                self.pivots.swap(k, max_row);
                self.swaps += 1;
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                if factor == 0.0 {
                    continue;
                }
                for j in (k + 1)..n {
                    self.lu[i * n + j] -= factor * self.lu[k * n + j];
                }
            }
        }

        self.factored = true;
        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) -> Result<()> {
        if !self.factored {
            return Err(OracleError::invalid_parameter(
                "linear system must be factored before solving",
            ));
        }
        let n = self.size;

        // Apply pivot permutation to R * z
        for i in 0..n {
            let p = self.pivots[i];
            self.x[i] = self.z[p] * self.row_scale[p];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                self.x[i] -= self.lu[i * n + j] * self.x[j];
            }
            self.x[i] /= self.lu[i * n + i];
        }

        // Undo column scaling
        for (x, c) in self.x.iter_mut().zip(&self.col_scale) {
            *x *= c;
        }

        Ok(())
    }

    /// Determinant of A from the current factorisation.
    ///
    /// Returns `None` if the system has not been factored.
    pub fn determinant(&self) -> Option<f64> {
        if !self.factored {
            return None;
        }
        let n = self.size;
        let diag: f64 = (0..n).map(|i| self.lu[i * n + i]).product();
        let scaling: f64 = self.row_scale.iter().chain(&self.col_scale).product();
        let det = diag / scaling;
        Some(if self.swaps % 2 == 0 { det } else { -det })
    }

    /// Solution vector from the last [`solve`](Self::solve).
    pub fn solution(&self) -> &[f64] {
        &self.x
    }
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn system_from(rows: &[&[f64]], rhs: &[f64]) -> LinearSystem {
        let mut sys = LinearSystem::new(rows.len()).unwrap();
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                sys.set(i, j, v);
            }
            sys.set_source(i, rhs[i]);
        }
        sys
    }

    #[test]
    fn test_solve_requires_pivoting() {
        // Leading zero forces a row swap
        let mut sys = system_from(&[&[0.0, 2.0], &[3.0, 1.0]], &[4.0, 5.0]);
        sys.factor(1e-9).unwrap();
        sys.solve().unwrap();
        assert_relative_eq!(sys.solution()[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(sys.solution()[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(sys.determinant().unwrap(), -6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_three_by_three() {
        let mut sys = system_from(
            &[&[2.0, 1.0, -1.0], &[-3.0, -1.0, 2.0], &[-2.0, 1.0, 2.0]],
            &[8.0, -11.0, -3.0],
        );
        sys.factor(1e-9).unwrap();
        sys.solve().unwrap();
        let x = sys.solution();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], -1.0, epsilon = 1e-12);
        assert_relative_eq!(sys.determinant().unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_detected() {
        let mut sys = system_from(&[&[1.0, 2.0], &[2.0, 4.0]], &[1.0, 2.0]);
        assert!(matches!(sys.factor(1e-9), Err(OracleError::NoUniqueSolution)));
        assert!(sys.determinant().is_none());
    }

    #[test]
    fn test_zero_matrix_is_singular() {
        let mut sys = LinearSystem::new(2).unwrap();
        assert!(sys.factor(1e-9).is_err());
    }

    #[test]
    fn test_empty_system() {
        let mut sys = LinearSystem::new(0).unwrap();
        sys.factor(1e-9).unwrap();
        sys.solve().unwrap();
        assert!(sys.solution().is_empty());
        assert_eq!(sys.determinant(), Some(1.0));
    }

    #[test]
    fn test_badly_scaled_rows_are_not_singular() {
        // Ohm-like rows with huge coefficients next to unit ones
        let mut sys = system_from(
            &[&[1.0, -1.0, 0.0], &[1e12, 0.0, 1.0], &[0.0, 1e12, -1.0]],
            &[0.0, 10.0, 0.0],
        );
        sys.factor(1e-9).unwrap();
        sys.solve().unwrap();
        let x = sys.solution();
        assert_relative_eq!(x[0], 5e-12, max_relative = 1e-9);
        assert_relative_eq!(x[1], 5e-12, max_relative = 1e-9);
        assert_relative_eq!(x[2], 5.0, max_relative = 1e-9);
    }

    #[test]
    fn test_oversized_dimension_is_rejected() {
        assert!(matches!(
            LinearSystem::new(usize::MAX),
            Err(OracleError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_solve_before_factor_fails() {
        let mut sys = system_from(&[&[1.0]], &[1.0]);
        assert!(sys.solve().is_err());
    }

    #[test]
    fn test_clear_row() {
        let mut sys = system_from(&[&[1.0, 2.0], &[3.0, 4.0]], &[5.0, 6.0]);
        sys.clear_row(0);
        assert_eq!(sys.row(0), &[0.0, 0.0]);
        assert_eq!(sys.z[0], 0.0);
        assert_eq!(sys.row(1), &[3.0, 4.0]);
        assert_relative_eq!(sys.scale(), 4.0);
    }
}
