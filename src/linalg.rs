//! Dense linear algebra used by the Gaussian Process fit.
//!
//! Matrices are [`nalgebra::DMatrix`] values with their shape checked at each
//! operation. The Cholesky factorization and triangular solves are written out
//! by hand rather than delegated to `nalgebra::linalg::Cholesky`, because the
//! GP relies on a *regularized* factorization that never fails:
//!
//! For each diagonal pivot, if the residual `a_ii - Σ_{k<i} L_ik²` is zero or
//! negative (round-off on a near-singular covariance matrix), the pivot
//! becomes `sqrt(|residual| + 1e-6)` instead of aborting. The result is then
//! only an approximate factor of the input, but the optimizer keeps running.
//! The number of pivots that were patched this way is reported on the
//! returned [`CholeskyFactor`].
//!
//! # Examples
//!
//! ```
//! use gp_bayesopt::linalg::{cholesky, matmul, transpose};
//! use nalgebra::DMatrix;
//!
//! let a = DMatrix::from_row_slice(2, 2, &[4.0, 2.0, 2.0, 3.0]);
//! let factor = cholesky(&a).unwrap();
//! let rebuilt = matmul(factor.l(), &transpose(factor.l())).unwrap();
//! assert!((rebuilt - a).norm() < 1e-12);
//! assert_eq!(factor.regularized_pivots(), 0);
//! ```

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Jitter added under the square root of a non-positive Cholesky pivot.
pub const CHOLESKY_JITTER: f64 = 1e-6;

/// Allocate an `rows × cols` matrix of zeros.
#[must_use]
pub fn zeros(rows: usize, cols: usize) -> DMatrix<f64> {
    DMatrix::zeros(rows, cols)
}

/// Allocate the `n × n` identity matrix.
#[must_use]
pub fn identity(n: usize) -> DMatrix<f64> {
    DMatrix::identity(n, n)
}

/// Return the transpose of `m`.
#[must_use]
pub fn transpose(m: &DMatrix<f64>) -> DMatrix<f64> {
    m.transpose()
}

/// Multiply `a · b`.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if `a.ncols() != b.nrows()`.
pub fn matmul(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if a.ncols() != b.nrows() {
        return Err(Error::DimensionMismatch {
            expected: a.ncols(),
            got: b.nrows(),
        });
    }
    Ok(a * b)
}

/// Lower-triangular factor `L` with `L·Lᵗ ≈ A`.
#[derive(Clone, Debug)]
pub struct CholeskyFactor {
    l: DMatrix<f64>,
    regularized: usize,
}

impl CholeskyFactor {
    /// The lower-triangular factor. Entries above the diagonal are zero.
    #[must_use]
    pub fn l(&self) -> &DMatrix<f64> {
        &self.l
    }

    /// Order of the factored matrix.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.l.nrows()
    }

    /// Number of diagonal pivots that were non-positive and had to be
    /// replaced by `sqrt(|residual| + CHOLESKY_JITTER)`.
    ///
    /// Zero means the factorization is exact up to floating-point error.
    #[must_use]
    pub fn regularized_pivots(&self) -> usize {
        self.regularized
    }

    /// Solve `L·y = b` by forward substitution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `b` has the wrong length.
    pub fn solve_lower(&self, b: &DVector<f64>) -> Result<DVector<f64>> {
        solve_lower(&self.l, b)
    }

    /// Solve `L·Lᵗ·x = b`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `b` has the wrong length.
    pub fn solve(&self, b: &DVector<f64>) -> Result<DVector<f64>> {
        solve_via_cholesky(&self.l, b)
    }

    /// Consume the factor and return the raw matrix.
    #[must_use]
    pub fn into_inner(self) -> DMatrix<f64> {
        self.l
    }
}

/// Factor a symmetric, positive semi-definite matrix as `L·Lᵗ`.
///
/// Only the lower triangle of `a` is read. Non-positive pivots are
/// regularized as described in the [module docs](self); this function never
/// panics on ill-conditioned input.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if `a` is not square.
pub fn cholesky(a: &DMatrix<f64>) -> Result<CholeskyFactor> {
    ensure_square(a)?;
    let n = a.nrows();
    let mut l = zeros(n, n);
    let mut regularized = 0;

    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[(i, k)] * l[(j, k)]).sum();
            if i == j {
                let residual = a[(i, i)] - sum;
                if residual <= 0.0 {
                    l[(i, i)] = (residual.abs() + CHOLESKY_JITTER).sqrt();
                    regularized += 1;
                } else {
                    l[(i, i)] = residual.sqrt();
                }
            } else {
                l[(i, j)] = (a[(i, j)] - sum) / l[(j, j)];
            }
        }
    }

    Ok(CholeskyFactor { l, regularized })
}

/// Solve `L·y = b` for lower-triangular `L` by forward substitution.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if `l` is not square or `b` does not
/// have `l.nrows()` entries.
pub fn solve_lower(l: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    ensure_square(l)?;
    ensure_len(l.nrows(), b.len())?;
    let n = b.len();
    let mut y = DVector::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[(i, j)] * y[j]).sum();
        y[i] = (b[i] - sum) / l[(i, i)];
    }
    Ok(y)
}

/// Solve `Lᵗ·x = y` by back substitution.
///
/// Takes the *lower* factor `L` and reads it transposed, so `Lᵗ` is never
/// materialized.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if `l` is not square or `y` does not
/// have `l.nrows()` entries.
pub fn solve_upper(l: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>> {
    ensure_square(l)?;
    ensure_len(l.nrows(), y.len())?;
    let n = y.len();
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|j| l[(j, i)] * x[j]).sum();
        x[i] = (y[i] - sum) / l[(i, i)];
    }
    Ok(x)
}

/// Solve `A·x = b` given the Cholesky factor `L` of `A`.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] on shape errors.
pub fn solve_via_cholesky(l: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    let y = solve_lower(l, b)?;
    solve_upper(l, &y)
}

fn ensure_square(m: &DMatrix<f64>) -> Result<()> {
    if m.nrows() == m.ncols() {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            expected: m.nrows(),
            got: m.ncols(),
        })
    }
}

fn ensure_len(expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { expected, got })
    }
}
