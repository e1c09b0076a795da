//! Closed-form ordinary least squares.
//!
//! Every run in this project solves the same small problem:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! via the normal equations `β = (XᵗX)⁻¹ Xᵗy`.
//!
//! Implementation choices:
//! - All operations return fresh nalgebra values. Nothing writes into a
//!   caller-provided buffer, so a matrix and its transpose/inverse can never alias.
//! - The Gram matrix gets a numerical rank test (symmetric eigenvalues) before
//!   inversion. Only rank deficiency at working precision is rejected; large
//!   but finite condition numbers (offset features such as years or IDs) fit.
//! - No fallback (pseudo-inverse, automatic ridge). A rank-deficient design is
//!   reported to the caller as [`RegressionError::SingularMatrix`].

use nalgebra::{DMatrix, DVector};

/// Default per-coefficient rank tolerance: the Gram matrix is singular when
/// `λ_min ≤ tol · k · λ_max` for `k` coefficients.
pub const DEFAULT_SINGULAR_TOL: f64 = f64::EPSILON;

/// Errors raised by the regression engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RegressionError {
    /// Two operands disagree on a shared dimension.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// `XᵗX` is not invertible: collinear features or fewer rows than columns.
    SingularMatrix { rows: usize, cols: usize },
    /// MSE over zero samples is undefined.
    EmptyInput,
}

impl std::fmt::Display for RegressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegressionError::DimensionMismatch {
                what,
                expected,
                actual,
            } => write!(f, "Dimension mismatch in {what}: expected {expected}, got {actual}."),
            RegressionError::SingularMatrix { rows, cols } if rows < cols => write!(
                f,
                "Singular Gram matrix: {rows} rows cannot identify {cols} coefficients."
            ),
            RegressionError::SingularMatrix { rows, cols } => write!(
                f,
                "Singular Gram matrix for a {rows}x{cols} design (collinear features?)."
            ),
            RegressionError::EmptyInput => write!(f, "Cannot evaluate MSE on an empty sample."),
        }
    }
}

impl std::error::Error for RegressionError {}

/// Options for [`fit_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Ridge term `λ` added to the Gram diagonal before inversion.
    ///
    /// `0.0` reproduces the unregularized closed form exactly. The intercept
    /// column is penalized like every other column (`G + λI`).
    pub ridge: f64,
    /// Rank tolerance on `λ_min / (k · λ_max)` of the (regularized) Gram matrix.
    pub singular_tol: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            ridge: 0.0,
            singular_tol: DEFAULT_SINGULAR_TOL,
        }
    }
}

/// Fit OLS coefficients `β = (XᵗX)⁻¹Xᵗy` with default options.
pub fn fit(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
    fit_with(x, y, &FitOptions::default())
}

/// Fit coefficients with an optional ridge term.
pub fn fit_with(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    opts: &FitOptions,
) -> Result<DVector<f64>, RegressionError> {
    let (n, k) = x.shape();
    if y.len() != n {
        return Err(RegressionError::DimensionMismatch {
            what: "fit (response length vs design rows)",
            expected: n,
            actual: y.len(),
        });
    }
    // A ridge term makes an underdetermined system solvable, but the plain
    // closed form needs at least as many rows as coefficients.
    if k == 0 || (n < k && opts.ridge == 0.0) {
        return Err(RegressionError::SingularMatrix { rows: n, cols: k });
    }

    let mut gram = x.tr_mul(x);
    if opts.ridge != 0.0 {
        for i in 0..k {
            gram[(i, i)] += opts.ridge;
        }
    }
    let xty = x.tr_mul(y);

    if !is_well_conditioned(&gram, opts.singular_tol) {
        return Err(RegressionError::SingularMatrix { rows: n, cols: k });
    }

    let gram_inv = gram
        .try_inverse()
        .ok_or(RegressionError::SingularMatrix { rows: n, cols: k })?;
    let beta = gram_inv * xty;

    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(RegressionError::SingularMatrix { rows: n, cols: k })
    }
}

/// Predict `ŷ = Xβ`.
pub fn predict(beta: &DVector<f64>, x: &DMatrix<f64>) -> Result<DVector<f64>, RegressionError> {
    if x.ncols() != beta.len() {
        return Err(RegressionError::DimensionMismatch {
            what: "predict (design columns vs coefficients)",
            expected: beta.len(),
            actual: x.ncols(),
        });
    }
    Ok(x * beta)
}

/// Mean squared error between true and predicted responses.
///
/// Plain left-to-right f64 sum of squares divided by `n`.
pub fn evaluate(y_true: &DVector<f64>, y_pred: &DVector<f64>) -> Result<f64, RegressionError> {
    if y_true.len() != y_pred.len() {
        return Err(RegressionError::DimensionMismatch {
            what: "evaluate (prediction length vs response length)",
            expected: y_true.len(),
            actual: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(RegressionError::EmptyInput);
    }

    let sse: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| {
            let d = t - p;
            d * d
        })
        .sum();
    Ok(sse / y_true.len() as f64)
}

fn is_well_conditioned(gram: &DMatrix<f64>, tol: f64) -> bool {
    if gram.iter().any(|v| !v.is_finite()) {
        return false;
    }
    let eig = gram.clone().symmetric_eigenvalues();
    let max = eig.max();
    let min = eig.min();
    max > 0.0 && min > tol * gram.nrows() as f64 * max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design(rows: &[&[f64]]) -> DMatrix<f64> {
        let cols = rows[0].len() + 1;
        let mut data = Vec::with_capacity(rows.len() * cols);
        for r in rows {
            data.push(1.0);
            data.extend_from_slice(r);
        }
        DMatrix::from_row_slice(rows.len(), cols, &data)
    }

    #[test]
    fn fits_line_through_exact_points() {
        // y = 2x on x = [1,2,3,4]
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 1.0, 2.0, 1.0, 3.0, 1.0, 4.0]);
        let y = DVector::from_row_slice(&[2.0, 4.0, 6.0, 8.0]);

        let beta = fit(&x, &y).unwrap();
        assert!(beta[0].abs() < 1e-10);
        assert!((beta[1] - 2.0).abs() < 1e-10);

        let y_hat = predict(&beta, &x).unwrap();
        for (a, b) in y_hat.iter().zip(y.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
        let mse = evaluate(&y, &y_hat).unwrap();
        assert!(mse.abs() < 1e-20, "mse = {mse}");
    }

    #[test]
    fn recovers_known_coefficients_without_noise() {
        let x = design(&[
            &[0.5, 3.0, -1.0],
            &[1.0, 2.5, 0.0],
            &[1.5, 1.0, 2.0],
            &[2.0, 4.0, 1.5],
            &[2.5, 0.5, -2.0],
            &[3.0, 2.0, 0.5],
            &[3.5, 3.5, 3.0],
            &[4.0, 1.5, -0.5],
            &[4.5, 0.0, 1.0],
            &[5.0, 2.2, 2.5],
        ]);
        let true_beta = DVector::from_row_slice(&[1.5, -2.0, 0.5, 3.0]);
        let y = &x * &true_beta;

        let beta = fit(&x, &y).unwrap();
        for (a, b) in beta.iter().zip(true_beta.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
        let mse = evaluate(&y, &predict(&beta, &x).unwrap()).unwrap();
        assert!(mse < 1e-18, "mse = {mse}");
    }

    #[test]
    fn duplicated_feature_column_is_singular() {
        let x = design(&[&[1.0, 1.0], &[2.0, 2.0], &[3.0, 3.0], &[4.0, 4.0], &[5.0, 5.0]]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 2.5, 4.5, 5.0]);

        let err = fit(&x, &y).unwrap_err();
        assert_eq!(err, RegressionError::SingularMatrix { rows: 5, cols: 3 });
    }

    #[test]
    fn scaled_collinear_column_is_singular() {
        let x = design(&[&[0.3, 0.6], &[1.7, 3.4], &[2.9, 5.8], &[4.1, 8.2], &[5.3, 10.6]]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0, 5.5]);

        assert!(matches!(
            fit(&x, &y),
            Err(RegressionError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn offset_feature_with_large_condition_number_still_fits() {
        // cond(XᵗX) is around 5e13 here; the design has full column rank.
        let rows: Vec<f64> = (0..50).flat_map(|i| [1.0, 10_000.0 + i as f64]).collect();
        let x = DMatrix::from_row_slice(50, 2, &rows);
        let y = x.column(1).map(|v| 3.0 + 0.5 * v);

        let beta = fit(&x, &y).unwrap();
        assert!((beta[0] - 3.0).abs() < 1e-4, "intercept = {}", beta[0]);
        assert!((beta[1] - 0.5).abs() < 1e-8, "slope = {}", beta[1]);

        let mse = evaluate(&y, &predict(&beta, &x).unwrap()).unwrap();
        assert!(mse < 1e-6, "mse = {mse}");
    }

    #[test]
    fn too_few_rows_is_singular() {
        let x = design(&[&[1.0, 2.0], &[3.0, 5.0]]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);

        assert_eq!(
            fit(&x, &y).unwrap_err(),
            RegressionError::SingularMatrix { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn ridge_makes_collinear_design_solvable() {
        let x = design(&[&[1.0, 1.0], &[2.0, 2.0], &[3.0, 3.0], &[4.0, 4.0]]);
        let y = DVector::from_row_slice(&[2.0, 4.0, 6.0, 8.0]);
        let opts = FitOptions {
            ridge: 1e-3,
            ..FitOptions::default()
        };

        let beta = fit_with(&x, &y, &opts).unwrap();
        assert!(beta.iter().all(|v| v.is_finite()));
        // The penalty splits the slope evenly across the two identical columns.
        assert!((beta[1] - beta[2]).abs() < 1e-9);
        assert!((beta[1] + beta[2] - 2.0).abs() < 1e-2);
    }

    #[test]
    fn fit_rejects_misaligned_response() {
        let x = design(&[&[1.0], &[2.0], &[3.0]]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);

        assert!(matches!(
            fit(&x, &y),
            Err(RegressionError::DimensionMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn predict_rejects_column_mismatch() {
        let beta = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 2.0]);

        assert!(matches!(
            predict(&beta, &x),
            Err(RegressionError::DimensionMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn evaluate_rejects_length_mismatch_and_empty() {
        let a = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(matches!(
            evaluate(&a, &b),
            Err(RegressionError::DimensionMismatch { .. })
        ));

        let empty = DVector::<f64>::zeros(0);
        assert_eq!(evaluate(&empty, &empty), Err(RegressionError::EmptyInput));
    }

    #[test]
    fn evaluate_matches_naive_sum() {
        let t = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0]);
        let p = DVector::from_row_slice(&[1.5, 1.0, 3.0, 6.0]);
        // (0.25 + 1 + 0 + 4) / 4
        assert_eq!(evaluate(&t, &p).unwrap(), 5.25 / 4.0);
    }

    #[test]
    fn repeated_fits_are_bit_identical() {
        let x = design(&[&[0.1], &[0.7], &[1.9], &[2.2], &[3.8], &[4.4]]);
        let y = DVector::from_row_slice(&[0.9, 2.1, 4.2, 4.9, 8.1, 9.3]);

        let a = evaluate(&y, &predict(&fit(&x, &y).unwrap(), &x).unwrap()).unwrap();
        let b = evaluate(&y, &predict(&fit(&x, &y).unwrap(), &x).unwrap()).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
