//! Linear least squares via SVD.
//!
//! Each Levenberg–Marquardt step solves a small damped linear problem
//!
//! ```text
//! minimize |J δ + r|² + λ |D δ|²
//! ```
//!
//! which we write as the stacked system `[J; √λ D] δ = [-r; 0]` and hand to an
//! SVD solve. Stacking avoids forming `JᵀJ` (squaring the condition number),
//! and SVD copes with the rank-deficient Jacobians that show up when a
//! component's amplitude is driven towards zero.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve the damped step `[J; √λ·diag(scale)] δ = [-r; 0]`.
pub fn solve_damped_step(
    jacobian: &DMatrix<f64>,
    residuals: &DVector<f64>,
    scale: &DVector<f64>,
    damping: f64,
) -> Option<DVector<f64>> {
    let m = jacobian.nrows();
    let n = jacobian.ncols();
    let sqrt_lambda = damping.max(0.0).sqrt();

    let mut a = DMatrix::<f64>::zeros(m + n, n);
    a.rows_mut(0, m).copy_from(jacobian);
    for j in 0..n {
        a[(m + j, j)] = sqrt_lambda * scale[j];
    }

    let mut b = DVector::<f64>::zeros(m + n);
    for i in 0..m {
        b[i] = -residuals[i];
    }

    solve_least_squares(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn undamped_step_is_gauss_newton() {
        // r(p) = J p - y at p = 0 gives r = -y, so the step must solve J δ = y.
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let r = DVector::from_row_slice(&[-2.0, -5.0, -8.0]);
        let scale = DVector::from_element(2, 1.0);

        let step = solve_damped_step(&j, &r, &scale, 0.0).unwrap();
        assert!((step[0] - 2.0).abs() < 1e-10);
        assert!((step[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn heavy_damping_shrinks_the_step() {
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let r = DVector::from_row_slice(&[-2.0, -5.0, -8.0]);
        let scale = DVector::from_element(2, 1.0);

        let free = solve_damped_step(&j, &r, &scale, 0.0).unwrap();
        let damped = solve_damped_step(&j, &r, &scale, 1e6).unwrap();
        assert!(damped.norm() < 1e-3 * free.norm());
    }
}
