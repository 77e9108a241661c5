//! Levenberg–Marquardt nonlinear least squares.
//!
//! We minimize `Σ r_i(p)²` for a residual function supplied as a closure.
//!
//! Implementation choices:
//! - The Jacobian is a forward difference, so callers only provide residuals.
//! - Each step solves the damped problem in stacked form with SVD
//!   (see `math::ols::solve_damped_step`).
//! - Parameters are scaled by the running maximum of the Jacobian column norms
//!   (Marquardt scaling), so amplitudes and phases of very different size
//!   get comparable damping.
//! - Damping shrinks after an accepted step and grows after a rejected one.

use nalgebra::{DMatrix, DVector};

use crate::fit::{ConvergenceReason, LeastSquaresSolver, SolverConfig, SolverOutcome, SolverStatus};
use crate::math::ols::solve_damped_step;

/// Damping never drops below this, so the step stays defined on flat directions.
const MIN_DAMPING: f64 = 1e-15;

#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    config: SolverConfig,
}

impl LevenbergMarquardt {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl LeastSquaresSolver for LevenbergMarquardt {
    fn minimize<F>(&self, mut residuals: F, initial: &[f64]) -> SolverOutcome
    where
        F: FnMut(&[f64]) -> Vec<f64>,
    {
        let cfg = &self.config;
        let n = initial.len();

        let mut x = DVector::from_column_slice(initial);
        let mut r = DVector::from_vec(residuals(x.as_slice()));
        let mut evaluations = 1usize;
        let mut cost = r.norm_squared();

        let finish = |x: &DVector<f64>, status, iterations, evaluations, cost| SolverOutcome {
            parameters: x.iter().copied().collect(),
            status,
            iterations,
            evaluations,
            cost,
        };

        if !cost.is_finite() {
            return finish(&x, SolverStatus::NonFinite, 0, evaluations, cost);
        }
        if cost == 0.0 {
            return finish(&x, SolverStatus::Converged(ConvergenceReason::ExactFit), 0, evaluations, cost);
        }
        if n == 0 {
            return finish(&x, SolverStatus::Converged(ConvergenceReason::Gradient), 0, evaluations, cost);
        }

        let mut damping = cfg.initial_damping.max(MIN_DAMPING);
        let mut column_norms = DVector::<f64>::zeros(n);

        for iteration in 1..=cfg.max_iterations {
            let jacobian = forward_difference_jacobian(&mut residuals, &x, &r);
            evaluations += n;
            if jacobian.iter().any(|v| !v.is_finite()) {
                return finish(&x, SolverStatus::NonFinite, iteration, evaluations, cost);
            }

            for j in 0..n {
                column_norms[j] = column_norms[j].max(jacobian.column(j).norm());
            }
            let scale = column_norms.map(|s| if s > 0.0 { s } else { 1.0 });

            let gradient = jacobian.transpose() * &r;
            if gradient.amax() <= cfg.gtol {
                return finish(
                    &x,
                    SolverStatus::Converged(ConvergenceReason::Gradient),
                    iteration,
                    evaluations,
                    cost,
                );
            }

            // Inner loop: raise damping until a step lowers the cost.
            loop {
                let step = match solve_damped_step(&jacobian, &r, &scale, damping) {
                    Some(step) => step,
                    None => {
                        damping *= cfg.damping_increase;
                        if damping > cfg.max_damping {
                            return finish(&x, SolverStatus::Stalled, iteration, evaluations, cost);
                        }
                        continue;
                    }
                };

                let step_is_small = step.norm() <= cfg.xtol * (x.norm() + cfg.xtol);
                let x_new = &x + &step;
                let r_new = DVector::from_vec(residuals(x_new.as_slice()));
                evaluations += 1;
                let cost_new = r_new.norm_squared();

                if cost_new.is_finite() && cost_new < cost {
                    let relative_reduction = (cost - cost_new) / cost;
                    x = x_new;
                    r = r_new;
                    cost = cost_new;
                    damping = (damping / cfg.damping_decrease).max(MIN_DAMPING);
                    tracing::trace!(iteration, cost, damping, "levenberg-marquardt step accepted");

                    let reason = if cost == 0.0 {
                        Some(ConvergenceReason::ExactFit)
                    } else if relative_reduction <= cfg.ftol {
                        Some(ConvergenceReason::Cost)
                    } else if step_is_small {
                        Some(ConvergenceReason::Step)
                    } else {
                        None
                    };
                    if let Some(reason) = reason {
                        return finish(&x, SolverStatus::Converged(reason), iteration, evaluations, cost);
                    }
                    break;
                }

                // Steps this small cannot move the parameters any further in
                // floating point; we are at the bottom.
                if step_is_small {
                    return finish(
                        &x,
                        SolverStatus::Converged(ConvergenceReason::Step),
                        iteration,
                        evaluations,
                        cost,
                    );
                }

                damping *= cfg.damping_increase;
                if damping > cfg.max_damping {
                    return finish(&x, SolverStatus::Stalled, iteration, evaluations, cost);
                }
            }
        }

        finish(&x, SolverStatus::MaxIterations, cfg.max_iterations, evaluations, cost)
    }
}

/// Forward-difference Jacobian of `residuals` at `x`, given `r = residuals(x)`.
fn forward_difference_jacobian<F>(residuals: &mut F, x: &DVector<f64>, r: &DVector<f64>) -> DMatrix<f64>
where
    F: FnMut(&[f64]) -> Vec<f64>,
{
    let m = r.len();
    let n = x.len();
    let eps = f64::EPSILON.sqrt();

    let mut jacobian = DMatrix::<f64>::zeros(m, n);
    let mut probe = x.clone();
    for j in 0..n {
        let h = eps * x[j].abs().max(1.0);
        probe[j] = x[j] + h;
        let shifted = residuals(probe.as_slice());
        for i in 0..m {
            jacobian[(i, j)] = (shifted[i] - r[i]) / h;
        }
        probe[j] = x[j];
    }
    jacobian
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fits_exponential_decay() {
        // y = a * exp(-k t) with a = 2.5, k = 0.7.
        let t: Vec<f64> = (0..40).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = t.iter().map(|&ti| 2.5 * (-0.7 * ti).exp()).collect();

        let solver = LevenbergMarquardt::default();
        let out = solver.minimize(
            |p| {
                t.iter()
                    .zip(&y)
                    .map(|(&ti, &yi)| p[0] * (-p[1] * ti).exp() - yi)
                    .collect()
            },
            &[1.0, 1.0],
        );

        assert!(out.status.is_success(), "status: {}", out.status);
        assert_abs_diff_eq!(out.parameters[0], 2.5, epsilon = 1e-8);
        assert_abs_diff_eq!(out.parameters[1], 0.7, epsilon = 1e-8);
        assert!(out.cost < 1e-16);
    }

    #[test]
    fn linear_problem_converges_quickly() {
        // r = p - target; one Gauss-Newton step is exact.
        let target = [3.0, -1.0, 0.5];
        let out = LevenbergMarquardt::default().minimize(
            |p| p.iter().zip(&target).map(|(a, b)| a - b).collect(),
            &[0.0, 0.0, 0.0],
        );
        assert!(out.status.is_success());
        assert!(out.iterations <= 10, "took {} iterations", out.iterations);
        for (p, t) in out.parameters.iter().zip(&target) {
            assert!((p - t).abs() < 1e-9);
        }
    }

    #[test]
    fn nan_at_start_is_reported() {
        let out = LevenbergMarquardt::default().minimize(|_| vec![f64::NAN, 1.0], &[0.0]);
        assert_eq!(out.status, SolverStatus::NonFinite);
        assert_eq!(out.parameters, vec![0.0]);
    }

    #[test]
    fn iteration_budget_is_respected() {
        let config = SolverConfig {
            max_iterations: 1,
            ..SolverConfig::default()
        };
        // Rosenbrock from the classic start point needs many iterations.
        let out = LevenbergMarquardt::new(config)
            .minimize(|p| vec![10.0 * (p[1] - p[0] * p[0]), 1.0 - p[0]], &[-1.2, 1.0]);
        assert_eq!(out.status, SolverStatus::MaxIterations);
        assert_eq!(out.iterations, 1);
    }

    #[test]
    fn counts_jacobian_evaluations() {
        let out = LevenbergMarquardt::default().minimize(|p| vec![p[0] - 1.0, p[1] + 2.0], &[0.0, 0.0]);
        // Initial call plus n Jacobian columns per iteration.
        assert!(out.evaluations >= 1 + out.iterations * 2);
    }
}
