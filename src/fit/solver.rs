//! The boundary between the model and a nonlinear least-squares routine.
//!
//! The fitter only needs `minimize(residuals, initial) -> outcome`; keeping
//! that behind a trait lets packing and canonicalization be tested with a
//! scripted solver, and lets callers bring their own optimizer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a solver stopped successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceReason {
    /// Relative reduction of the sum of squares fell below `ftol`.
    Cost,
    /// Relative step size fell below `xtol`.
    Step,
    /// Largest gradient component fell below `gtol`.
    Gradient,
    /// Residuals are exactly zero.
    ExactFit,
}

/// Terminal state of a minimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    Converged(ConvergenceReason),
    /// Iteration budget exhausted before any convergence test passed.
    MaxIterations,
    /// Damping grew past its limit without finding a downhill step.
    Stalled,
    /// The residual function produced NaN/inf at the starting point.
    NonFinite,
}

impl SolverStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, SolverStatus::Converged(_))
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverStatus::Converged(ConvergenceReason::Cost) => write!(f, "converged on cost"),
            SolverStatus::Converged(ConvergenceReason::Step) => write!(f, "converged on step size"),
            SolverStatus::Converged(ConvergenceReason::Gradient) => write!(f, "converged on gradient"),
            SolverStatus::Converged(ConvergenceReason::ExactFit) => write!(f, "exact fit"),
            SolverStatus::MaxIterations => write!(f, "iteration limit reached"),
            SolverStatus::Stalled => write!(f, "no downhill step found"),
            SolverStatus::NonFinite => write!(f, "non-finite residuals"),
        }
    }
}

/// What a solver hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub parameters: Vec<f64>,
    pub status: SolverStatus,
    pub iterations: usize,
    /// Number of residual-function calls, including Jacobian columns.
    pub evaluations: usize,
    /// Sum of squared residuals at `parameters`.
    pub cost: f64,
}

/// A nonlinear least-squares routine.
///
/// `residuals` maps a parameter vector to a residual vector of fixed length.
/// Implementations must return parameters of the same length as `initial`.
pub trait LeastSquaresSolver {
    fn minimize<F>(&self, residuals: F, initial: &[f64]) -> SolverOutcome
    where
        F: FnMut(&[f64]) -> Vec<f64>;
}

/// Stopping criteria and damping schedule for `LevenbergMarquardt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub max_iterations: usize,
    /// Relative cost reduction that counts as converged.
    pub ftol: f64,
    /// Relative step length that counts as converged.
    pub xtol: f64,
    /// Max-norm of the gradient `Jᵀr` that counts as converged.
    pub gtol: f64,
    pub initial_damping: f64,
    pub damping_increase: f64,
    pub damping_decrease: f64,
    pub max_damping: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            ftol: 1e-12,
            xtol: 1e-12,
            gtol: 1e-14,
            initial_damping: 1e-3,
            damping_increase: 10.0,
            damping_decrease: 10.0,
            max_damping: 1e20,
        }
    }
}
