//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - define the solver boundary (`LeastSquaresSolver`, `SolverConfig`)
//! - run a fit against time-series data and canonicalize the result

pub mod fitter;
pub mod solver;

pub use fitter::*;
pub use solver::*;
