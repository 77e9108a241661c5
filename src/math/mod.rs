//! Numerical building blocks: Levenberg–Marquardt, linear least squares and
//! phase arithmetic.

pub mod lm;
pub mod ols;
pub mod phase;

pub use lm::*;
pub use ols::*;
pub use phase::*;
