//! The sinusoid-combination model.
//!
//! - `sinusoid`: one component and its evaluator
//! - `model`: frequencies, modes, DC offset and evaluation
//! - `params`: the flat fit-parameter vector

pub mod model;
pub mod params;
pub mod sinusoid;

pub use model::*;
pub use sinusoid::*;
