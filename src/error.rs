//! Error type shared by the model, the fitter and the synthetic data generator.

use thiserror::Error;

use crate::fit::SolverStatus;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A mode has a different number of weights than there are base frequencies.
    #[error("mode {mode:?} has {actual} weights but the model has {expected} frequencies")]
    ShapeMismatch {
        mode: Vec<i32>,
        expected: usize,
        actual: usize,
    },

    /// A mode's derived frequency (weights · frequencies) is zero, negative or NaN.
    #[error("mode {mode:?} has non-positive derived frequency {frequency}")]
    DegenerateFrequency { mode: Vec<i32>, frequency: f64 },

    /// New base frequencies are fewer than the weights of the existing modes.
    #[error(
        "modes have {mode_len} components but {frequencies} frequencies were given; \
         clear the modes before removing frequencies"
    )]
    FrequencyCountMismatch { mode_len: usize, frequencies: usize },

    /// The parameter vector has an odd number of entries after the DC slot.
    #[error("fit parameters must be one DC offset plus amplitude/phase pairs, got {len} values")]
    OddParameterCount { len: usize },

    #[error("expected {expected} fit parameters, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    #[error("time has {time} samples but data has {data}")]
    LengthMismatch { time: usize, data: usize },

    #[error("non-finite {what} value at index {index}")]
    NonFiniteInput { what: &'static str, index: usize },

    /// Fewer samples than free parameters.
    #[error("{samples} samples cannot determine {parameters} parameters")]
    InsufficientData { samples: usize, parameters: usize },

    #[error("fit did not converge after {iterations} iterations ({status})")]
    FitDivergence {
        status: SolverStatus,
        iterations: usize,
    },

    #[error("invalid sample configuration: {0}")]
    InvalidSampleConfig(String),
}

impl ModelError {
    /// `true` for every error caused by caller input rather than by the solver.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ModelError::FitDivergence { .. })
    }
}
