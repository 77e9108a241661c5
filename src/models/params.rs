//! Flat fit-parameter vector packing.
//!
//! Layout (the only one used anywhere in the crate):
//!
//! ```text
//! [dc_offset, amplitude_1, phase_1, amplitude_2, phase_2, ..., amplitude_n, phase_n]
//! ```
//!
//! with components in mode order, so the length is always `1 + 2n`.

use crate::error::ModelError;
use crate::models::SinusoidModel;

/// Length of the parameter vector for a model with `modes` modes.
pub fn parameter_count(modes: usize) -> usize {
    1 + 2 * modes
}

/// Check that `parameters` fits a model with `modes` modes.
///
/// An odd number of entries after the DC slot is reported separately from a
/// plain length mismatch, since it can never be valid for any model.
pub fn check_parameter_count(parameters: &[f64], modes: usize) -> Result<(), ModelError> {
    let expected = parameter_count(modes);
    if parameters.is_empty() {
        return Err(ModelError::ParameterCountMismatch { expected, actual: 0 });
    }
    if (parameters.len() - 1) % 2 == 1 {
        return Err(ModelError::OddParameterCount { len: parameters.len() });
    }
    if parameters.len() != expected {
        return Err(ModelError::ParameterCountMismatch {
            expected,
            actual: parameters.len(),
        });
    }
    Ok(())
}

/// Read the parameter vector out of `model`.
pub fn pack(model: &SinusoidModel) -> Vec<f64> {
    let mut out = Vec::with_capacity(parameter_count(model.len()));
    out.push(model.dc_offset);
    for c in &model.components {
        out.push(c.sinusoid.amplitude);
        out.push(c.sinusoid.phase);
    }
    out
}

/// Copy of `model` with `parameters` installed.
pub fn unpack(model: &SinusoidModel, parameters: &[f64]) -> Result<SinusoidModel, ModelError> {
    check_parameter_count(parameters, model.len())?;
    let mut out = model.clone();
    install(&mut out, parameters);
    Ok(out)
}

/// Write `parameters` into `model` in place.
///
/// Callers must have run `check_parameter_count` first.
pub(crate) fn install(model: &mut SinusoidModel, parameters: &[f64]) {
    debug_assert_eq!(parameters.len(), parameter_count(model.len()));
    model.dc_offset = parameters[0];
    for (c, pair) in model.components.iter_mut().zip(parameters[1..].chunks_exact(2)) {
        c.sinusoid.amplitude = pair[0];
        c.sinusoid.phase = pair[1];
    }
}
