//! Reporting utilities: per-sample residuals and formatted output.

pub mod format;

pub use format::*;

use crate::error::ModelError;
use crate::models::SinusoidModel;

/// `model(t_i) - y_i` for every sample.
pub fn compute_residuals(model: &SinusoidModel, time: &[f64], data: &[f64]) -> Result<Vec<f64>, ModelError> {
    if time.len() != data.len() {
        return Err(ModelError::LengthMismatch {
            time: time.len(),
            data: data.len(),
        });
    }
    Ok(time.iter().zip(data).map(|(&t, &y)| model.value(t) - y).collect())
}

/// Sum of squared residuals.
pub fn sum_of_squares(residuals: &[f64]) -> f64 {
    residuals.iter().map(|r| r * r).sum()
}
