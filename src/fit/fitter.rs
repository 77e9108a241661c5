//! Fitting a `SinusoidModel` to a time series.
//!
//! Given:
//! - sample times `t_i`
//! - observed values `y_i`
//! - a model with fixed frequencies and modes
//!
//! we find the fit-parameter vector `[dc, A_1, δ_1, ...]` minimizing
//! `Σ (model(t_i) - y_i)²`, install it, and canonicalize the result
//! (amplitudes `>= 0`, phases in `[0, 2π)`).

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::fit::{ConvergenceReason, LeastSquaresSolver, SolverStatus};
use crate::math::LevenbergMarquardt;
use crate::models::SinusoidModel;
use crate::models::params::{self, check_parameter_count, parameter_count};
use crate::report::{compute_residuals, sum_of_squares};

/// Summary of a successful fit. The fitted values are also installed in the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// Canonicalized `[dc, A_1, δ_1, ...]`.
    pub parameters: Vec<f64>,
    /// Sum of squared residuals.
    pub sse: f64,
    pub rmse: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub convergence: ConvergenceReason,
}

impl SinusoidModel {
    /// Fit amplitudes, phases and DC offset with the default Levenberg–Marquardt solver.
    ///
    /// `initial_parameters` defaults to all ones.
    pub fn fit_to_data(
        &mut self,
        time: &[f64],
        data: &[f64],
        initial_parameters: Option<&[f64]>,
    ) -> Result<FitReport, ModelError> {
        self.fit_to_data_with(&LevenbergMarquardt::default(), time, data, initial_parameters)
    }

    /// Same as `fit_to_data` with a caller-chosen solver.
    ///
    /// On `FitDivergence` the model keeps the parameters it had before the call.
    pub fn fit_to_data_with<S: LeastSquaresSolver>(
        &mut self,
        solver: &S,
        time: &[f64],
        data: &[f64],
        initial_parameters: Option<&[f64]>,
    ) -> Result<FitReport, ModelError> {
        let n_params = parameter_count(self.len());
        validate_series(time, data, n_params)?;

        let initial = match initial_parameters {
            Some(p) => {
                check_parameter_count(p, self.len())?;
                p.to_vec()
            }
            None => vec![1.0; n_params],
        };

        let previous = self.fit_parameters();
        self.set_fit_parameters(&initial)?;

        tracing::debug!(
            samples = time.len(),
            parameters = n_params,
            modes = self.len(),
            "fitting sinusoid model"
        );

        // The solver probes many candidate vectors; evaluate them on a working
        // copy so `self` only ever holds the start point or the final answer.
        let mut trial = self.clone();
        let outcome = solver.minimize(
            |p| {
                if p.len() != n_params {
                    return vec![f64::NAN; time.len()];
                }
                params::install(&mut trial, p);
                time.iter().zip(data).map(|(&t, &y)| trial.value(t) - y).collect()
            },
            &initial,
        );

        let status = if outcome.parameters.iter().all(|v| v.is_finite()) {
            outcome.status
        } else {
            SolverStatus::NonFinite
        };
        let SolverStatus::Converged(convergence) = status else {
            tracing::warn!(
                %status,
                iterations = outcome.iterations,
                cost = outcome.cost,
                "sinusoid fit diverged; restoring previous parameters"
            );
            params::install(self, &previous);
            return Err(ModelError::FitDivergence {
                status,
                iterations: outcome.iterations,
            });
        };

        if let Err(err) = self.set_fit_parameters(&outcome.parameters) {
            params::install(self, &previous);
            return Err(err);
        }
        self.canonicalize();

        let sse = sum_of_squares(&compute_residuals(self, time, data)?);
        let rmse = (sse / time.len() as f64).sqrt();

        tracing::debug!(
            sse,
            rmse,
            iterations = outcome.iterations,
            evaluations = outcome.evaluations,
            "sinusoid fit converged"
        );

        Ok(FitReport {
            parameters: self.fit_parameters(),
            sse,
            rmse,
            iterations: outcome.iterations,
            evaluations: outcome.evaluations,
            convergence,
        })
    }
}

fn validate_series(time: &[f64], data: &[f64], n_params: usize) -> Result<(), ModelError> {
    if time.len() != data.len() {
        return Err(ModelError::LengthMismatch {
            time: time.len(),
            data: data.len(),
        });
    }
    if let Some(index) = time.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonFiniteInput { what: "time", index });
    }
    if let Some(index) = data.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonFiniteInput { what: "data", index });
    }
    if time.len() < n_params {
        return Err(ModelError::InsufficientData {
            samples: time.len(),
            parameters: n_params,
        });
    }
    Ok(())
}
