//! The sinusoid-combination model.
//!
//! A model is a DC offset plus one `Sinusoid` per mode. Each mode is a vector
//! of integer weights over the base frequencies; its frequency is the weighted
//! sum.
//!
//! Every mutator validates first and commits second: when a call returns an
//! error the model is exactly as it was before the call.

use serde::{Deserialize, Serialize};

use crate::domain::{IntoFrequencies, Mode, ModeExtension, ModelSnapshot};
use crate::error::ModelError;
use crate::math::canonical_amplitude_phase;
use crate::models::params;
use crate::models::Sinusoid;

/// A mode together with the sinusoid it defines.
///
/// Keeping both in one struct means the mode list and the component list can
/// never get out of step.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Component {
    pub(super) mode: Mode,
    pub(super) sinusoid: Sinusoid,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "ModelSnapshot", into = "ModelSnapshot")]
pub struct SinusoidModel {
    frequencies: Vec<f64>,
    pub(super) components: Vec<Component>,
    pub(super) dc_offset: f64,
}

impl SinusoidModel {
    /// Build a model from base frequencies and modes.
    pub fn new<F, I>(frequencies: F, modes: I) -> Result<Self, ModelError>
    where
        F: IntoFrequencies,
        I: IntoIterator,
        I::Item: Into<Mode>,
    {
        let mut model = Self::with_frequencies(frequencies);
        model.set_modes(modes)?;
        Ok(model)
    }

    /// A model with base frequencies but no modes yet.
    pub fn with_frequencies<F: IntoFrequencies>(frequencies: F) -> Self {
        Self {
            frequencies: frequencies.into_frequencies(),
            ..Self::default()
        }
    }

    /// Builder-style `set_fit_parameters`.
    pub fn with_fit_parameters(mut self, parameters: &[f64]) -> Result<Self, ModelError> {
        self.set_fit_parameters(parameters)?;
        Ok(self)
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn modes(&self) -> impl ExactSizeIterator<Item = &Mode> + '_ {
        self.components.iter().map(|c| &c.mode)
    }

    pub fn sinusoids(&self) -> impl ExactSizeIterator<Item = &Sinusoid> + '_ {
        self.components.iter().map(|c| &c.sinusoid)
    }

    /// Derived frequency of every mode, in mode order.
    pub fn mode_frequencies(&self) -> Vec<f64> {
        self.sinusoids().map(Sinusoid::frequency).collect()
    }

    /// Number of modes.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn dc_offset(&self) -> f64 {
        self.dc_offset
    }

    pub fn set_dc_offset(&mut self, dc_offset: f64) {
        self.dc_offset = dc_offset;
    }

    /// Replace the base frequencies.
    ///
    /// Existing modes are kept when that is unambiguous:
    /// - same count: modes are re-derived against the new values
    /// - more frequencies: modes are padded with zero weights
    /// - fewer frequencies: rejected; clear the modes first
    ///
    /// Any change rebuilds the components, discarding fitted amplitudes/phases.
    pub fn set_frequencies<F: IntoFrequencies>(&mut self, frequencies: F) -> Result<(), ModelError> {
        let frequencies = frequencies.into_frequencies();

        let Some(mode_len) = self.components.first().map(|c| c.mode.len()) else {
            self.frequencies = frequencies;
            return Ok(());
        };
        if frequencies.len() < mode_len {
            return Err(ModelError::FrequencyCountMismatch {
                mode_len,
                frequencies: frequencies.len(),
            });
        }

        let modes = self.components.iter().map(|c| c.mode.padded(frequencies.len()));
        let components = build_components(&frequencies, modes)?;
        self.frequencies = frequencies;
        self.components = components;
        Ok(())
    }

    /// Append one or more base frequencies.
    ///
    /// `extension` decides what happens to the current modes; see `ModeExtension`.
    pub fn add_frequency<F: IntoFrequencies>(
        &mut self,
        frequencies: F,
        extension: ModeExtension,
    ) -> Result<&mut Self, ModelError> {
        let mut all = self.frequencies.clone();
        all.extend(frequencies.into_frequencies());

        match extension {
            ModeExtension::PadWithZero => self.set_frequencies(all)?,
            ModeExtension::Clear => {
                self.frequencies = all;
                self.components.clear();
            }
        }
        Ok(self)
    }

    /// Replace every mode. An empty sequence clears them.
    ///
    /// All modes are checked before anything is replaced. On success every
    /// component starts at zero amplitude and zero phase.
    pub fn set_modes<I>(&mut self, modes: I) -> Result<(), ModelError>
    where
        I: IntoIterator,
        I::Item: Into<Mode>,
    {
        let components = build_components(&self.frequencies, modes.into_iter().map(Into::into))?;
        self.components = components;
        Ok(())
    }

    pub fn clear_modes(&mut self) {
        self.components.clear();
    }

    /// Append a single mode. Existing components keep their amplitude/phase.
    pub fn add_mode<M: Into<Mode>>(&mut self, mode: M) -> Result<&mut Self, ModelError> {
        let component = build_component(&self.frequencies, mode.into())?;
        self.components.push(component);
        Ok(self)
    }

    /// `[dc_offset, amp_1, phase_1, amp_2, phase_2, ...]`.
    pub fn fit_parameters(&self) -> Vec<f64> {
        params::pack(self)
    }

    /// Install a parameter vector laid out as in `fit_parameters`.
    ///
    /// The length must be exactly `1 + 2 * self.len()`; the number of modes
    /// never changes here.
    pub fn set_fit_parameters(&mut self, parameters: &[f64]) -> Result<(), ModelError> {
        params::check_parameter_count(parameters, self.len())?;
        params::install(self, parameters);
        Ok(())
    }

    /// Force every amplitude to be `>= 0` and every phase into `[0, 2π)`.
    ///
    /// The waveform is unchanged; the DC offset is not touched.
    pub fn canonicalize(&mut self) {
        for c in &mut self.components {
            let (amplitude, phase) = canonical_amplitude_phase(c.sinusoid.amplitude, c.sinusoid.phase);
            c.sinusoid.amplitude = amplitude;
            c.sinusoid.phase = phase;
        }
    }

    /// Model value at time `t`.
    pub fn value(&self, t: f64) -> f64 {
        let oscillating: f64 = self.components.iter().map(|c| c.sinusoid.evaluate(t)).sum();
        oscillating + self.dc_offset
    }

    /// Model value at each time in `times`.
    pub fn values(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.value(t)).collect()
    }
}

fn build_components<I>(frequencies: &[f64], modes: I) -> Result<Vec<Component>, ModelError>
where
    I: IntoIterator<Item = Mode>,
{
    modes
        .into_iter()
        .map(|mode| build_component(frequencies, mode))
        .collect()
}

fn build_component(frequencies: &[f64], mode: Mode) -> Result<Component, ModelError> {
    if mode.len() != frequencies.len() {
        return Err(ModelError::ShapeMismatch {
            mode: mode.weights().to_vec(),
            expected: frequencies.len(),
            actual: mode.len(),
        });
    }
    let frequency = mode.derived_frequency(frequencies);
    // Written so that NaN is rejected too.
    if !(frequency > 0.0) {
        return Err(ModelError::DegenerateFrequency {
            mode: mode.weights().to_vec(),
            frequency,
        });
    }
    Ok(Component {
        mode,
        sinusoid: Sinusoid::new(frequency, 0.0, 0.0),
    })
}

impl TryFrom<ModelSnapshot> for SinusoidModel {
    type Error = ModelError;

    fn try_from(snapshot: ModelSnapshot) -> Result<Self, Self::Error> {
        let mut model = SinusoidModel::new(snapshot.frequencies, snapshot.modes)?;
        if !snapshot.fit_parameters.is_empty() {
            model.set_fit_parameters(&snapshot.fit_parameters)?;
        }
        Ok(model)
    }
}

impl From<SinusoidModel> for ModelSnapshot {
    fn from(model: SinusoidModel) -> Self {
        let fit_parameters = model.fit_parameters();
        ModelSnapshot {
            modes: model.components.into_iter().map(|c| c.mode).collect(),
            frequencies: model.frequencies,
            fit_parameters,
        }
    }
}
