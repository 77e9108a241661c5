//! Shared domain types.
//!
//! These types are small and serializable so they can be:
//!
//! - used in-memory while building and fitting a model
//! - saved as part of a `ModelSnapshot` and reloaded later

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer weights over the base frequencies.
///
/// A mode `[1, 0, 2]` on base frequencies `[f0, f1, f2]` describes a component
/// at `f0 + 2·f2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mode(Vec<i32>);

impl Mode {
    pub fn new(weights: Vec<i32>) -> Self {
        Self(weights)
    }

    pub fn weights(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dot product of the weights with `frequencies`.
    ///
    /// Callers must check that the lengths match; extra entries on either side
    /// are ignored.
    pub fn derived_frequency(&self, frequencies: &[f64]) -> f64 {
        self.0
            .iter()
            .zip(frequencies)
            .map(|(&w, &f)| f64::from(w) * f)
            .sum()
    }

    /// Copy of this mode with zero weights appended up to `len`.
    pub(crate) fn padded(&self, len: usize) -> Mode {
        let mut weights = self.0.clone();
        weights.resize(len.max(weights.len()), 0);
        Mode(weights)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<Vec<i32>> for Mode {
    fn from(weights: Vec<i32>) -> Self {
        Mode(weights)
    }
}

impl From<&[i32]> for Mode {
    fn from(weights: &[i32]) -> Self {
        Mode(weights.to_vec())
    }
}

impl<const N: usize> From<[i32; N]> for Mode {
    fn from(weights: [i32; N]) -> Self {
        Mode(weights.to_vec())
    }
}

impl From<&Mode> for Mode {
    fn from(mode: &Mode) -> Self {
        mode.clone()
    }
}

/// What happens to existing modes when base frequencies are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeExtension {
    /// Keep every mode and give the new frequencies a weight of zero.
    #[default]
    PadWithZero,
    /// Drop all modes (and with them every fitted component).
    Clear,
}

/// Anything that can stand for an ordered list of base frequencies.
///
/// A bare `f64` is a single-element list.
pub trait IntoFrequencies {
    fn into_frequencies(self) -> Vec<f64>;
}

impl IntoFrequencies for f64 {
    fn into_frequencies(self) -> Vec<f64> {
        vec![self]
    }
}

impl IntoFrequencies for Vec<f64> {
    fn into_frequencies(self) -> Vec<f64> {
        self
    }
}

impl IntoFrequencies for &Vec<f64> {
    fn into_frequencies(self) -> Vec<f64> {
        self.clone()
    }
}

impl IntoFrequencies for &[f64] {
    fn into_frequencies(self) -> Vec<f64> {
        self.to_vec()
    }
}

impl<const N: usize> IntoFrequencies for [f64; N] {
    fn into_frequencies(self) -> Vec<f64> {
        self.to_vec()
    }
}

impl<const N: usize> IntoFrequencies for &[f64; N] {
    fn into_frequencies(self) -> Vec<f64> {
        self.to_vec()
    }
}

/// Serialized form of a `SinusoidModel`.
///
/// Deserializing goes through the same validation as building a model by hand,
/// so a snapshot with a bad mode is rejected rather than loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub frequencies: Vec<f64>,
    #[serde(default)]
    pub modes: Vec<Mode>,
    /// `[dc_offset, amp_1, phase_1, ...]`; empty means "not fitted yet".
    #[serde(default)]
    pub fit_parameters: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_frequency_is_weighted_sum() {
        let mode = Mode::from([1, 0, 2]);
        let f = mode.derived_frequency(&[1.1, 1.7, 3.5]);
        assert!((f - (1.1 + 7.0)).abs() < 1e-12, "got {f}");
    }

    #[test]
    fn negative_weights_can_cancel() {
        let mode = Mode::from([1, -1]);
        assert_eq!(mode.derived_frequency(&[2.0, 2.0]), 0.0);
    }

    #[test]
    fn padding_appends_zero_weights() {
        let mode = Mode::from([1, 1]);
        assert_eq!(mode.padded(4).weights(), &[1, 1, 0, 0]);
        // Never truncates.
        assert_eq!(mode.padded(1).weights(), &[1, 1]);
    }

    #[test]
    fn scalar_is_single_frequency() {
        assert_eq!(2.5_f64.into_frequencies(), vec![2.5]);
        assert_eq!([1.0_f64, 2.0].into_frequencies(), vec![1.0, 2.0]);
    }
}
