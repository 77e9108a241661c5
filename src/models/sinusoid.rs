//! A single sinusoidal component `A sin(2π f t + δ)`.

use std::f64::consts::TAU;
use std::fmt;

/// One sinusoid.
///
/// `frequency` is in Hz (not angular). Nothing here is validated: the owning
/// model checks mode frequencies before it builds components.
#[derive(Debug, Clone, PartialEq)]
pub struct Sinusoid {
    frequency: f64,
    pub amplitude: f64,
    /// Radians.
    pub phase: f64,
    angular_frequency: f64,
}

impl Sinusoid {
    pub fn new(frequency: f64, amplitude: f64, phase: f64) -> Self {
        Self {
            frequency,
            amplitude,
            phase,
            angular_frequency: TAU * frequency,
        }
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// `2π · frequency`, computed once at construction.
    pub fn angular_frequency(&self) -> f64 {
        self.angular_frequency
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        self.amplitude * (self.angular_frequency * t + self.phase).sin()
    }

    pub fn evaluate_many(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.evaluate(t)).collect()
    }
}

impl fmt::Display for Sinusoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sin(2π {} t + {})", self.amplitude, self.frequency, self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn evaluate_matches_closed_form_exactly() {
        let (freq, ampl, phase) = (2.1, 1.4, PI / 3.0);
        let s = Sinusoid::new(freq, ampl, phase);

        let n = 1000;
        let (lo, hi) = (-2.0 / freq, 3.0 * freq);
        for i in 0..n {
            let t = lo + (hi - lo) * i as f64 / (n - 1) as f64;
            let expected = ampl * (2.0 * PI * freq * t + phase).sin();
            assert_eq!(s.evaluate(t), expected, "mismatch at t = {t}");
        }
    }

    #[test]
    fn evaluate_many_is_elementwise() {
        let s = Sinusoid::new(0.5, 2.0, 0.1);
        let times = [0.0, 0.25, 1.0, -3.5];
        let values = s.evaluate_many(&times);
        assert_eq!(values.len(), times.len());
        for (v, &t) in values.iter().zip(&times) {
            assert_eq!(*v, s.evaluate(t));
        }
    }

    #[test]
    fn angular_frequency_is_cached() {
        let s = Sinusoid::new(1.5, 0.0, 0.0);
        assert_eq!(s.angular_frequency(), 2.0 * PI * 1.5);
    }

    #[test]
    fn display_shows_all_parameters() {
        let s = Sinusoid::new(1.5, 0.5, 1.0);
        assert_eq!(s.to_string(), "0.5 sin(2π 1.5 t + 1)");
    }
}
