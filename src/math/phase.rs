//! Phase arithmetic for sinusoid parameters.
//!
//! Amplitude sign and phase are degenerate: `A sin(x) = -A sin(x + π)`, and a
//! phase is only defined modulo `2π`. After a fit we pick one representative:
//! amplitude `>= 0` and phase in `[0, 2π)`.

use std::f64::consts::{PI, TAU};

/// Wrap `phase` into `[0, 2π)`.
///
/// Non-finite input is returned unchanged.
pub fn wrap_phase(phase: f64) -> f64 {
    if !phase.is_finite() {
        return phase;
    }
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid can round a tiny negative input up to exactly TAU.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Canonical `(amplitude, phase)` for a component.
pub fn canonical_amplitude_phase(amplitude: f64, phase: f64) -> (f64, f64) {
    if amplitude < 0.0 {
        (-amplitude, wrap_phase(phase + PI))
    } else {
        (amplitude, wrap_phase(phase))
    }
}

/// Smallest absolute angle between two phases, in `[0, π]`.
pub fn phase_distance(a: f64, b: f64) -> f64 {
    let d = wrap_phase(a - b);
    d.min(TAU - d)
}
