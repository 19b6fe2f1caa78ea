//! Biquad filters, primarily from the [Audio Eq Cookbook](https://www.w3.org/TR/audio-eq-cookbook/).
//!
//! This module also offers first-order sections by setting the later coefficients in the biquad to 0, and cascades of
//! sections for higher-order designs (see [crate::butterworth]).
use std::f64::consts::PI;

use num::complex::Complex64;

use crate::config::*;

/// A 1-channnel biquad filter.
///
/// Implements the transfer function `(b0 + b1 z^-1 + b2 z^-2) / (a0 + a1 z^-1 + a2 z^-2)`, factored so that `a0` and
/// `b0` are always 1 and pulled out into a gain factor.
#[derive(Debug, Clone)]
pub struct MonoBiquadFilter {
    def: BiquadFilterDef,

    // The history of the recursive part, most recent first.
    history: [f64; 2],
}

/// A definition for a biquad filter.
#[derive(Debug, Clone, PartialEq)]
pub struct BiquadFilterDef {
    gain: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl MonoBiquadFilter {
    pub fn new(def: BiquadFilterDef) -> MonoBiquadFilter {
        MonoBiquadFilter {
            def,
            history: [0.0; 2],
        }
    }

    /// Tick this filter by 1 sample.
    pub fn tick(&mut self, input_sample: f64) -> f64 {
        // direct form 2: do the recursive part first, then convolve the numerator using only the denominator history
        // rather than having two histories.
        //
        // Put the gain in first.
        let with_gain = input_sample * self.def.gain;
        let recursive = with_gain - self.def.a1 * self.history[0] - self.def.a2 * self.history[1];
        let out = recursive + self.def.b1 * self.history[0] + self.def.b2 * self.history[1];
        self.history[1] = self.history[0];
        self.history[0] = recursive;
        out
    }
}

// Some helpers which compute common variables from the Audio EQ cookbook.
fn bq_omega0(freq: f64) -> f64 {
    2.0 * PI * freq / (SR as f64)
}

fn bq_alpha_q(omega0: f64, q: f64) -> f64 {
    omega0.sin() / (2.0 * q)
}

/// The prewarped analog frequency of the bilinear transform, `tan(pi * f / sr)`.
pub(crate) fn prewarp(freq: f64) -> f64 {
    (PI * freq / SR as f64).tan()
}

/// Kinds of thing which can be used for defining the "Q" of a filter.
///
/// The Audio EQ cookbook defines 3 possibilities, `Q`, `BW` and `S`.  Butterworth sections are specified by `Q`, which
/// is all the designs here need; the others can be added as variants when something wants them.
#[derive(Debug, Copy, Clone)]
pub enum AudioEqAlpha {
    Q(f64),
}

impl AudioEqAlpha {
    fn compute_alpha(&self, omega0: f64) -> f64 {
        match self {
            Self::Q(q) => bq_alpha_q(omega0, *q),
        }
    }
}

impl BiquadFilterDef {
    pub fn new_raw(b: [f64; 3], a: [f64; 3]) -> Self {
        let gain = b[0] / a[0];

        let b1 = b[1] / b[0];
        let b2 = b[2] / b[0];
        let a1 = a[1] / a[0];
        let a2 = a[2] / a[0];
        Self {
            gain,
            b1,
            b2,
            a1,
            a2,
        }
    }

    /// Lowpass Audio Eq Biquad, specifying frequency in hz.
    pub fn audio_eq_lowpass(frequency: f64, alpha: AudioEqAlpha) -> Self {
        let omega0 = bq_omega0(frequency);
        let b1 = 1.0 - omega0.cos();
        let b0 = b1 / 2.0f64;
        let b2 = b0;
        let alpha = alpha.compute_alpha(omega0);
        let a0 = 1.0f64 + alpha;
        let a1 = -2.0 * omega0.cos();
        let a2 = 1.0 - alpha;
        Self::new_raw([b0, b1, b2], [a0, a1, a2])
    }

    /// The highpass filter from the Audio Eq Cookbook
    pub fn audio_eq_highpass(frequency: f64, alpha: AudioEqAlpha) -> Self {
        let omega0 = bq_omega0(frequency);
        let shared = 1.0f64 + omega0.cos();
        let b0 = shared / 2.0;
        let b1 = -shared;
        let b2 = b0;
        let alpha = alpha.compute_alpha(omega0);
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * omega0.cos();
        let a2 = 1.0 - alpha;
        Self::new_raw([b0, b1, b2], [a0, a1, a2])
    }

    /// First-order lowpass: the bilinear transform of `1 / (s + 1)`, prewarped to `frequency`.
    pub fn first_order_lowpass(frequency: f64) -> Self {
        let k = prewarp(frequency);
        Self::new_raw([k, k, 0.0], [1.0 + k, k - 1.0, 0.0])
    }

    /// First-order highpass: the bilinear transform of `s / (s + 1)`, prewarped to `frequency`.
    pub fn first_order_highpass(frequency: f64) -> Self {
        let k = prewarp(frequency);
        Self::new_raw([1.0, -1.0, 0.0], [1.0 + k, k - 1.0, 0.0])
    }

    /// Get the frequency response of this filter as a complex number, given a frequency in hZ.
    pub fn frequency_response(&self, frequency: f64) -> Complex64 {
        let omega = bq_omega0(frequency);
        let z_inv = 1.0 / (Complex64::i() * omega).exp();

        self.gain * (1.0 + self.b1 * z_inv + self.b2 * z_inv.powu(2))
            / (1.0 + self.a1 * z_inv + self.a2 * z_inv.powu(2))
    }
}

/// A chain of biquad sections run one after the other.
///
/// This is how higher order filters are realized: one long transfer function is numerically fragile, but a product of
/// second-order sections is not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiquadCascade {
    sections: Vec<BiquadFilterDef>,
}

impl BiquadCascade {
    pub fn new(sections: Vec<BiquadFilterDef>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[BiquadFilterDef] {
        &self.sections
    }

    /// Run `input` through every section from a zeroed state, producing an output of the same length.
    pub fn filter(&self, input: &[f64]) -> Vec<f64> {
        let mut out = input.to_vec();
        for def in self.sections.iter() {
            let mut filt = MonoBiquadFilter::new(def.clone());
            for s in out.iter_mut() {
                *s = filt.tick(*s);
            }
        }
        out
    }

    pub fn frequency_response(&self, frequency: f64) -> Complex64 {
        self.sections
            .iter()
            .map(|s| s.frequency_response(frequency))
            .product()
    }
}

impl From<BiquadFilterDef> for BiquadCascade {
    fn from(value: BiquadFilterDef) -> Self {
        Self::new(vec![value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{close_floats::*, DbExt};

    /// Makes the lowpass and highpass second-order Butterworth sections.
    const DEFAULT_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_lowpass_design() {
        let filt = BiquadFilterDef::audio_eq_lowpass(10000.0, AudioEqAlpha::Q(DEFAULT_Q));
        close_floats64(
            filt.frequency_response(10000.0).norm().gain_to_db(),
            -3.0,
            0.02,
        );

        close_floats64(
            filt.frequency_response(1000.0).norm().gain_to_db(),
            0.0,
            0.02,
        );

        close_floats64(
            filt.frequency_response(20000.0).norm().gain_to_db(),
            -35.84,
            0.02,
        );
    }

    #[test]
    fn test_highpass_design() {
        let filt = BiquadFilterDef::audio_eq_highpass(10000.0, AudioEqAlpha::Q(DEFAULT_Q));
        close_floats64(
            filt.frequency_response(10000.0).norm().gain_to_db(),
            -3.0,
            0.02,
        );

        close_floats64(
            filt.frequency_response(20000.0).norm().gain_to_db(),
            0.0,
            0.02,
        );

        close_floats64(
            filt.frequency_response(1000.0).norm().gain_to_db(),
            -43.31,
            0.02,
        );
    }

    #[test]
    fn test_first_order_sections() {
        let lp = BiquadFilterDef::first_order_lowpass(1000.0);
        close_floats64(lp.frequency_response(0.0).norm(), 1.0, 1e-9);
        close_floats64(lp.frequency_response(1000.0).norm().gain_to_db(), -3.01, 0.01);
        assert!(lp.frequency_response(NYQUIST as f64).norm() < 1e-9);

        let hp = BiquadFilterDef::first_order_highpass(1000.0);
        assert!(hp.frequency_response(0.0).norm() < 1e-9);
        close_floats64(hp.frequency_response(1000.0).norm().gain_to_db(), -3.01, 0.01);
        close_floats64(hp.frequency_response(NYQUIST as f64).norm(), 1.0, 1e-9);
    }

    /// The impulse response of a lowpass sums to its DC gain, which must match the analytic response.
    #[test]
    fn test_tick_matches_response() {
        let filt = BiquadFilterDef::audio_eq_lowpass(2000.0, AudioEqAlpha::Q(DEFAULT_Q));
        let mut impulse = vec![0.0; 4096];
        impulse[0] = 1.0;
        let out = BiquadCascade::from(filt.clone()).filter(&impulse);
        close_floats64(out.iter().sum::<f64>(), filt.frequency_response(0.0).re, 1e-6);
    }

    #[test]
    fn test_highpass_removes_dc() {
        let filt = BiquadCascade::from(BiquadFilterDef::audio_eq_highpass(
            100.0,
            AudioEqAlpha::Q(DEFAULT_Q),
        ));
        let out = filt.filter(&vec![1.0; SR as usize]);
        assert_eq!(out.len(), SR as usize);
        // The first sample passes through at the section's gain; the tail settles to nothing.
        assert!(out[0] > 0.9);
        assert!(out[SR as usize - 1].abs() < 1e-6);
    }

    #[test]
    fn test_cascade_response_is_product() {
        let a = BiquadFilterDef::audio_eq_lowpass(5000.0, AudioEqAlpha::Q(0.54));
        let b = BiquadFilterDef::audio_eq_lowpass(5000.0, AudioEqAlpha::Q(1.31));
        let cascade = BiquadCascade::new(vec![a.clone(), b.clone()]);
        let expected = a.frequency_response(3000.0) * b.frequency_response(3000.0);
        let got = cascade.frequency_response(3000.0);
        close_floats64(got.re, expected.re, 1e-12);
        close_floats64(got.im, expected.im, 1e-12);
    }
}
