//! Minimum-phase reconstruction from a magnitude spectrum.
//!
//! The phase of a minimum-phase filter is the negated Hilbert transform of its log-magnitude.  We compute the Hilbert
//! transform over the (periodic, conjugate-symmetric) frequency bins with the analytic-signal construction: transform,
//! double the positive half, drop the negative half, transform back, take the imaginary part.  The spectrum
//! `magnitude * exp(-i * hilbert(ln magnitude))` is then conjugate-symmetric, and the real part of its inverse transform
//! is the impulse response.
//!
//! This is equivalent to folding the real cepstrum and avoids tracking a separate cepstral buffer.  The only error is
//! cepstral aliasing, which is negligible at the transform sizes used here.
use num::complex::Complex64;

use crate::fft::FftPair;

/// Default floor applied to magnitudes before taking their logarithm.
pub const DEFAULT_EPSILON: f64 = 1e-6;

#[derive(Clone, Debug)]
pub struct MinimumPhase {
    fft: FftPair,
    epsilon: f64,
}

impl MinimumPhase {
    pub fn new(size: usize, epsilon: f64) -> Self {
        assert!(epsilon > 0.0, "The magnitude floor must be positive");
        Self {
            fft: FftPair::new(size),
            epsilon,
        }
    }

    pub fn size(&self) -> usize {
        self.fft.size()
    }

    /// Discrete Hilbert transform of a periodic sequence of the transform size.
    pub fn hilbert(&self, input: &[f64]) -> Vec<f64> {
        let size = self.size();
        assert_eq!(input.len(), size);

        let mut buffer = input
            .iter()
            .map(|x| Complex64::new(*x, 0.0))
            .collect::<Vec<_>>();
        self.fft.forward_in_place(&mut buffer);

        // DC (and Nyquist, for even sizes) are kept as-is; the rest of the positive half doubles and the negative half
        // goes away.
        let positive_end = size.div_ceil(2);
        for x in buffer[1..positive_end].iter_mut() {
            *x *= 2.0;
        }
        for x in buffer[size / 2 + 1..].iter_mut() {
            *x = Complex64::new(0.0, 0.0);
        }

        self.fft.inverse_in_place(&mut buffer);
        buffer.into_iter().map(|x| x.im).collect()
    }

    /// The minimum-phase spectrum for the given magnitudes.
    ///
    /// Magnitudes are floored at the epsilon first.  The phase at DC and Nyquist is forced to exactly zero, so those
    /// bins are purely real.
    pub fn spectrum(&self, magnitude: &[f64]) -> Vec<Complex64> {
        let size = self.size();
        assert_eq!(magnitude.len(), size);

        let floored = magnitude
            .iter()
            .map(|m| m.max(self.epsilon))
            .collect::<Vec<_>>();
        let log_mag = floored.iter().map(|m| m.ln()).collect::<Vec<_>>();
        let mut phase = self.hilbert(&log_mag);

        phase[0] = 0.0;
        if size % 2 == 0 {
            phase[size / 2] = 0.0;
        }

        floored
            .iter()
            .zip(phase.iter())
            .map(|(m, p)| *m * (Complex64::i() * -*p).exp())
            .collect()
    }

    /// Reconstruct a real minimum-phase impulse response of the transform size from a magnitude spectrum.
    pub fn reconstruct(&self, magnitude: &[f64]) -> Vec<f64> {
        let mut spectrum = self.spectrum(magnitude);
        self.fft.inverse_in_place(&mut spectrum);
        spectrum.into_iter().map(|x| x.re).collect()
    }
}
