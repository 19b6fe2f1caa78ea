//! FFT helpers built on rustfft.
//!
//! Plans are made once and shared; rustfft plans are `Send + Sync`, so one [FftPair] can be handed to every worker of a
//! parallel map.
use std::sync::Arc;

use num::complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// A forward and inverse transform of one fixed size.
#[derive(Clone)]
pub struct FftPair {
    size: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for FftPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftPair").field("size", &self.size).finish()
    }
}

impl FftPair {
    /// Plan transforms of the given size.
    ///
    /// # Panics
    ///
    /// If `size` is 0.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Transforms must have at least one point");
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        Self {
            size,
            forward,
            inverse,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of a real signal.
    ///
    /// Shorter inputs are zero-padded to the transform size, longer ones truncated to it.
    pub fn forward_real(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer = input
            .iter()
            .take(self.size)
            .map(|x| Complex64::new(*x, 0.0))
            .collect::<Vec<_>>();
        buffer.resize(self.size, Complex64::new(0.0, 0.0));
        self.forward.process(&mut buffer);
        buffer
    }

    /// In-place forward transform.  The buffer must be exactly the transform size.
    pub fn forward_in_place(&self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.size);
        self.forward.process(buffer);
    }

    /// In-place inverse transform, normalized by `1 / size` so that it undoes [FftPair::forward_in_place].
    pub fn inverse_in_place(&self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.size);
        self.inverse.process(buffer);
        let norm = 1.0 / self.size as f64;
        for x in buffer.iter_mut() {
            *x *= norm;
        }
    }

    /// Magnitude of the forward transform, one entry per bin including the mirrored half above Nyquist.
    pub fn magnitude_response(&self, input: &[f64]) -> Vec<f64> {
        self.forward_real(input).into_iter().map(|x| x.norm()).collect()
    }
}
