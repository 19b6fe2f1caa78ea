//! Signal processing primitives for compiling HRTF datasets.
//!
//! Everything here runs offline at the fixed sample rate [SR], in `f64`.  The compiler crate strings these together
//! into its pipeline; nothing in this crate knows about elevations or azimuths.
pub mod biquad;
pub mod butterworth;
#[doc(hidden)]
pub mod close_floats;
mod config;
mod db;
pub mod fft;
pub mod min_phase;
pub mod window;

pub use biquad::{AudioEqAlpha, BiquadCascade, BiquadFilterDef, MonoBiquadFilter};
pub use butterworth::{ButterworthDesign, DesignError};
pub use config::*;
pub use db::DbExt;
pub use fft::FftPair;
pub use min_phase::MinimumPhase;
