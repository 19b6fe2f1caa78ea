use hrtf_dsp::window::blackman_harris_tail;

use crate::error::{Result, Stage};
use crate::grid::AngleGrid;

/// Shorten one impulse to `window.len()` samples, tapering it with `window`.  Short impulses are zero-padded.
pub fn truncate_one(impulse: &[f64], window: &[f64]) -> Vec<f64> {
    let mut out = impulse
        .iter()
        .zip(window.iter())
        .map(|(x, w)| x * w)
        .collect::<Vec<_>>();
    out.resize(window.len(), 0.0);
    out
}

/// Shorten every impulse to `length` samples, fading the end out with the tail of a Blackman-Harris window.
pub fn truncate(grid: &AngleGrid, length: usize) -> Result<AngleGrid> {
    log::info!("Truncating impulses to {length} samples");
    let window = blackman_harris_tail(length);
    grid.map(Stage::Truncate, |_, impulse| truncate_one(impulse, &window))
}
