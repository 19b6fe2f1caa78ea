use hrtf_dsp::{butterworth, BiquadCascade};

use crate::error::{Error, Result, Stage};
use crate::grid::AngleGrid;

/// The highpass removing DC and rumble.  The same filter runs over every impulse.
pub fn rumble_filter(order: u32, cutoff: f64) -> Result<BiquadCascade> {
    butterworth::highpass(order, cutoff).map_err(|e| Error::design(Stage::Rumble, e))
}

pub fn remove_rumble(grid: &AngleGrid, order: u32, cutoff: f64) -> Result<AngleGrid> {
    log::info!("Removing rumble below {cutoff} Hz with an order {order} highpass");
    let filter = rumble_filter(order, cutoff)?;
    grid.map(Stage::Rumble, |_, impulse| filter.filter(impulse))
}
