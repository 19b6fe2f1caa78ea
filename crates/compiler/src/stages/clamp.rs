use crate::error::{Result, Stage};
use crate::grid::AngleGrid;

/// Bound every magnitude to `[min_gain, max_gain]`.
pub fn clamp(grid: &AngleGrid, min_gain: f64, max_gain: f64) -> Result<AngleGrid> {
    log::info!("Clamping magnitudes to [{min_gain}, {max_gain}]");
    grid.map(Stage::Clamp, |_, mag| {
        mag.iter().map(|x| x.clamp(min_gain, max_gain)).collect()
    })
}
