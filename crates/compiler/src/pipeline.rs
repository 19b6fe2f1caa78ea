//! Running the stages in order.
use crate::config::{EmphasisPlacement, PipelineConfig};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::grid::AngleGrid;
use crate::hrtf_data::HrtfData;
use crate::stages;

/// Compile a loaded dataset.
///
/// Each stage replaces the grid with a new one; the previous grid is dropped as soon as the next exists, since at the
/// analysis length every grid of a real dataset is hundreds of megabytes.
pub fn compile(dataset: &Dataset, config: &PipelineConfig) -> Result<HrtfData> {
    config.validate()?;

    let mut grid = AngleGrid::from_dataset(dataset);
    log::info!("DC after loading: {}", grid.dc());

    grid = stages::analyze(&grid)?;
    grid = stages::equalize(&grid, config.equalization_cutoff)?;
    grid = stages::clamp(&grid, config.min_gain, config.max_gain)?;
    grid = stages::synthesize_minimum_phase(&grid, config.min_phase_epsilon)?;
    log::info!("DC after minimum phase conversion: {}", grid.dc());

    grid = stages::remove_rumble(&grid, config.rumble_order, config.rumble_cutoff)?;

    match config.emphasis_placement {
        EmphasisPlacement::BeforeTruncation => {
            grid = stages::emphasize(&grid, &config.emphasis)?;
            grid = stages::truncate(&grid, config.final_length)?;
        }
        EmphasisPlacement::AfterTruncation => {
            grid = stages::truncate(&grid, config.final_length)?;
            grid = stages::emphasize(&grid, &config.emphasis)?;
        }
    }
    log::info!("DC after truncation: {}", grid.dc());

    Ok(HrtfData::assemble(dataset.metadata(), grid))
}
