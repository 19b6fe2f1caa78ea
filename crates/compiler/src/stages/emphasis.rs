//! Directional emphasis: darken sources behind the listener.
//!
//! Real heads shadow high frequencies arriving from behind more than the measurements suggest once they are shortened
//! to a few dozen taps, so angles behind the listener get a gentle lowpass which deepens toward directly behind.
use hrtf_dsp::{butterworth, ButterworthDesign, DesignError};

use crate::config::EmphasisConfig;
use crate::error::{Error, Result, Stage};
use crate::grid::AngleGrid;

/// Where azimuth `index` of `count` sits relative to directly behind the listener.
///
/// 0.0 is directly behind, 1.0 directly in front, and the sides are 0.5.  Azimuth index 0 is the front.
pub fn back_relative(index: usize, count: usize) -> f64 {
    let percent = index as f64 / count as f64;
    2.0 * (0.5 - percent).abs()
}

#[derive(Clone, Debug, PartialEq)]
pub enum EmphasisDesign {
    /// The angle is in front of the threshold and passes through untouched.
    Unchanged,

    Lowpass {
        /// Stopband gain the design was asked for, in negative dB.
        stopband_gain_db: f64,
        design: ButterworthDesign,
    },
}

/// Design the emphasis filter for one angle from its [back_relative] position.
pub fn design_emphasis_lowpass(
    back_relative: f64,
    config: &EmphasisConfig,
) -> Result<EmphasisDesign, DesignError> {
    if back_relative >= config.front_threshold {
        return Ok(EmphasisDesign::Unchanged);
    }

    let scale = 1.0 - back_relative / 0.5;
    let stopband_gain_db = config.stopband_offset_db + scale * config.max_stopband_db;
    let design = butterworth::design_lowpass(
        config.passband,
        config.stopband,
        config.passband_loss_db,
        -stopband_gain_db,
    )?;

    Ok(EmphasisDesign::Lowpass {
        stopband_gain_db,
        design,
    })
}

pub fn emphasize(grid: &AngleGrid, config: &EmphasisConfig) -> Result<AngleGrid> {
    log::info!("Applying directional emphasis");
    grid.try_map(Stage::Emphasis, |pos, impulse| {
        let br = back_relative(pos.azimuth_index, pos.azimuth_count);
        match design_emphasis_lowpass(br, config).map_err(|e| Error::design(Stage::Emphasis, e))? {
            EmphasisDesign::Unchanged => Ok(impulse.to_vec()),
            EmphasisDesign::Lowpass {
                stopband_gain_db,
                design,
            } => {
                log::trace!(
                    "Elevation {} azimuth {}: back relative {br:.3}, stopband {stopband_gain_db:.3} dB, order {} cutoff {:.1} Hz",
                    pos.elevation,
                    pos.azimuth,
                    design.order,
                    design.cutoff
                );
                Ok(design.filter.filter(impulse))
            }
        }
    })
}
