use hrtf_dsp::FftPair;

use crate::error::{Result, Stage};
use crate::grid::AngleGrid;

/// Transform size of the analysis: one bin per Hz.
pub const ANALYSIS_SIZE: usize = hrtf_dsp::SR as usize;

/// Replace every recording with the magnitude of its spectrum.
///
/// The output has [ANALYSIS_SIZE] bins including the mirrored half above Nyquist, whatever the length of the recordings.
pub fn analyze(grid: &AngleGrid) -> Result<AngleGrid> {
    log::info!(
        "Computing {}-point magnitude spectra of {} recordings",
        ANALYSIS_SIZE,
        grid.num_entries()
    );

    let fft = FftPair::new(ANALYSIS_SIZE);
    grid.map(Stage::Analyze, |_, samples| fft.magnitude_response(samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    use hrtf_dsp::close_floats::*;

    #[test]
    fn test_output_length_is_fixed() {
        for len in [1, 32, 1000, ANALYSIS_SIZE + 500] {
            let mut impulse = vec![0.0; len];
            impulse[0] = 0.5;
            let grid = AngleGrid::from_rows(vec![(0, vec![(0, impulse)])]);
            let out = analyze(&grid).unwrap();
            assert_eq!(out.entry_length(), ANALYSIS_SIZE);

            let (_, mag) = out.iter().next().unwrap();
            close_floats64(mag[0], 0.5, 1e-12);
            close_floats64(mag[12345], 0.5, 1e-12);
        }
    }
}
