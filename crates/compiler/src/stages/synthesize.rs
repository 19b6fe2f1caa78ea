use hrtf_dsp::MinimumPhase;

use crate::error::{Result, Stage};
use crate::grid::AngleGrid;

/// Replace every magnitude spectrum with the minimum-phase impulse response having that magnitude.
///
/// The impulses are as long as the spectra.
pub fn synthesize_minimum_phase(grid: &AngleGrid, epsilon: f64) -> Result<AngleGrid> {
    log::info!("Converting {} spectra to minimum phase", grid.num_entries());
    let mp = MinimumPhase::new(grid.entry_length(), epsilon);
    grid.map(Stage::MinimumPhase, |_, mag| mp.reconstruct(mag))
}

#[cfg(test)]
mod tests {
    use super::*;

    use hrtf_dsp::close_floats::*;
    use hrtf_dsp::FftPair;

    #[test]
    fn test_flat_gives_unit_impulse() {
        let grid = AngleGrid::from_rows(vec![(0, vec![(0, vec![1.0; 2048]), (90, vec![1.0; 2048])])]);
        let out = synthesize_minimum_phase(&grid, 1e-6).unwrap();
        for (_, impulse) in out.iter() {
            assert_eq!(impulse.len(), 2048);
            close_floats64(impulse[0], 1.0, 1e-12);
            close_floats64(impulse[1..].iter().map(|x| x.abs()).sum::<f64>(), 0.0, 1e-9);
        }
    }

    #[test]
    fn test_keeps_magnitude() {
        let fft = FftPair::new(2048);
        let mag = fft.magnitude_response(&[0.2, 1.0, -0.4]);
        let grid = AngleGrid::from_rows(vec![(0, vec![(0, mag.clone())])]);
        let out = synthesize_minimum_phase(&grid, 1e-6).unwrap();
        let (_, impulse) = out.iter().next().unwrap();
        close_slices64(&fft.magnitude_response(impulse), &mag, 1e-6);
    }
}
