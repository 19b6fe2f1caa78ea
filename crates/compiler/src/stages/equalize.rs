//! Power equalization.
//!
//! The measurements all share the coloration of the measurement setup, so one global correction is derived from their
//! average power and applied to all of them.  Only frequencies below the cutoff are corrected; above it the filter is
//! exactly 1.
//!
//! This runs in two passes: [EqualizationFilter::reduce] is a barrier over the whole grid, then
//! [EqualizationFilter::apply] maps the result over it.
use hrtf_dsp::DbExt;

use crate::error::{Location, NumericalError, Result, Stage};
use crate::grid::{check_finite, AngleGrid};

/// Whether `bin` of a `size`-point spectrum at [hrtf_dsp::SR] is at or above `cutoff_hz`, folding about Nyquist.
pub fn is_preserved_bin(bin: usize, size: usize, cutoff_hz: usize) -> bool {
    let folded = bin.min(size - bin);
    folded as f64 * hrtf_dsp::SR as f64 / size as f64 >= cutoff_hz as f64
}

#[derive(Clone, Debug, PartialEq)]
pub struct EqualizationFilter {
    gains: Vec<f64>,
}

impl EqualizationFilter {
    /// Derive the filter from a grid of magnitude spectra.
    pub fn reduce(grid: &AngleGrid, cutoff_hz: usize) -> Result<Self> {
        let size = grid.entry_length();
        let count = grid.num_entries() as f64;

        // Sequential and in grid order, so the sum comes out the same on every run.
        let mut power = vec![0.0f64; size];
        for (_, mag) in grid.iter() {
            for (p, m) in power.iter_mut().zip(mag.iter()) {
                *p += m * m;
            }
        }

        let mut db = Vec::with_capacity(size);
        for (bin, p) in power.iter().enumerate() {
            if is_preserved_bin(bin, size, cutoff_hz) {
                db.push(0.0);
                continue;
            }

            let avg = p / count;
            let d = avg.checked_gain_to_db().ok_or(NumericalError {
                stage: Stage::Equalize,
                location: Location::Global,
                index: bin,
                value: avg,
            })?;
            db.push(d);
        }

        let (sum, low_bins) = db
            .iter()
            .enumerate()
            .filter(|(bin, _)| !is_preserved_bin(*bin, size, cutoff_hz))
            .fold((0.0, 0usize), |(s, n), (_, d)| (s + d, n + 1));
        let bias = if low_bins == 0 {
            0.0
        } else {
            sum / low_bins as f64
        };
        log::debug!("Equalization removes a bias of {bias} dB over {low_bins} bins");

        for (bin, d) in db.iter_mut().enumerate() {
            *d = if is_preserved_bin(bin, size, cutoff_hz) {
                0.0
            } else {
                *d - bias
            };
        }

        let gains = db
            .into_iter()
            .map(|d| (-d).db_to_gain().sqrt())
            .collect::<Vec<_>>();
        check_finite(Stage::Equalize, Location::Global, &gains)?;

        Ok(Self { gains })
    }

    pub fn gains(&self) -> &[f64] {
        &self.gains
    }

    /// Multiply every spectrum by the filter.  DC comes out as exactly 1.
    pub fn apply(&self, grid: &AngleGrid) -> Result<AngleGrid> {
        grid.map(Stage::Equalize, |_, mag| {
            let mut out = mag
                .iter()
                .zip(self.gains.iter())
                .map(|(m, g)| m * g)
                .collect::<Vec<_>>();
            if let Some(dc) = out.first_mut() {
                *dc = 1.0;
            }
            out
        })
    }
}

/// Derive the filter from `grid` and apply it.
pub fn equalize(grid: &AngleGrid, cutoff_hz: usize) -> Result<AngleGrid> {
    log::info!("Equalizing power below {cutoff_hz} Hz");
    let filter = EqualizationFilter::reduce(grid, cutoff_hz)?;
    filter.apply(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    use hrtf_dsp::close_floats::*;

    const SIZE: usize = hrtf_dsp::SR as usize;

    fn spectrum(low: f64, high: f64) -> Vec<f64> {
        (0..SIZE)
            .map(|b| {
                if is_preserved_bin(b, SIZE, 5000) {
                    high
                } else {
                    low
                }
            })
            .collect()
    }

    #[test]
    fn test_preserved_bins() {
        assert!(!is_preserved_bin(0, SIZE, 5000));
        assert!(!is_preserved_bin(4999, SIZE, 5000));
        assert!(is_preserved_bin(5000, SIZE, 5000));
        assert!(is_preserved_bin(22050, SIZE, 5000));
        assert!(is_preserved_bin(SIZE - 5000, SIZE, 5000));
        assert!(!is_preserved_bin(SIZE - 4999, SIZE, 5000));
    }

    #[test]
    fn test_filter_is_unity_above_cutoff() {
        let mut a = spectrum(0.5, 3.0);
        a[100] = 2.0;
        let grid = AngleGrid::from_rows(vec![
            (0, vec![(0, a), (180, spectrum(0.25, 0.01))]),
            (10, vec![(0, spectrum(1.0, 1.0))]),
        ]);

        let filter = EqualizationFilter::reduce(&grid, 5000).unwrap();
        assert_eq!(filter.gains().len(), SIZE);
        for (bin, g) in filter.gains().iter().enumerate() {
            if is_preserved_bin(bin, SIZE, 5000) {
                assert_eq!(*g, 1.0, "bin {bin}");
            }
        }

        // The louder bin is cut relative to its neighbors.
        assert!(filter.gains()[100] < filter.gains()[99]);
    }

    #[test]
    fn test_flat_power_gives_unity() {
        // A constant low-band power is exactly the bias, so it is removed completely.
        let grid = AngleGrid::from_rows(vec![
            (0, vec![(0, spectrum(0.3, 1.0))]),
            (10, vec![(0, spectrum(0.3, 1.0))]),
        ]);
        let filter = EqualizationFilter::reduce(&grid, 5000).unwrap();
        close_slices64(filter.gains(), &vec![1.0; SIZE], 1e-9);
    }

    #[test]
    fn test_apply_pins_dc() {
        let grid = AngleGrid::from_rows(vec![
            (0, vec![(0, spectrum(0.5, 2.0))]),
            (10, vec![(0, spectrum(0.5, 2.0))]),
        ]);
        let out = equalize(&grid, 5000).unwrap();
        for (_, mag) in out.iter() {
            assert_eq!(mag[0], 1.0);
            close_floats64(mag[1], 0.5, 1e-9);
            assert_eq!(mag[10000], 2.0);
        }
    }

    #[test]
    fn test_zero_power_is_numerical_error() {
        let mut silent = spectrum(0.5, 0.5);
        silent[7] = 0.0;
        let grid = AngleGrid::from_rows(vec![(0, vec![(0, silent)])]);
        let err = EqualizationFilter::reduce(&grid, 5000).unwrap_err();
        assert!(err.is_numerical());
        assert_eq!(err.stage(), Stage::Equalize);
        assert!(err.to_string().contains("index 7"));
    }
}
