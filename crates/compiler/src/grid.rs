//! The grid of per-angle arrays threaded through the pipeline.
//!
//! Every stage takes one [AngleGrid] and produces a new one of the same shape.  What the arrays hold changes from stage
//! to stage: samples, then magnitudes, then samples again.
use rayon::prelude::*;

use crate::dataset::Dataset;
use crate::error::{Location, NumericalError, Result, Stage};

/// Where an entry sits in the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub elevation: i32,
    pub azimuth: i32,
    pub elevation_index: usize,

    /// Index of the azimuth within its elevation, in ascending angle order.
    pub azimuth_index: usize,

    /// How many azimuths the elevation has.
    pub azimuth_count: usize,
}

impl Position {
    pub fn location(&self) -> Location {
        Location::Angle {
            elevation: self.elevation,
            azimuth: self.azimuth,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Row {
    elevation: i32,
    azimuths: Vec<i32>,
    data: Vec<Vec<f64>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AngleGrid {
    rows: Vec<Row>,
}

/// Find the first non-finite value, as a [NumericalError].
pub(crate) fn check_finite(
    stage: Stage,
    location: Location,
    values: &[f64],
) -> Result<(), NumericalError> {
    match values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, value)) => Err(NumericalError {
            stage,
            location,
            index,
            value: *value,
        }),
        None => Ok(()),
    }
}

impl AngleGrid {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let rows = dataset
            .elevations()
            .map(|(elevation, measurements)| {
                let (azimuths, data) = measurements
                    .map(|m| (m.azimuth, m.samples.clone()))
                    .unzip();
                Row {
                    elevation,
                    azimuths,
                    data,
                }
            })
            .collect();
        Self { rows }
    }

    /// Build a grid from `(elevation, [(azimuth, data)])` rows, which must already be sorted.
    pub fn from_rows(rows: impl IntoIterator<Item = (i32, Vec<(i32, Vec<f64>)>)>) -> Self {
        let rows = rows
            .into_iter()
            .map(|(elevation, entries)| {
                let (azimuths, data) = entries.into_iter().unzip();
                Row {
                    elevation,
                    azimuths,
                    data,
                }
            })
            .collect();
        Self { rows }
    }

    pub fn elevations(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.elevation).collect()
    }

    pub fn azimuth_counts(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.azimuths.len()).collect()
    }

    pub fn num_entries(&self) -> usize {
        self.rows.iter().map(|r| r.data.len()).sum()
    }

    /// Length of the arrays, which is the same for every entry.  0 for an empty grid.
    pub fn entry_length(&self) -> usize {
        self.iter().next().map(|(_, d)| d.len()).unwrap_or(0)
    }

    /// Iterate over every entry, elevation-major.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &[f64])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(elevation_index, row)| {
                row.azimuths
                    .iter()
                    .zip(row.data.iter())
                    .enumerate()
                    .map(move |(azimuth_index, (azimuth, data))| {
                        (
                            Position {
                                elevation: row.elevation,
                                azimuth: *azimuth,
                                elevation_index,
                                azimuth_index,
                                azimuth_count: row.azimuths.len(),
                            },
                            &data[..],
                        )
                    })
            })
    }

    /// Produce a new grid of the same shape by running `f` over every entry in parallel.
    ///
    /// Every output is checked for non-finite values, which become a [NumericalError] in `stage`.  The first error
    /// encountered aborts the map.
    pub fn try_map<F>(&self, stage: Stage, f: F) -> Result<AngleGrid>
    where
        F: Fn(Position, &[f64]) -> Result<Vec<f64>> + Sync,
    {
        let entries = self.iter().collect::<Vec<_>>();
        let mut outputs = entries
            .into_par_iter()
            .map(|(pos, data)| -> Result<Vec<f64>> {
                let out = f(pos, data)?;
                check_finite(stage, pos.location(), &out)?;
                Ok(out)
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter();

        let rows = self
            .rows
            .iter()
            .map(|row| Row {
                elevation: row.elevation,
                azimuths: row.azimuths.clone(),
                data: outputs.by_ref().take(row.azimuths.len()).collect(),
            })
            .collect();
        Ok(AngleGrid { rows })
    }

    /// Like [AngleGrid::try_map], for transforms that cannot fail on their own.
    pub fn map<F>(&self, stage: Stage, f: F) -> Result<AngleGrid>
    where
        F: Fn(Position, &[f64]) -> Vec<f64> + Sync,
    {
        self.try_map(stage, |pos, data| Ok(f(pos, data)))
    }

    /// The largest DC value (sum of the entry) over all entries.
    pub fn dc(&self) -> f64 {
        self.iter()
            .map(|(_, d)| d.iter().sum::<f64>())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Consume the grid, yielding each entry's data elevation-major.
    pub fn into_data(self) -> impl Iterator<Item = Vec<f64>> {
        self.rows.into_iter().flat_map(|r| r.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> AngleGrid {
        AngleGrid::from_rows(vec![
            (0, vec![(0, vec![1.0, 2.0]), (90, vec![3.0, 4.0])]),
            (
                10,
                vec![(0, vec![0.5, 0.5]), (120, vec![1.0, 1.0]), (240, vec![-1.0, 0.0])],
            ),
        ])
    }

    #[test]
    fn test_shape() {
        let g = grid();
        assert_eq!(g.elevations(), vec![0, 10]);
        assert_eq!(g.azimuth_counts(), vec![2, 3]);
        assert_eq!(g.num_entries(), 5);
        assert_eq!(g.entry_length(), 2);
        assert_eq!(g.dc(), 7.0);

        let positions = g.iter().map(|(p, _)| p).collect::<Vec<_>>();
        assert_eq!(
            positions[3],
            Position {
                elevation: 10,
                azimuth: 120,
                elevation_index: 1,
                azimuth_index: 1,
                azimuth_count: 3,
            }
        );
    }

    #[test]
    fn test_map_preserves_order() {
        let g = grid();
        let doubled = g
            .map(Stage::Clamp, |_, d| d.iter().map(|x| x * 2.0).collect())
            .unwrap();
        assert_eq!(doubled.azimuth_counts(), g.azimuth_counts());
        for ((p1, d1), (p2, d2)) in g.iter().zip(doubled.iter()) {
            assert_eq!(p1, p2);
            assert_eq!(d1.iter().map(|x| x * 2.0).collect::<Vec<_>>(), d2);
        }

        let shortened = g.map(Stage::Truncate, |_, d| d[..1].to_vec()).unwrap();
        assert_eq!(shortened.entry_length(), 1);
        assert_eq!(
            shortened.into_data().collect::<Vec<_>>(),
            vec![vec![1.0], vec![3.0], vec![0.5], vec![1.0], vec![-1.0]]
        );
    }

    #[test]
    fn test_map_reports_non_finite() {
        let err = grid()
            .map(Stage::MinimumPhase, |p, d| {
                if p.azimuth == 240 {
                    vec![d[0], f64::NAN]
                } else {
                    d.to_vec()
                }
            })
            .unwrap_err();
        assert!(err.is_numerical());
        assert_eq!(err.stage(), Stage::MinimumPhase);
        assert!(err.to_string().contains("elevation 10 azimuth 240"));
        assert!(err.to_string().contains("index 1"));
    }
}
