//! The measured dataset: one recording per (elevation, azimuth).
use std::collections::{btree_map, BTreeMap};

use crate::error::{IntegrityError, Result};

/// One recording at one angle, normalized to `[-1, 1]` at [hrtf_dsp::SR].
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub elevation: i32,
    pub azimuth: i32,
    pub samples: Vec<f64>,
}

/// The elevation layout of a dataset.
///
/// Elevations are sorted, distinct, and equally spaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElevationMetadata {
    pub elevations: Vec<i32>,
    pub increment: i32,
    pub min: i32,
    pub max: i32,
}

impl ElevationMetadata {
    /// Build the metadata from sorted, distinct elevation angles.
    pub fn from_angles(elevations: Vec<i32>) -> Result<Self, IntegrityError> {
        debug_assert!(elevations.windows(2).all(|w| w[0] < w[1]));

        if elevations.len() < 2 {
            return Err(IntegrityError::TooFewElevations {
                found: elevations.len(),
            });
        }

        let increment = elevations[1] - elevations[0];
        if let Some(w) = elevations.windows(2).find(|w| w[1] - w[0] != increment) {
            return Err(IntegrityError::UnevenElevations {
                expected: increment,
                lower: w[0],
                upper: w[1],
            });
        }

        Ok(Self {
            min: elevations[0],
            max: elevations[elevations.len() - 1],
            increment,
            elevations,
        })
    }

    pub fn count(&self) -> usize {
        self.elevations.len()
    }
}

/// A validated mapping of elevation to azimuth to measurement.
#[derive(Clone, Debug)]
pub struct Dataset {
    elevations: BTreeMap<i32, BTreeMap<i32, Measurement>>,
    metadata: ElevationMetadata,
    measurement_length: usize,
}

impl Dataset {
    /// Build a dataset, checking that it is usable.
    ///
    /// Measurements must be non-empty, of one common length, with samples in `[-1, 1]`, and no two may share an angle.
    /// The elevations must satisfy [ElevationMetadata::from_angles].
    pub fn from_measurements(measurements: impl IntoIterator<Item = Measurement>) -> Result<Self> {
        let mut elevations: BTreeMap<i32, BTreeMap<i32, Measurement>> = BTreeMap::new();
        let mut measurement_length = None;

        for m in measurements {
            if m.samples.is_empty() {
                return Err(IntegrityError::EmptyMeasurement {
                    elevation: m.elevation,
                    azimuth: m.azimuth,
                }
                .into());
            }

            let expected = *measurement_length.get_or_insert(m.samples.len());
            if m.samples.len() != expected {
                return Err(IntegrityError::LengthMismatch {
                    elevation: m.elevation,
                    azimuth: m.azimuth,
                    expected,
                    found: m.samples.len(),
                }
                .into());
            }

            if let Some((index, value)) = m
                .samples
                .iter()
                .enumerate()
                .find(|(_, s)| !(-1.0..=1.0).contains(*s))
            {
                return Err(IntegrityError::SampleOutOfRange {
                    elevation: m.elevation,
                    azimuth: m.azimuth,
                    index,
                    value: *value,
                }
                .into());
            }

            let azimuths = elevations.entry(m.elevation).or_default();
            if azimuths.contains_key(&m.azimuth) {
                return Err(IntegrityError::DuplicateAngle {
                    elevation: m.elevation,
                    azimuth: m.azimuth,
                }
                .into());
            }
            azimuths.insert(m.azimuth, m);
        }

        let metadata = ElevationMetadata::from_angles(elevations.keys().copied().collect())?;

        Ok(Self {
            elevations,
            metadata,
            // At least two elevations made it this far, so something set this.
            measurement_length: measurement_length.unwrap_or_default(),
        })
    }

    pub fn metadata(&self) -> &ElevationMetadata {
        &self.metadata
    }

    /// Length in samples shared by every measurement.
    pub fn measurement_length(&self) -> usize {
        self.measurement_length
    }

    /// Elevations in ascending order, each with its measurements in ascending azimuth order.
    pub fn elevations(&self) -> impl Iterator<Item = (i32, btree_map::Values<'_, i32, Measurement>)> {
        self.elevations.iter().map(|(e, azs)| (*e, azs.values()))
    }

    pub fn get(&self, elevation: i32, azimuth: i32) -> Option<&Measurement> {
        self.elevations.get(&elevation)?.get(&azimuth)
    }

    pub fn num_measurements(&self) -> usize {
        self.elevations.values().map(|x| x.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(elevation: i32, azimuth: i32, samples: Vec<f64>) -> Measurement {
        Measurement {
            elevation,
            azimuth,
            samples,
        }
    }

    #[test]
    fn test_metadata() {
        let meta = ElevationMetadata::from_angles(vec![-40, -30, -20, -10]).unwrap();
        assert_eq!(meta.increment, 10);
        assert_eq!(meta.min, -40);
        assert_eq!(meta.max, -10);
        assert_eq!(meta.count(), 4);
    }

    #[test]
    fn test_metadata_errors() {
        assert!(matches!(
            ElevationMetadata::from_angles(vec![0]),
            Err(IntegrityError::TooFewElevations { found: 1 })
        ));
        assert!(matches!(
            ElevationMetadata::from_angles(vec![]),
            Err(IntegrityError::TooFewElevations { found: 0 })
        ));
        assert!(matches!(
            ElevationMetadata::from_angles(vec![0, 10, 30]),
            Err(IntegrityError::UnevenElevations {
                expected: 10,
                lower: 10,
                upper: 30
            })
        ));
    }

    #[test]
    fn test_sorted_iteration() {
        let ds = Dataset::from_measurements(vec![
            m(10, 90, vec![0.1]),
            m(0, 180, vec![0.2]),
            m(10, 0, vec![0.3]),
            m(0, 0, vec![0.4]),
        ])
        .unwrap();

        let layout = ds
            .elevations()
            .map(|(e, azs)| (e, azs.map(|x| x.azimuth).collect::<Vec<_>>()))
            .collect::<Vec<_>>();
        assert_eq!(layout, vec![(0, vec![0, 180]), (10, vec![0, 90])]);
        assert_eq!(ds.measurement_length(), 1);
        assert_eq!(ds.num_measurements(), 4);
        assert_eq!(ds.get(10, 90).unwrap().samples, vec![0.1]);
    }

    #[test]
    fn test_rejections() {
        let dup = Dataset::from_measurements(vec![
            m(0, 0, vec![0.0]),
            m(0, 0, vec![0.0]),
            m(10, 0, vec![0.0]),
        ]);
        assert!(dup.unwrap_err().is_integrity());

        let lengths =
            Dataset::from_measurements(vec![m(0, 0, vec![0.0]), m(10, 0, vec![0.0, 0.0])]);
        assert!(lengths.unwrap_err().is_integrity());

        let empty = Dataset::from_measurements(vec![m(0, 0, vec![]), m(10, 0, vec![])]);
        assert!(empty.unwrap_err().is_integrity());

        let range = Dataset::from_measurements(vec![m(0, 0, vec![1.5]), m(10, 0, vec![0.0])]);
        assert!(range.unwrap_err().is_integrity());

        let single = Dataset::from_measurements(vec![m(0, 0, vec![0.0]), m(0, 90, vec![0.0])]);
        assert!(single.unwrap_err().is_integrity());
    }
}
