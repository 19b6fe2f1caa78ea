//! The compiled dataset.
use crate::dataset::ElevationMetadata;
use crate::error::{Result, Stage};
use crate::grid::AngleGrid;
use crate::sink::{ArraySink, ArrayValues};

/// The final, immutable artifact handed to a sink.
///
/// The runtime finds azimuth `i` of elevation `e` at `impulses[(azimuth_starts[e] + i) * impulse_length..]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HrtfData {
    metadata: ElevationMetadata,
    azimuth_counts: Vec<usize>,
    impulse_length: usize,
    grid: AngleGrid,
}

impl HrtfData {
    /// Package a fully processed grid.
    pub fn assemble(metadata: &ElevationMetadata, grid: AngleGrid) -> Self {
        debug_assert_eq!(metadata.elevations, grid.elevations());

        let data = Self {
            metadata: metadata.clone(),
            azimuth_counts: grid.azimuth_counts(),
            impulse_length: grid.entry_length(),
            grid,
        };

        log::info!(
            "Assembled {} elevations from {} to {} in steps of {}, {} impulses of {} samples",
            data.num_elevs(),
            data.elev_min(),
            data.elev_max(),
            data.elev_increment(),
            data.grid.num_entries(),
            data.impulse_length
        );
        data
    }

    pub fn num_elevs(&self) -> usize {
        self.metadata.count()
    }

    pub fn elev_increment(&self) -> i32 {
        self.metadata.increment
    }

    pub fn elev_min(&self) -> i32 {
        self.metadata.min
    }

    pub fn elev_max(&self) -> i32 {
        self.metadata.max
    }

    pub fn azimuth_counts(&self) -> &[usize] {
        &self.azimuth_counts
    }

    /// Index of each elevation's first impulse in the flattened impulse array, counted in impulses.
    pub fn azimuth_starts(&self) -> Vec<usize> {
        self.azimuth_counts
            .iter()
            .scan(0, |start, count| {
                let this = *start;
                *start += count;
                Some(this)
            })
            .collect()
    }

    pub fn impulse_length(&self) -> usize {
        self.impulse_length
    }

    pub fn grid(&self) -> &AngleGrid {
        &self.grid
    }

    /// Every impulse back to back, elevation-major then azimuth.
    pub fn impulses(&self) -> Vec<f32> {
        self.grid
            .iter()
            .flat_map(|(_, impulse)| impulse.iter().map(|x| *x as f32))
            .collect()
    }

    /// Hand the dataset's arrays to a sink.
    pub fn write_to<S: ArraySink>(&self, sink: &mut S) -> Result<()> {
        let uints = |x: &[usize]| ArrayValues::UnsignedInt(x.iter().map(|v| *v as u32).collect());

        let arrays = [
            (
                "hrtf_num_elevs",
                ArrayValues::UnsignedInt(vec![self.num_elevs() as u32]),
            ),
            (
                "hrtf_elev_increment",
                ArrayValues::Int(vec![self.elev_increment()]),
            ),
            ("hrtf_elev_min", ArrayValues::Int(vec![self.elev_min()])),
            ("hrtf_num_azimuths", uints(&self.azimuth_counts)),
            ("hrtf_azimuth_starts", uints(&self.azimuth_starts())),
            (
                "hrtf_impulse_length",
                ArrayValues::UnsignedInt(vec![self.impulse_length as u32]),
            ),
            ("hrtf_impulses", ArrayValues::Float(self.impulses())),
        ];

        for (name, values) in arrays {
            sink.add_array(name, values)
                .map_err(|e| crate::Error::from(e).during(Stage::Assemble))?;
        }

        Ok(())
    }
}
