//! Loading a dataset from a directory of WAV files.
//!
//! The layout is a root containing one `elev*` directory per elevation, each containing one `L<elevation>e<azimuth>a.wav`
//! per azimuth.  Angles are taken from the file names; the directory names only matter for discovery.
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use hound::{SampleFormat, WavReader};
use rayon::prelude::*;
use regex::Regex;

use crate::dataset::{Dataset, Measurement};
use crate::error::{IntegrityError, IoError, ParseError, Result};

lazy_static::lazy_static! {
    static ref FILE_NAME: Regex = Regex::new(r"^L(-?\d+)e(-?\d+)a\.wav$").unwrap();
    static ref ELEVATION_DIR: GlobMatcher = Glob::new("elev*").unwrap().compile_matcher();
    static ref RECORDING: GlobMatcher = Glob::new("L*.wav").unwrap().compile_matcher();
}

/// Parse the `(elevation, azimuth)` out of a recording's path.
pub fn parse_file_name(path: &Path) -> Result<(i32, i32), ParseError> {
    let name_err = || ParseError::FileName {
        path: path.to_path_buf(),
    };

    let name = path
        .file_name()
        .and_then(|x| x.to_str())
        .ok_or_else(name_err)?;
    let caps = FILE_NAME.captures(name).ok_or_else(name_err)?;

    let angle = |text: &str| {
        text.parse::<i32>().map_err(|_| ParseError::Angle {
            path: path.to_path_buf(),
            text: text.to_string(),
        })
    };

    Ok((angle(&caps[1])?, angle(&caps[2])?))
}

fn sorted_entries(dir: &Path, matcher: &GlobMatcher, want_dirs: bool) -> Result<Vec<PathBuf>> {
    let fs_err = |source| IoError::Fs {
        path: dir.to_path_buf(),
        source,
    };

    let mut found = vec![];
    for entry in std::fs::read_dir(dir).map_err(fs_err)? {
        let entry = entry.map_err(fs_err)?;
        let file_type = entry.file_type().map_err(fs_err)?;
        if file_type.is_dir() != want_dirs || !matcher.is_match(entry.file_name()) {
            continue;
        }
        found.push(entry.path());
    }

    found.sort();
    Ok(found)
}

/// Find every recording under the root, in sorted order.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = vec![];
    for dir in sorted_entries(root, &ELEVATION_DIR, true)? {
        found.extend(sorted_entries(&dir, &RECORDING, false)?);
    }

    log::debug!("Found {} recordings under {}", found.len(), root.display());
    Ok(found)
}

/// A decoded recording, before it becomes a [Measurement].
#[derive(Debug)]
struct Recording {
    elevation: i32,
    azimuth: i32,
    bits: u16,
    samples: Vec<f64>,
}

fn read_recording(path: &Path) -> Result<Recording> {
    let (elevation, azimuth) = parse_file_name(path)?;
    let wav_err = |source| IoError::Wav {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = WavReader::open(path).map_err(wav_err)?;
    let spec = reader.spec();

    if spec.sample_rate != hrtf_dsp::SR {
        return Err(IntegrityError::SampleRate {
            path: path.to_path_buf(),
            expected: hrtf_dsp::SR,
            found: spec.sample_rate,
        }
        .into());
    }

    if spec.channels != 1 {
        return Err(IntegrityError::Channels {
            path: path.to_path_buf(),
            found: spec.channels,
        }
        .into());
    }

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(|s| s as f64))
            .collect::<Result<Vec<_>, _>>()
            .map_err(wav_err)?,
        (SampleFormat::Int, bits @ 8..=32) => {
            let full_scale = (1u64 << (bits - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f64 / full_scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(wav_err)?
        }
        (format, bits) => {
            return Err(IntegrityError::SampleFormat {
                path: path.to_path_buf(),
                bits,
                format: match format {
                    SampleFormat::Float => "float",
                    SampleFormat::Int => "integer",
                },
            }
            .into())
        }
    };

    log::trace!(
        "Loaded {}: {} samples at {} bits",
        path.display(),
        samples.len(),
        spec.bits_per_sample
    );

    Ok(Recording {
        elevation,
        azimuth,
        bits: spec.bits_per_sample,
        samples,
    })
}

/// Load and validate the dataset under `root`.
///
/// Recordings load in parallel.  The first failure aborts the load.
pub fn load_dataset(root: &Path) -> Result<Dataset> {
    let paths = discover(root)?;
    if paths.is_empty() {
        return Err(IntegrityError::NoRecordings {
            root: root.to_path_buf(),
        }
        .into());
    }

    let recordings = paths
        .par_iter()
        .map(|p| read_recording(p))
        .collect::<Result<Vec<_>>>()?;

    let expected_bits = recordings[0].bits;
    if let Some((path, rec)) = paths
        .iter()
        .zip(recordings.iter())
        .find(|(_, r)| r.bits != expected_bits)
    {
        return Err(IntegrityError::BitDepth {
            path: path.clone(),
            expected: expected_bits,
            found: rec.bits,
        }
        .into());
    }

    let dataset = Dataset::from_measurements(recordings.into_iter().map(|r| Measurement {
        elevation: r.elevation,
        azimuth: r.azimuth,
        samples: r.samples,
    }))?;

    log::info!(
        "Loaded {} measurements over {} elevations from {}",
        dataset.num_measurements(),
        dataset.metadata().count(),
        root.display()
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_name() {
        let parse = |p: &str| parse_file_name(Path::new(p));

        assert_eq!(parse("elev10/L10e045a.wav").unwrap(), (10, 45));
        assert_eq!(parse("L-40e355a.wav").unwrap(), (-40, 355));
        assert_eq!(parse("elev0/L0e000a.wav").unwrap(), (0, 0));
    }

    #[test]
    fn test_parse_file_name_errors() {
        for bad in [
            "R10e045a.wav",
            "L10e045.wav",
            "L10a045e.wav",
            "L10e045a.wav.bak",
            "Lxe045a.wav",
        ] {
            assert!(
                matches!(
                    parse_file_name(Path::new(bad)),
                    Err(ParseError::FileName { .. })
                ),
                "{bad}"
            );
        }

        assert!(matches!(
            parse_file_name(Path::new("L99999999999e0a.wav")),
            Err(ParseError::Angle { .. })
        ));
    }

    #[test]
    fn test_globs() {
        assert!(ELEVATION_DIR.is_match("elev-10"));
        assert!(!ELEVATION_DIR.is_match("other"));
        assert!(RECORDING.is_match("L0e000a.wav"));
        assert!(!RECORDING.is_match("R0e000a.wav"));
    }
}
