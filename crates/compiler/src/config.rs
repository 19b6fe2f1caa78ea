//! Configuration of the compiler.
//!
//! The defaults are the constants the shipped dataset is compiled with.  The emphasis curve in particular was tuned by
//! ear rather than derived, so it is exposed in full.
//!
//! A config can be built in code with [PipelineConfigBuilder] or read from YAML, where every field is optional and
//! falls back to its default:
//!
//! ```yaml
//! final_length: 64
//! emphasis:
//!   max_stopband_db: -3.0
//! ```
use std::path::Path;

use hrtf_dsp::{DbExt, NYQUIST, SR};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, IoError, Result};

/// Whether the directional emphasis filter runs on the full minimum-phase impulse or on the truncated one.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisPlacement {
    BeforeTruncation,
    #[default]
    AfterTruncation,
}

/// The curve of the low-pass which darkens sources behind the listener.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(pattern = "owned", default)]
#[serde(default, deny_unknown_fields)]
pub struct EmphasisConfig {
    /// Edge of the passband in Hz.
    pub passband: f64,

    /// Edge of the stopband in Hz.
    pub stopband: f64,

    /// Most the passband edge may lose, in positive dB.
    pub passband_loss_db: f64,

    /// Stopband gain directly behind the listener, in negative dB, on top of [EmphasisConfig::stopband_offset_db].
    pub max_stopband_db: f64,

    /// Stopband gain just behind the threshold, in negative dB.  Must be nonzero for the design to be a filter.
    pub stopband_offset_db: f64,

    /// Angles whose back-relative position is at least this are left alone.
    ///
    /// Slightly below 0.5 so that the sides are left alone despite floating point error.
    pub front_threshold: f64,
}

impl Default for EmphasisConfig {
    fn default() -> Self {
        Self {
            passband: 2000.0,
            stopband: NYQUIST as f64,
            passband_loss_db: 0.1,
            max_stopband_db: -1.5,
            stopband_offset_db: -0.1,
            front_threshold: 0.49,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(pattern = "owned", default)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Length of the impulses in the compiled dataset.
    pub final_length: usize,

    /// Frequencies at and above this (in Hz) are left untouched by equalization.
    pub equalization_cutoff: usize,

    /// Smallest gain any bin may have after equalization.
    pub min_gain: f64,

    /// Largest gain any bin may have after equalization.
    pub max_gain: f64,

    /// Floor applied to magnitudes before taking their logarithm during minimum phase conversion.
    pub min_phase_epsilon: f64,

    /// Cutoff of the highpass which removes DC and rumble, in Hz.
    pub rumble_cutoff: f64,

    pub rumble_order: u32,

    pub emphasis: EmphasisConfig,

    pub emphasis_placement: EmphasisPlacement,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            final_length: 32,
            equalization_cutoff: 5000,
            min_gain: 0.0,
            max_gain: 6.0f64.db_to_gain(),
            min_phase_epsilon: hrtf_dsp::min_phase::DEFAULT_EPSILON,
            rumble_cutoff: 100.0,
            rumble_order: 2,
            emphasis: Default::default(),
            emphasis_placement: Default::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl PipelineConfig {
    /// Read a config from a YAML file.  The result is validated.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| IoError::Fs {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the pipeline can run with this config at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nyquist = NYQUIST as f64;

        if self.final_length == 0 || self.final_length > SR as usize {
            return Err(invalid(
                "final_length",
                format!("{} is not in 1..={}", self.final_length, SR),
            ));
        }

        if self.equalization_cutoff == 0 || self.equalization_cutoff > NYQUIST as usize {
            return Err(invalid(
                "equalization_cutoff",
                format!("{} Hz is not in 1..={}", self.equalization_cutoff, NYQUIST),
            ));
        }

        if !(self.min_gain >= 0.0 && self.min_gain <= self.max_gain && self.max_gain.is_finite()) {
            return Err(invalid(
                "min_gain/max_gain",
                format!(
                    "need 0 <= min_gain <= max_gain, got {} and {}",
                    self.min_gain, self.max_gain
                ),
            ));
        }

        if !(self.min_phase_epsilon > 0.0) {
            return Err(invalid("min_phase_epsilon", "must be positive"));
        }

        if !(self.rumble_cutoff > 0.0 && self.rumble_cutoff < nyquist) {
            return Err(invalid(
                "rumble_cutoff",
                format!("{} Hz is not in (0, {})", self.rumble_cutoff, nyquist),
            ));
        }

        if self.rumble_order == 0 {
            return Err(invalid("rumble_order", "must be at least 1"));
        }

        let e = &self.emphasis;
        if !(e.passband > 0.0 && e.passband < e.stopband && e.stopband <= nyquist) {
            return Err(invalid(
                "emphasis.passband/emphasis.stopband",
                format!(
                    "need 0 < passband < stopband <= {}, got {} and {}",
                    nyquist, e.passband, e.stopband
                ),
            ));
        }

        if !(e.passband_loss_db > 0.0) {
            return Err(invalid("emphasis.passband_loss_db", "must be positive"));
        }

        if !(e.stopband_offset_db < 0.0 && e.max_stopband_db <= 0.0) {
            return Err(invalid(
                "emphasis.stopband_offset_db/emphasis.max_stopband_db",
                "stopband gains must be negative",
            ));
        }

        if !(e.front_threshold > 0.0 && e.front_threshold <= 1.0) {
            return Err(invalid("emphasis.front_threshold", "must be in (0, 1]"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.final_length, 32);
        assert!((config.max_gain - 1.9953).abs() < 1e-4);
    }

    #[test]
    fn test_builder_fills_defaults() {
        let config = PipelineConfigBuilder::default()
            .final_length(64)
            .build()
            .unwrap();
        assert_eq!(config.final_length, 64);
        assert_eq!(config.equalization_cutoff, 5000);
        assert_eq!(config.emphasis, EmphasisConfig::default());
    }

    #[test]
    fn test_yaml_partial() {
        let config: PipelineConfig = serde_yaml::from_str(
            "final_length: 16\nemphasis_placement: before_truncation\nemphasis:\n  max_stopband_db: -3.0\n",
        )
        .unwrap();
        assert_eq!(config.final_length, 16);
        assert_eq!(config.emphasis_placement, EmphasisPlacement::BeforeTruncation);
        assert_eq!(config.emphasis.max_stopband_db, -3.0);
        assert_eq!(config.emphasis.passband, 2000.0);
    }

    #[test]
    fn test_yaml_rejects_unknown_fields() {
        assert!(serde_yaml::from_str::<PipelineConfig>("final_lenght: 16\n").is_err());
    }

    #[test]
    fn test_validation() {
        let bad = [
            PipelineConfig {
                final_length: 0,
                ..Default::default()
            },
            PipelineConfig {
                equalization_cutoff: 30000,
                ..Default::default()
            },
            PipelineConfig {
                min_gain: 3.0,
                max_gain: 2.0,
                ..Default::default()
            },
            PipelineConfig {
                min_phase_epsilon: 0.0,
                ..Default::default()
            },
            PipelineConfig {
                emphasis: EmphasisConfig {
                    stopband_offset_db: 0.0,
                    ..Default::default()
                },
                ..Default::default()
            },
        ];

        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be invalid", config);
        }
    }
}
