use std::path::PathBuf;

use hrtf_dsp::DesignError;

/// The stage of the compiler an error came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, derive_more::Display)]
pub enum Stage {
    #[display(fmt = "configuration")]
    Configure,
    #[display(fmt = "loading")]
    Load,
    #[display(fmt = "frequency analysis")]
    Analyze,
    #[display(fmt = "power equalization")]
    Equalize,
    #[display(fmt = "magnitude clamping")]
    Clamp,
    #[display(fmt = "minimum phase conversion")]
    MinimumPhase,
    #[display(fmt = "rumble removal")]
    Rumble,
    #[display(fmt = "directional emphasis")]
    Emphasis,
    #[display(fmt = "truncation")]
    Truncate,
    #[display(fmt = "assembly")]
    Assemble,
    #[display(fmt = "writing")]
    Write,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{}: file name does not match `L<elevation>e<azimuth>a.wav`", .path.display())]
    FileName { path: PathBuf },

    #[error("{}: angle {text} does not fit in an integer", .path.display())]
    Angle { path: PathBuf, text: String },
}

#[derive(Debug, thiserror::Error)]
pub enum IntegrityError {
    #[error("Found {found} elevations, but at least 2 are required")]
    TooFewElevations { found: usize },

    #[error("Elevations {lower} and {upper} are not {expected} degrees apart like the first two")]
    UnevenElevations { expected: i32, lower: i32, upper: i32 },

    #[error("{}: sample rate is {found}, but must be {expected}", .path.display())]
    SampleRate {
        path: PathBuf,
        expected: u32,
        found: u32,
    },

    #[error("{}: has {found} channels, but recordings must be mono", .path.display())]
    Channels { path: PathBuf, found: u16 },

    #[error("{}: bit depth is {found}, but the first recording loaded has {expected}", .path.display())]
    BitDepth {
        path: PathBuf,
        expected: u16,
        found: u16,
    },

    #[error("{}: unsupported sample format ({bits}-bit {format})", .path.display())]
    SampleFormat {
        path: PathBuf,
        bits: u16,
        format: &'static str,
    },

    #[error("Elevation {elevation} azimuth {azimuth}: recording is empty")]
    EmptyMeasurement { elevation: i32, azimuth: i32 },

    #[error("Elevation {elevation} azimuth {azimuth}: recording has {found} samples, but others have {expected}")]
    LengthMismatch {
        elevation: i32,
        azimuth: i32,
        expected: usize,
        found: usize,
    },

    #[error("Elevation {elevation} azimuth {azimuth}: sample {index} is {value}, outside [-1, 1]")]
    SampleOutOfRange {
        elevation: i32,
        azimuth: i32,
        index: usize,
        value: f64,
    },

    #[error("Elevation {elevation} azimuth {azimuth} was measured more than once")]
    DuplicateAngle { elevation: i32, azimuth: i32 },

    #[error("{}: no recordings found", .root.display())]
    NoRecordings { root: PathBuf },
}

/// Where in the data a numerical problem was found.
#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Location {
    #[display(fmt = "elevation {} azimuth {}", elevation, azimuth)]
    Angle { elevation: i32, azimuth: i32 },

    /// Something computed from the whole grid at once, e.g. the equalization filter.
    #[display(fmt = "the global equalization filter")]
    Global,
}

#[derive(Debug, thiserror::Error)]
#[error("Non-finite value {value} at index {index} of {location}")]
pub struct NumericalError {
    pub stage: Stage,
    pub location: Location,
    pub index: usize,
    pub value: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("{}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Array {0} was added twice")]
    DuplicateArray(String),

    #[error("Unable to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("{}: {source}", .path.display())]
    Fs {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Wav {
        path: PathBuf,
        source: hound::Error,
    },
}

#[derive(Debug, derive_more::Display, derive_more::IsVariant)]
enum ErrorPayload {
    #[display(fmt = "Parse error: {}", _0)]
    Parse(ParseError),

    #[display(fmt = "Dataset integrity error: {}", _0)]
    Integrity(IntegrityError),

    #[display(fmt = "Numerical error: {}", _0)]
    Numerical(NumericalError),

    #[display(fmt = "Configuration error: {}", _0)]
    Config(ConfigError),

    #[display(fmt = "Filter design error: {}", _0)]
    Design(DesignError),

    #[display(fmt = "Sink error: {}", _0)]
    Sink(SinkError),

    #[display(fmt = "I/O error: {}", _0)]
    Io(IoError),
}

/// The error type of the compiler.
///
/// Every error is fatal to the run.  Display names the stage and then the offending input.
#[derive(Debug, thiserror::Error)]
#[error("Failed during {stage}: {payload}")]
pub struct Error {
    stage: Stage,
    payload: ErrorPayload,
}

macro_rules! conv {
    ($variant: ident, $from_err: path, $stage: expr) => {
        impl From<$from_err> for Error {
            fn from(value: $from_err) -> Error {
                Error {
                    stage: $stage,
                    payload: ErrorPayload::$variant(value),
                }
            }
        }
    };
}

conv!(Parse, ParseError, Stage::Load);
conv!(Integrity, IntegrityError, Stage::Load);
conv!(Config, ConfigError, Stage::Configure);
conv!(Sink, SinkError, Stage::Write);
conv!(Io, IoError, Stage::Load);

impl From<NumericalError> for Error {
    fn from(value: NumericalError) -> Self {
        Error {
            stage: value.stage,
            payload: ErrorPayload::Numerical(value),
        }
    }
}

impl Error {
    /// A filter design failure during the given stage.
    pub fn design(stage: Stage, error: DesignError) -> Self {
        Error {
            stage,
            payload: ErrorPayload::Design(error),
        }
    }

    /// Replace the stage this error is attributed to.
    pub fn during(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_parse(&self) -> bool {
        self.payload.is_parse()
    }

    pub fn is_integrity(&self) -> bool {
        self.payload.is_integrity()
    }

    pub fn is_numerical(&self) -> bool {
        self.payload.is_numerical()
    }

    pub fn is_config(&self) -> bool {
        self.payload.is_config()
    }

    pub fn is_io(&self) -> bool {
        self.payload.is_io()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_stage_and_input() {
        let err: Error = NumericalError {
            stage: Stage::MinimumPhase,
            location: Location::Angle {
                elevation: 10,
                azimuth: 45,
            },
            index: 3,
            value: f64::NAN,
        }
        .into();
        assert!(err.is_numerical());
        assert_eq!(err.stage(), Stage::MinimumPhase);
        assert_eq!(
            err.to_string(),
            "Failed during minimum phase conversion: Numerical error: Non-finite value NaN at index 3 of elevation 10 azimuth 45"
        );
    }

    #[test]
    fn test_parse_error_carries_path() {
        let err: Error = ParseError::FileName {
            path: PathBuf::from("elev0/bad.wav"),
        }
        .into();
        assert!(err.is_parse());
        assert_eq!(err.stage(), Stage::Load);
        assert!(err.to_string().contains("elev0/bad.wav"));
    }

    #[test]
    fn test_during_overrides_stage() {
        let err = Error::from(SinkError::DuplicateArray("x".into())).during(Stage::Assemble);
        assert_eq!(err.stage(), Stage::Assemble);
        assert!(!err.is_io());
    }
}
