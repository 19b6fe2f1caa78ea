//! Compiles a measured HRIR dataset into the small minimum-phase filter table the renderer convolves with.
//!
//! The pipeline, in order:
//!
//! - [loader] reads a directory of WAV recordings into a validated [Dataset].
//! - [stages::analyze] takes magnitude spectra at one bin per Hz.
//! - [stages::equalize] removes the coloration common to every angle.
//! - [stages::clamp] bounds the gains.
//! - [stages::synthesize_minimum_phase] rebuilds causal impulses from the magnitudes.
//! - [stages::remove_rumble] highpasses away DC.
//! - [stages::truncate] and [stages::emphasize] shorten the impulses and darken the back, in configurable order.
//! - [HrtfData] packages the result for an [ArraySink].
//!
//! [pipeline::compile] runs all of it; [artifact::compile_to_path] adds loading and writing.
pub mod artifact;
pub mod config;
pub mod dataset;
mod error;
pub mod grid;
pub mod hrtf_data;
pub mod loader;
pub mod pipeline;
pub mod primes;
pub mod sink;
pub mod stages;

pub use artifact::{compile_to_path, render, Extras, OutputFormat};
pub use config::{EmphasisConfig, EmphasisPlacement, PipelineConfig, PipelineConfigBuilder};
pub use dataset::{Dataset, ElevationMetadata, Measurement};
pub use error::*;
pub use hrtf_data::HrtfData;
pub use sink::{ArraySink, ArrayValues, ElementType, JsonArrayWriter, MemorySink, RustArrayWriter};
