//! Turning a compiled dataset into a file.
use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::{IoError, Result, Stage};
use crate::hrtf_data::HrtfData;
use crate::primes::prime_table;
use crate::sink::{ArraySink, ArrayValues, JsonArrayWriter, RustArrayWriter};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Rust source with one `pub static` per array.
    #[default]
    Rust,

    /// One JSON object of named arrays.
    Json,
}

/// What goes into an artifact besides the dataset itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extras {
    /// Append the prime table, reaching one prime past this limit.
    pub primes_limit: Option<u32>,
}

fn fill<S: ArraySink>(mut sink: S, data: Option<&HrtfData>, extras: &Extras) -> Result<S::Output> {
    if let Some(data) = data {
        data.write_to(&mut sink)?;
    }

    if let Some(limit) = extras.primes_limit {
        sink.add_array("primes", ArrayValues::UnsignedInt(prime_table(limit)))?;
    }

    Ok(sink.finish()?)
}

/// Render the dataset (if any) and extras in the given format.
pub fn render(data: Option<&HrtfData>, extras: &Extras, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Rust => fill(RustArrayWriter::new(), data, extras),
        OutputFormat::Json => fill(JsonArrayWriter::new(), data, extras),
    }
}

/// Write an artifact to disk.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| {
        crate::Error::from(IoError::Fs {
            path: path.to_path_buf(),
            source,
        })
        .during(Stage::Write)
    })?;
    log::info!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Load, compile, render, and write in one go.
///
/// Nothing is written unless every step before writing succeeds.
pub fn compile_to_path(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
    extras: &Extras,
    format: OutputFormat,
) -> Result<HrtfData> {
    let dataset = crate::loader::load_dataset(input)?;
    let data = crate::pipeline::compile(&dataset, config)?;
    let rendered = render(Some(&data), extras, format)?;
    write_artifact(output, &rendered)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primes_only() {
        let extras = Extras {
            primes_limit: Some(10),
        };
        let rendered = render(None, &extras, OutputFormat::Rust).unwrap();
        assert!(rendered.contains("pub static PRIMES: [u32; 5] = ["));

        let rendered = render(None, &extras, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["primes"]["values"], serde_json::json!([2, 3, 5, 7, 11]));
    }
}
