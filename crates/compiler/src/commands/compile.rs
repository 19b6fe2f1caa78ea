use anyhow::Context;
use hrtf_compiler::{Extras, PipelineConfig};

use crate::cli_args::{CliArgs, CompileArgs};

pub fn compile(_top_args: &CliArgs, compile_args: &CompileArgs) -> anyhow::Result<()> {
    let mut config = match &compile_args.config {
        Some(path) => PipelineConfig::from_yaml_file(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(len) = compile_args.final_length {
        config.final_length = len;
    }

    let extras = Extras {
        primes_limit: compile_args
            .primes
            .then_some(hrtf_compiler::primes::PRIME_LIMIT),
    };

    let data = hrtf_compiler::compile_to_path(
        &compile_args.input,
        &compile_args.output.output,
        &config,
        &extras,
        compile_args.output.format,
    )
    .with_context(|| format!("Compiling {}", compile_args.input.display()))?;

    log::info!(
        "Compiled {} elevations, {} impulses",
        data.num_elevs(),
        data.azimuth_counts().iter().sum::<usize>()
    );
    Ok(())
}
