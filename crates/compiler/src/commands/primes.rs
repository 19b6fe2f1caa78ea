use hrtf_compiler::Extras;

use crate::cli_args::{CliArgs, PrimesArgs};

pub fn primes(_top_args: &CliArgs, primes_args: &PrimesArgs) -> anyhow::Result<()> {
    let extras = Extras {
        primes_limit: Some(primes_args.limit),
    };
    let rendered = hrtf_compiler::render(None, &extras, primes_args.output.format)?;
    hrtf_compiler::artifact::write_artifact(&primes_args.output.output, &rendered)?;
    Ok(())
}
