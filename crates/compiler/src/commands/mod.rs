mod compile;
mod primes;

use crate::cli_args;

/// Figure out what command to run, then run it.
pub fn dispatch_command(args: &cli_args::CliArgs) -> anyhow::Result<()> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
        log::debug!("Using {threads} worker threads");
    }

    match &args.command {
        cli_args::Command::Compile(c) => compile::compile(args, c),
        cli_args::Command::Primes(p) => primes::primes(args, p),
    }
}
