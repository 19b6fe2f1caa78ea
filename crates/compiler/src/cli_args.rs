//! Definition of the Clap command line.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hrtf_compiler::OutputFormat;

#[derive(Debug, Parser)]
pub struct CliArgs {
    /// Number of worker threads.  Defaults to one per core.
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a dataset directory into an artifact.
    Compile(CompileArgs),

    /// Write only the prime table.
    Primes(PrimesArgs),
}

#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Where to write the artifact.
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Rust)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
pub struct CompileArgs {
    /// Directory containing one `elev*` directory per elevation.
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,

    /// YAML file overriding the default pipeline configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Length of the compiled impulses, overriding the configuration.
    #[arg(long)]
    pub final_length: Option<usize>,

    /// Also write the prime table used for delay line lengths.
    #[arg(long)]
    pub primes: bool,
}

#[derive(Debug, Parser)]
pub struct PrimesArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// The table reaches one prime past this.
    #[arg(long, default_value_t = hrtf_compiler::primes::PRIME_LIMIT)]
    pub limit: u32,
}
