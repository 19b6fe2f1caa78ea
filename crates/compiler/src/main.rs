//! Command line front end of the HRTF compiler.
//!
//! Logging goes through `env_logger` at `info` unless `RUST_LOG` says otherwise.
mod cli_args;
mod commands;

fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli_args::CliArgs::parse();
    if let Err(e) = commands::dispatch_command(&args) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
