//! Rewire CLI entry point

use clap::Parser;
use rewire::cli::common::{EXIT_ERROR, EXIT_SUCCESS};
use rewire::cli::{Command, args::Cli};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG overrides; --verbose => debug; else warnings only
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "rewire=debug"
        } else {
            "rewire=warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let exit_code = match &cli.command {
        Command::Init { config, force } => match rewire::cli::init::run_init(config, *force) {
            Ok(result) => {
                for path in &result.created {
                    println!("Created {}. Edit its rules, then run 'rewire check'.", path);
                }
                for path in &result.overwritten {
                    println!("Overwrote {}.", path);
                }
                for path in &result.skipped {
                    println!("Skipped {} (already exists, use --force to overwrite).", path);
                }
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
        Command::Apply(args) => rewire::cli::apply::run_apply(args, cli.color, cli.verbose),
        Command::Check(args) => rewire::cli::check::run_check(args, cli.color, cli.verbose),
        Command::List { config, format } => rewire::cli::list::run_list(config, *format),
    };

    process::exit(exit_code);
}
