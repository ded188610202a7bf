//! AppHost CLI - builds launcher-redirect Android apps

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod terminal;

use apphost::util::Shell;
use cli::{Cli, Commands};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("apphost=debug")
    } else if cli.quiet {
        EnvFilter::new("apphost=error")
    } else {
        EnvFilter::new("apphost=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json = matches!(&cli.command, Commands::Build(args) if args.json);
    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color, json);
    let host = cli.host.as_deref();

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, host, &shell),
        Commands::Icon(args) => commands::icon::execute(args, &shell).map(|_| 0),
        Commands::Toolchain => commands::toolchain::execute(&shell).map(|_| 0),
        Commands::Locate(args) => commands::locate::execute(args, host, &shell).map(|_| 0),
        Commands::Swatches => commands::swatches::execute().map(|_| 0),
        Commands::Completions(args) => commands::completions::execute(args).map(|_| 0),
    }
}
