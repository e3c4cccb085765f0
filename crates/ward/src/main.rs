//! Ward CLI - documentation server.
//!
//! Provides commands for:
//! - `serve`: Start the documentation API server
//! - `scan`: Scan the documentation tree once and print its categories

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ScanArgs, ServeArgs};
use error::CliError;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Ward - documentation server.
#[derive(Parser)]
#[command(name = "ward", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the documentation server.
    Serve(ServeArgs),
    /// Scan the documentation tree and print its categories.
    Scan(ScanArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute(VERSION))),
        Commands::Scan(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from(["ward", "scan", "--source-dir", "docs"]).unwrap();

        assert!(matches!(cli.command, Commands::Scan(_)));
    }

    #[test]
    fn test_serve_verbose_flag() {
        let cli = Cli::try_parse_from(["ward", "serve", "-v"]).unwrap();

        assert!(matches!(cli.command, Commands::Serve(args) if args.verbose));
    }
}
