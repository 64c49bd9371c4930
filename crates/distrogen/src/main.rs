//! distrogen CLI - Generate custom OpenTelemetry Collector distributions
//!
//! This is the main entry point for the distrogen command-line interface.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

/// Exit code for I/O failures while comparing generated trees
const UNEXPECTED_ERROR_EXIT_CODE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args).await,
        Commands::Query(args) => commands::query::run(args),
        Commands::Project(args) => commands::project::run(args),
        Commands::Component(args) => commands::component::run(args),
        Commands::Internal(args) => commands::internal::run(args),
        Commands::Distrogen(args) => commands::distrogen::run(args),
        Commands::OtelComponentVersions(args) => commands::otel_versions::run(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => exit_code_for(&err),
    }
}

/// Map a command error to the process exit code, reporting it on the way
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if let Some(gen_err) = err.downcast_ref::<distrogen_generators::Error>() {
        if gen_err.is_no_diff() {
            info!("{}", gen_err);
            return ExitCode::SUCCESS;
        }
        if gen_err.is_unexpected() {
            output::error(&format!("unexpected error: {:#}", err));
            return ExitCode::from(UNEXPECTED_ERROR_EXIT_CODE);
        }
    }
    output::error(&format!("{:#}", err));
    ExitCode::FAILURE
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
